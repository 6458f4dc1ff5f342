use clap::ArgMatches;
use tracing::{error, info};

use kacky_core::errors::KackyError;
use kacky_core::{Frame, HttpRosterSource, Roster, RosterSource, events};

use super::helpers;
use crate::render::{RenderOptions, render_frame};

pub(crate) fn handle_list_command(matches: &ArgMatches) -> Result<(), Box<dyn std::error::Error>> {
    let json_output = matches.get_flag("json");
    let options = RenderOptions {
        minimal: matches.get_flag("minimal"),
        group: matches.get_flag("group"),
    };

    let config = helpers::resolve_config(matches)?;
    let session = helpers::session_context(&config);

    info!(
        event = "cli.list_started",
        json_output = json_output,
        api_url = config.api.url(),
    );

    let source = HttpRosterSource::from_config(&config.api)?;
    let runtime = helpers::build_runtime()?;

    match runtime.block_on(source.fetch_roster(session.credential())) {
        Ok(servers) => {
            let roster = Roster::new(servers);
            events::log_roster_refresh("list", roster.len(), roster.fetched_at);
            let frame = Frame::from_roster(&roster, config.countdown.fixed_offset_secs());

            if json_output {
                println!("{}", serde_json::to_string_pretty(&frame.servers)?);
            } else {
                print!("{}", render_frame(&frame, session.event(), options));
            }

            info!(event = "cli.list_completed", count = roster.len());

            Ok(())
        }
        Err(e) => {
            eprintln!("❌ Failed to fetch roster from {}: {}", source.endpoint(), e);
            if e.is_user_error() {
                eprintln!("   Pass --token or set KACKY_TOKEN to authenticate.");
            }

            error!(
                event = "cli.list_failed",
                error = %e,
                error_code = e.error_code(),
            );

            events::log_app_error(&e);
            Err(e.into())
        }
    }
}
