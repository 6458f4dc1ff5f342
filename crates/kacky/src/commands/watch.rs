use std::io::Write;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use clap::ArgMatches;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{error, info, warn};

use kacky_core::countdown::CountdownConfig;
use kacky_core::poller::PollerConfig;
use kacky_core::{
    CountdownDriver, EventInfo, Frame, HttpRosterSource, KackyConfig, Poller, SessionContext,
    events,
};

use super::helpers;
use crate::render::{RenderOptions, render_frame};

const CLEAR_SCREEN: &str = "\x1B[2J\x1B[H";

pub(crate) fn handle_watch_command(
    matches: &ArgMatches,
) -> Result<(), Box<dyn std::error::Error>> {
    let options = RenderOptions {
        minimal: matches.get_flag("minimal"),
        group: matches.get_flag("group"),
    };

    let config = helpers::resolve_config(matches)?;
    let session = helpers::session_context(&config);
    let source = Arc::new(HttpRosterSource::from_config(&config.api)?);

    info!(
        event = "cli.watch_started",
        endpoint = source.endpoint(),
        interval_secs = config.poller.interval_secs(),
    );

    let runtime = helpers::build_runtime()?;
    let result = runtime.block_on(run_watch(source, &session, &config, options));

    // The stdin reader blocks on a thread of its own; don't wait for it
    runtime.shutdown_background();

    match &result {
        Ok(()) => info!(event = "cli.watch_completed"),
        Err(e) => {
            eprintln!("❌ Watch failed: {}", e);
            error!(event = "cli.watch_failed", error = %e);
        }
    }
    events::log_app_shutdown();

    result
}

async fn run_watch(
    source: Arc<HttpRosterSource>,
    session: &SessionContext,
    config: &KackyConfig,
    options: RenderOptions,
) -> Result<(), Box<dyn std::error::Error>> {
    let poller = Poller::spawn(
        source,
        session.credential().clone(),
        PollerConfig::from_settings(&config.poller),
    )?;
    let driver = CountdownDriver::spawn(
        poller.subscribe(),
        CountdownConfig::from_settings(&config.countdown),
    )?;
    let focus = poller.focus_handle();

    let mut frames = driver.subscribe();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdin_open = true;

    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    let initial = frames.borrow_and_update().clone();
    let mut last_refresh = None;
    note_refresh(&initial, &mut last_refresh);
    redraw(&initial, session.event(), options)?;

    loop {
        tokio::select! {
            signal = &mut ctrl_c => {
                if let Err(e) = signal {
                    warn!(event = "cli.watch_signal_failed", error = %e);
                }
                info!(event = "cli.watch_interrupted");
                break;
            }
            changed = frames.changed() => {
                if changed.is_err() {
                    break;
                }
                let frame = frames.borrow_and_update().clone();
                note_refresh(&frame, &mut last_refresh);
                redraw(&frame, session.event(), options)?;
            }
            line = lines.next_line(), if stdin_open => match line {
                Ok(Some(_)) => {
                    info!(event = "cli.watch_refresh_requested");
                    focus.notify();
                }
                Ok(None) => stdin_open = false,
                Err(e) => {
                    warn!(event = "cli.watch_stdin_failed", error = %e);
                    stdin_open = false;
                }
            },
        }
    }

    driver.teardown().await?;
    poller.shutdown().await?;

    Ok(())
}

/// Log once per roster, not once per tick.
fn note_refresh(frame: &Frame, last_refresh: &mut Option<DateTime<Utc>>) {
    if let Some(fetched_at) = frame.fetched_at
        && *last_refresh != Some(fetched_at)
    {
        events::log_roster_refresh("watch", frame.servers.len(), fetched_at);
        *last_refresh = Some(fetched_at);
    }
}

fn redraw(frame: &Frame, event: &EventInfo, options: RenderOptions) -> std::io::Result<()> {
    let mut stdout = std::io::stdout().lock();
    write!(stdout, "{}", CLEAR_SCREEN)?;
    write!(stdout, "{}", render_frame(frame, event, options))?;
    writeln!(stdout, "\nEnter: refresh now   Ctrl-C: quit")?;
    stdout.flush()
}
