//! Shared plumbing for command handlers: config resolution, session
//! context and the runtime the async core runs on.

use clap::ArgMatches;
use tracing::{debug, warn};

use kacky_core::config::loading::apply_env_overrides;
use kacky_core::{Credential, KackyConfig, SessionContext, events};

/// Load the config hierarchy, falling back to defaults with a warning.
///
/// Environment overrides still apply when the files could not be loaded.
pub fn load_config_with_warning() -> KackyConfig {
    match KackyConfig::load_hierarchy() {
        Ok(config) => config,
        Err(e) => {
            eprintln!(
                "Warning: Could not load config: {}. Using defaults.\n\
                 Tip: Check ~/.kacky/config.toml and ./.kacky/config.toml for syntax errors.",
                e
            );
            warn!(
                event = "cli.config.load_failed",
                error = %e,
                "Config load failed, using defaults"
            );
            apply_env_overrides(KackyConfig::default(), |key| std::env::var(key).ok())
        }
    }
}

/// Apply `--api-url` and `--token` on top of a loaded config.
pub fn apply_cli_overrides(config: &mut KackyConfig, matches: &ArgMatches) {
    if let Some(url) = matches.get_one::<String>("api-url") {
        config.api.url = Some(url.clone());
    }
    if let Some(token) = matches.get_one::<String>("token") {
        config.api.token = Some(token.clone());
    }
}

/// Config for a command: files, environment, then CLI flags, validated.
pub fn resolve_config(matches: &ArgMatches) -> Result<KackyConfig, Box<dyn std::error::Error>> {
    let mut config = load_config_with_warning();
    apply_cli_overrides(&mut config, matches);
    config.validate()?;

    debug!(
        event = "cli.config.resolved",
        api_url = config.api.url(),
        interval_secs = config.poller.interval_secs(),
    );

    Ok(config)
}

pub fn session_context(config: &KackyConfig) -> SessionContext {
    let credential = config
        .api
        .token()
        .map(Credential::bearer)
        .unwrap_or_default();
    let session = SessionContext::new(credential, config.event_info());
    events::log_session_resolved(&session);
    session
}

/// Single-threaded runtime for one command invocation.
pub fn build_runtime() -> std::io::Result<tokio::runtime::Runtime> {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
}
