use chrono::{DateTime, Utc};
use tracing::{error, info};

use crate::session::SessionContext;

pub fn log_app_startup() {
    info!(
        event = "core.app.startup_completed",
        version = env!("CARGO_PKG_VERSION")
    );
}

pub fn log_app_shutdown() {
    info!(event = "core.app.shutdown_started");
}

pub fn log_app_error(error: &dyn std::error::Error) {
    error!(
        event = "core.app.error_occurred",
        error = %error,
        error_type = std::any::type_name_of_val(error)
    );
}

/// Which event the roster is shown for, and whether the request is signed.
pub fn log_session_resolved(session: &SessionContext) {
    let event = session.event();
    info!(
        event = "core.session.resolved",
        title = %event.title(),
        edition = event.edition,
        event_active = event.is_active(),
        anonymous = session.credential().is_anonymous(),
    );
}

/// A new roster reached a surface. `surface` names the command showing it.
pub fn log_roster_refresh(surface: &str, server_count: usize, fetched_at: DateTime<Utc>) {
    info!(
        event = "core.roster.refreshed",
        surface = surface,
        server_count = server_count,
        fetched_at = %fetched_at.to_rfc3339(),
    );
}
