//! Built-in defaults for configuration values.
//!
//! Config types keep every field optional; the accessors here resolve a
//! missing value to its documented default.

use std::time::Duration;

use crate::config::types::{ApiConfig, CountdownSettings, KackyConfig, PollerSettings};
use crate::session::EventInfo;

/// Default API base URL (a local backend).
pub const DEFAULT_API_URL: &str = "http://127.0.0.1:8000";

/// Default per-request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Default poll cadence in seconds.
pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 30;

/// Default map-change transition offset. Zero until the transition delay
/// is measured.
pub const DEFAULT_FIXED_OFFSET_SECS: u64 = 0;

impl ApiConfig {
    /// Returns the API base URL, defaulting to [`DEFAULT_API_URL`].
    pub fn url(&self) -> &str {
        self.url.as_deref().unwrap_or(DEFAULT_API_URL)
    }

    /// Returns the request timeout in seconds, defaulting to 10.
    pub fn timeout_secs(&self) -> u64 {
        self.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS)
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }
}

impl PollerSettings {
    /// Returns the poll interval in seconds, defaulting to 30.
    pub fn interval_secs(&self) -> u64 {
        self.interval_secs.unwrap_or(DEFAULT_POLL_INTERVAL_SECS)
    }

    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs())
    }

    /// Returns whether focus regain refetches, defaulting to true.
    pub fn refetch_on_focus(&self) -> bool {
        self.refetch_on_focus.unwrap_or(true)
    }
}

impl CountdownSettings {
    /// Returns the transition offset in seconds, defaulting to 0.
    pub fn fixed_offset_secs(&self) -> u64 {
        self.fixed_offset_secs.unwrap_or(DEFAULT_FIXED_OFFSET_SECS)
    }
}

impl KackyConfig {
    /// The configured event, or an empty one.
    pub fn event_info(&self) -> EventInfo {
        self.event.clone().unwrap_or_default()
    }
}
