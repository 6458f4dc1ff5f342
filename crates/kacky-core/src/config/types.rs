//! Configuration type definitions for kacky.
//!
//! These types are deserialized from TOML config files. Every field is
//! optional so that a project file only overrides what it mentions;
//! accessor methods in [`super::defaults`] supply the built-in values.
//!
//! # Example Configuration
//!
//! ```toml
//! [api]
//! url = "https://api.example.invalid/kk"
//! timeout_secs = 10
//!
//! [poller]
//! interval_secs = 30
//! refetch_on_focus = true
//!
//! [countdown]
//! fixed_offset_secs = 0
//!
//! [event]
//! type = "kk"
//! edition = 9
//! status = "active"
//! ```

use serde::{Deserialize, Serialize};

use crate::session::EventInfo;

/// Main configuration loaded from TOML config files.
///
/// Loaded from:
/// 1. User config: `~/.kacky/config.toml`
/// 2. Project config: `./.kacky/config.toml`
///
/// Project config values override user config values.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct KackyConfig {
    /// Backend API settings
    #[serde(default)]
    pub api: ApiConfig,

    /// Roster polling cadence
    #[serde(default)]
    pub poller: PollerSettings,

    /// Local countdown behaviour
    #[serde(default)]
    pub countdown: CountdownSettings,

    /// Event shown in the header
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event: Option<EventInfo>,
}

/// Backend API configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct ApiConfig {
    /// Base URL of the API; the roster lives at `{url}/dashboard`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    /// Per-request timeout in seconds.
    /// Default: 10 seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,

    /// Bearer token. Prefer `KACKY_TOKEN` over writing this to disk.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

/// Roster polling configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct PollerSettings {
    /// Seconds between periodic roster fetches.
    /// Default: 30 seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interval_secs: Option<u64>,

    /// Whether regaining focus triggers an immediate refetch.
    /// Default: true.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refetch_on_focus: Option<bool>,
}

/// Countdown configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct CountdownSettings {
    /// Constant added to every authoritative remaining time to cover the
    /// map-change transition.
    /// Default: 0 seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fixed_offset_secs: Option<u64>,
}
