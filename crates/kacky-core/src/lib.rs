//! kacky-core: Core library for live Kacky map-rotation countdowns
//!
//! This library polls the Kacky backend for the server roster and keeps a
//! per-server countdown to the next map change that ticks locally between
//! polls. It is used by the CLI and by anything else that wants to render
//! the roster.
//!
//! # Main Entry Points
//!
//! - [`poller`] - Periodic, single-flight roster fetching
//! - [`countdown`] - Countdown reconciliation and the render frames built from it
//! - [`roster`] - Server snapshot types and the HTTP roster source
//! - [`session`] - Credential and event context injected at the composition root
//! - [`config`] - Configuration management

pub mod config;
pub mod countdown;
pub mod errors;
pub mod events;
pub mod logging;
pub mod poller;
pub mod roster;
pub mod session;

// Re-export commonly used types at crate root for convenience
pub use config::KackyConfig;
pub use countdown::{
    CountdownConfig, CountdownDriver, Frame, FrameStatus, Phase, Reconciler, ServerView,
};
pub use poller::{FocusHandle, PollState, Poller, PollerConfig, PollerError};
pub use roster::{
    Difficulty, FetchError, HttpRosterSource, MapInfo, Roster, RosterSource, ServerId,
    ServerSnapshot,
};
pub use session::{Credential, EventInfo, SessionContext};

// Re-export logging initialization
pub use logging::init_logging;
