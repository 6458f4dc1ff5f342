//! Periodic roster polling with single-flight fetches.

pub mod errors;
pub mod handler;
pub mod inflight;
pub mod state;

pub use errors::PollerError;
pub use handler::{FocusHandle, Poller, PollerConfig};
pub use inflight::{InFlightGuard, InFlightTicket};
pub use state::PollState;
