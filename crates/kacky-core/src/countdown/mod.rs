//! Local countdowns reconciled against authoritative roster snapshots.
//!
//! The [`Reconciler`] holds one countdown per server and is reseeded by
//! every successful poll. The [`CountdownDriver`] owns a reconciler on its
//! own task, ticks it once per period and publishes render-ready
//! [`Frame`]s.

pub mod driver;
pub mod reconciler;
pub mod view;

pub use driver::{CountdownConfig, CountdownDriver};
pub use reconciler::{Phase, Reconciler, ReseedOutcome, Slot, TickOutcome};
pub use view::{
    DifficultyGroup, Frame, FrameStatus, ServerView, format_countdown, group_by_difficulty,
};
