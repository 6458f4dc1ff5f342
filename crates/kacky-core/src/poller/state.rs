use std::sync::Arc;

use crate::roster::{FetchError, Roster, ServerSnapshot};

/// What the poller exposes to the rest of the system.
///
/// `is_loading` is true only until the very first fetch settles, so the
/// presentation layer shows a placeholder exactly while no data has ever
/// arrived. A failed refetch keeps `roster` and flips `is_success` off.
#[derive(Debug, Clone, PartialEq)]
pub struct PollState {
    /// Latest successfully fetched roster.
    pub roster: Option<Arc<Roster>>,
    pub is_loading: bool,
    pub is_success: bool,
    /// A fetch is currently outstanding.
    pub is_fetching: bool,
    /// Error of the most recent fetch, cleared by the next success.
    pub last_error: Option<FetchError>,
    /// Incremented on every successful fetch; consumers reseed when it moves.
    pub generation: u64,
}

impl Default for PollState {
    fn default() -> Self {
        Self {
            roster: None,
            is_loading: true,
            is_success: false,
            is_fetching: false,
            last_error: None,
            generation: 0,
        }
    }
}

impl PollState {
    pub fn has_roster(&self) -> bool {
        self.roster.is_some()
    }

    pub(crate) fn mark_fetching(&mut self) {
        self.is_fetching = true;
    }

    /// Record a successful fetch. The newest resolution always wins.
    pub(crate) fn apply_success(&mut self, servers: Vec<ServerSnapshot>) {
        self.roster = Some(Roster::new(servers).into_shared());
        self.is_loading = false;
        self.is_success = true;
        self.is_fetching = false;
        self.last_error = None;
        self.generation += 1;
    }

    /// Record a failed fetch, keeping the last good roster.
    pub(crate) fn apply_failure(&mut self, error: FetchError) {
        self.is_loading = false;
        self.is_success = false;
        self.is_fetching = false;
        self.last_error = Some(error);
    }
}
