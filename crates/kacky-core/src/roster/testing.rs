//! Scripted roster source for poller and countdown tests.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use super::errors::FetchError;
use super::source::RosterSource;
use super::types::{Difficulty, MapInfo, ServerId, ServerSnapshot};
use crate::session::Credential;

/// One scripted reply: resolve after `delay` with `result`.
pub(crate) struct Step {
    pub delay: Duration,
    pub result: Result<Vec<ServerSnapshot>, FetchError>,
}

impl Step {
    pub fn ok(servers: Vec<ServerSnapshot>) -> Self {
        Self {
            delay: Duration::ZERO,
            result: Ok(servers),
        }
    }

    pub fn err(error: FetchError) -> Self {
        Self {
            delay: Duration::ZERO,
            result: Err(error),
        }
    }

    pub fn after(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

/// Replays steps in order. Once the script runs out, fetches never resolve.
pub(crate) struct ScriptedSource {
    steps: Mutex<VecDeque<Step>>,
    calls: AtomicUsize,
}

impl ScriptedSource {
    pub fn new(steps: Vec<Step>) -> Self {
        Self {
            steps: Mutex::new(steps.into()),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl RosterSource for ScriptedSource {
    async fn fetch_roster(
        &self,
        _credential: &Credential,
    ) -> Result<Vec<ServerSnapshot>, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let step = self.steps.lock().unwrap().pop_front();
        match step {
            Some(step) => {
                tokio::time::sleep(step.delay).await;
                step.result
            }
            None => std::future::pending().await,
        }
    }
}

pub(crate) fn server(id: &str, remaining_secs: u64) -> ServerSnapshot {
    ServerSnapshot {
        server_id: ServerId::new(id),
        maps: vec![MapInfo {
            number: 200,
            author: "tester".to_string(),
            finished: false,
        }],
        difficulty: Difficulty::White,
        join_target: format!("kacky{}", id),
        time_limit_secs: 600,
        remaining_secs,
    }
}
