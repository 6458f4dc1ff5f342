use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{Instant, Interval};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::reconciler::{Reconciler, ReseedOutcome, TickOutcome};
use super::view::Frame;
use crate::config::CountdownSettings;
use crate::poller::{PollState, PollerError};

/// Every tick takes exactly one second off each slot, so the ticker must
/// fire once per wall-clock second.
pub const TICK_PERIOD: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CountdownConfig {
    /// Seconds added to every slot when it is seeded.
    pub fixed_offset: u64,
}

impl Default for CountdownConfig {
    fn default() -> Self {
        Self::from_settings(&CountdownSettings::default())
    }
}

impl CountdownConfig {
    pub fn from_settings(settings: &CountdownSettings) -> Self {
        Self {
            fixed_offset: settings.fixed_offset_secs(),
        }
    }
}

/// Task that owns a [`Reconciler`] and publishes a [`Frame`] after every
/// reseed and tick.
///
/// Reseeds whenever the poll state's generation moves. The ticker is armed
/// by the first snapshot and never re-armed. Tearing down stops the ticker
/// and drops the reconciler, so fetches that resolve afterwards change
/// nothing.
pub struct CountdownDriver {
    frame_rx: watch::Receiver<Frame>,
    shutdown: CancellationToken,
    task: Option<JoinHandle<()>>,
}

impl CountdownDriver {
    pub fn spawn(
        poll_rx: watch::Receiver<PollState>,
        config: CountdownConfig,
    ) -> Result<Self, PollerError> {
        let runtime =
            tokio::runtime::Handle::try_current().map_err(|_| PollerError::NoRuntime)?;

        let (frame_tx, frame_rx) = watch::channel(Frame::default());
        let shutdown = CancellationToken::new();

        info!(
            event = "core.countdown.started",
            fixed_offset_secs = config.fixed_offset,
        );

        let task = runtime.spawn(run_countdown_loop(
            poll_rx,
            config,
            frame_tx,
            shutdown.clone(),
        ));

        Ok(Self {
            frame_rx,
            shutdown,
            task: Some(task),
        })
    }

    pub fn subscribe(&self) -> watch::Receiver<Frame> {
        self.frame_rx.clone()
    }

    /// The most recently published frame.
    pub fn frame(&self) -> Frame {
        self.frame_rx.borrow().clone()
    }

    /// Stop ticking and wait for the task to exit.
    pub async fn teardown(mut self) -> Result<(), PollerError> {
        self.shutdown.cancel();
        if let Some(task) = self.task.take()
            && let Err(e) = task.await
        {
            warn!(event = "core.countdown.join_failed", error = %e);
            return Err(PollerError::TaskFailed {
                task: "countdown_loop",
                message: e.to_string(),
            });
        }
        info!(event = "core.countdown.stopped");
        Ok(())
    }
}

impl Drop for CountdownDriver {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}

async fn run_countdown_loop(
    mut poll_rx: watch::Receiver<PollState>,
    config: CountdownConfig,
    frame_tx: watch::Sender<Frame>,
    shutdown: CancellationToken,
) {
    let mut reconciler = Reconciler::new(config.fixed_offset);
    let mut ticker: Option<Interval> = None;
    let mut seen_generation = 0;
    let mut poller_open = true;

    let mut state = poll_rx.borrow_and_update().clone();
    sync(&mut reconciler, &mut ticker, &mut seen_generation, &state);
    frame_tx.send_replace(Frame::build(&reconciler, &state));

    loop {
        tokio::select! {
            biased;
            _ = shutdown.cancelled() => break,
            changed = poll_rx.changed(), if poller_open => {
                if changed.is_err() {
                    debug!(event = "core.countdown.poller_closed");
                    poller_open = false;
                    continue;
                }
                state = poll_rx.borrow_and_update().clone();
                sync(&mut reconciler, &mut ticker, &mut seen_generation, &state);
            }
            _ = next_tick(&mut ticker) => {
                if let TickOutcome::Ticked { decremented: 0 } = reconciler.tick() {
                    continue;
                }
            }
        }

        frame_tx.send_replace(Frame::build(&reconciler, &state));
    }

    reconciler.teardown();
}

/// Reseed when a new snapshot has arrived since the last one applied.
fn sync(
    reconciler: &mut Reconciler,
    ticker: &mut Option<Interval>,
    seen_generation: &mut u64,
    state: &PollState,
) {
    if state.generation == *seen_generation {
        return;
    }
    *seen_generation = state.generation;

    let Some(roster) = &state.roster else {
        return;
    };

    if reconciler.on_snapshot(&roster.servers) == ReseedOutcome::Armed {
        // First tick lands one full period after the first snapshot
        *ticker = Some(tokio::time::interval_at(
            Instant::now() + TICK_PERIOD,
            TICK_PERIOD,
        ));
        info!(
            event = "core.countdown.armed",
            slot_count = reconciler.len(),
        );
    }
}

async fn next_tick(ticker: &mut Option<Interval>) {
    match ticker {
        Some(ticker) => {
            ticker.tick().await;
        }
        None => std::future::pending().await,
    }
}
