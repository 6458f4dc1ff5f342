use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::errors::PollerError;
use super::inflight::InFlightGuard;
use super::state::PollState;
use crate::config::PollerSettings;
use crate::errors::KackyError;
use crate::roster::RosterSource;
use crate::session::Credential;

/// Scheduling parameters for a [`Poller`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollerConfig {
    pub interval: Duration,
    pub refetch_on_focus: bool,
}

impl Default for PollerConfig {
    fn default() -> Self {
        Self::from_settings(&PollerSettings::default())
    }
}

impl PollerConfig {
    pub fn from_settings(settings: &PollerSettings) -> Self {
        Self {
            interval: settings.interval(),
            refetch_on_focus: settings.refetch_on_focus(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Trigger {
    Startup,
    Interval,
    Focus,
}

impl Trigger {
    fn as_str(self) -> &'static str {
        match self {
            Trigger::Startup => "startup",
            Trigger::Interval => "interval",
            Trigger::Focus => "focus",
        }
    }
}

/// Cloneable handle for reporting that the consuming surface regained focus.
#[derive(Debug, Clone)]
pub struct FocusHandle {
    tx: mpsc::UnboundedSender<()>,
}

impl FocusHandle {
    /// Request a refetch. Returns false once the poller has stopped.
    pub fn notify(&self) -> bool {
        self.tx.send(()).is_ok()
    }
}

/// Periodic roster poller.
///
/// Fetches immediately when spawned, then every `interval`, and whenever
/// [`FocusHandle::notify`] is called. At most one fetch per credential is
/// outstanding; triggers that arrive meanwhile are coalesced into it. Failed
/// fetches are not retried.
///
/// The poller never touches countdown state. Consumers subscribe to
/// [`PollState`] and react to it.
pub struct Poller {
    state_tx: Arc<watch::Sender<PollState>>,
    state_rx: watch::Receiver<PollState>,
    focus: FocusHandle,
    shutdown: CancellationToken,
    task: Option<JoinHandle<()>>,
}

impl Poller {
    /// Start polling on the current tokio runtime.
    pub fn spawn<S: RosterSource>(
        source: Arc<S>,
        credential: Credential,
        config: PollerConfig,
    ) -> Result<Self, PollerError> {
        let runtime =
            tokio::runtime::Handle::try_current().map_err(|_| PollerError::NoRuntime)?;
        let (state_tx, state_rx) = watch::channel(PollState::default());
        let state_tx = Arc::new(state_tx);
        let (focus_tx, focus_rx) = mpsc::unbounded_channel();
        let shutdown = CancellationToken::new();

        info!(
            event = "core.poller.started",
            interval_secs = config.interval.as_secs(),
            refetch_on_focus = config.refetch_on_focus,
            anonymous = credential.is_anonymous(),
        );

        let task = runtime.spawn(run_poll_loop(
            source,
            credential,
            config,
            Arc::clone(&state_tx),
            focus_rx,
            shutdown.clone(),
        ));

        Ok(Self {
            state_tx,
            state_rx,
            focus: FocusHandle { tx: focus_tx },
            shutdown,
            task: Some(task),
        })
    }

    pub fn subscribe(&self) -> watch::Receiver<PollState> {
        self.state_rx.clone()
    }

    /// Snapshot of the current poll state.
    pub fn state(&self) -> PollState {
        self.state_rx.borrow().clone()
    }

    pub fn focus_handle(&self) -> FocusHandle {
        self.focus.clone()
    }

    /// Report that the consuming surface regained focus.
    pub fn focus_regained(&self) {
        self.focus.notify();
    }

    /// Stop polling and wait for the poll loop to exit.
    ///
    /// Fetches still in flight are abandoned and never publish.
    pub async fn shutdown(mut self) -> Result<(), PollerError> {
        cancel_publishing(&self.state_tx, &self.shutdown);
        if let Some(task) = self.task.take()
            && let Err(e) = task.await
        {
            warn!(event = "core.poller.join_failed", error = %e);
            return Err(PollerError::TaskFailed {
                task: "poll_loop",
                message: e.to_string(),
            });
        }
        info!(event = "core.poller.stopped");
        Ok(())
    }
}

impl Drop for Poller {
    fn drop(&mut self) {
        cancel_publishing(&self.state_tx, &self.shutdown);
    }
}

async fn run_poll_loop<S: RosterSource>(
    source: Arc<S>,
    credential: Credential,
    config: PollerConfig,
    state_tx: Arc<watch::Sender<PollState>>,
    mut focus_rx: mpsc::UnboundedReceiver<()>,
    shutdown: CancellationToken,
) {
    let in_flight = InFlightGuard::new();

    // First tick completes immediately, which gives the activation fetch
    let mut ticker = tokio::time::interval(config.interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut started = false;

    loop {
        let trigger = tokio::select! {
            biased;
            _ = shutdown.cancelled() => break,
            _ = ticker.tick() => {
                let trigger = if started { Trigger::Interval } else { Trigger::Startup };
                started = true;
                trigger
            }
            focus = focus_rx.recv() => match focus {
                Some(()) if config.refetch_on_focus => Trigger::Focus,
                Some(()) => {
                    debug!(event = "core.poller.focus_ignored");
                    continue;
                }
                None => break,
            },
        };

        start_fetch(&source, &credential, &in_flight, &state_tx, &shutdown, trigger);
    }

    debug!(event = "core.poller.loop_exited");
}

fn start_fetch<S: RosterSource>(
    source: &Arc<S>,
    credential: &Credential,
    in_flight: &InFlightGuard<Credential>,
    state_tx: &Arc<watch::Sender<PollState>>,
    shutdown: &CancellationToken,
    trigger: Trigger,
) {
    let Some(ticket) = in_flight.try_acquire(credential) else {
        debug!(
            event = "core.poller.fetch_coalesced",
            trigger = trigger.as_str(),
        );
        return;
    };

    let request_id = uuid::Uuid::new_v4().to_string();
    info!(
        event = "core.poller.fetch_started",
        request_id = %request_id,
        trigger = trigger.as_str(),
    );
    publish_unless_cancelled(state_tx, shutdown, PollState::mark_fetching);

    let source = Arc::clone(source);
    let credential = credential.clone();
    let state_tx = Arc::clone(state_tx);
    let shutdown = shutdown.clone();

    tokio::spawn(async move {
        let _ticket = ticket;

        let result = tokio::select! {
            biased;
            _ = shutdown.cancelled() => {
                debug!(event = "core.poller.fetch_abandoned", request_id = %request_id);
                return;
            }
            result = source.fetch_roster(&credential) => result,
        };

        let published = match result {
            Ok(servers) => {
                info!(
                    event = "core.poller.fetch_completed",
                    request_id = %request_id,
                    server_count = servers.len(),
                );
                publish_unless_cancelled(&state_tx, &shutdown, |state| {
                    state.apply_success(servers)
                })
            }
            Err(e) => {
                warn!(
                    event = "core.poller.fetch_failed",
                    request_id = %request_id,
                    error = %e,
                    error_code = e.error_code(),
                );
                publish_unless_cancelled(&state_tx, &shutdown, |state| state.apply_failure(e))
            }
        };

        if !published {
            debug!(event = "core.poller.result_discarded", request_id = %request_id);
        }
    });
}

/// Apply `update` to the published state unless the poller has been shut down.
///
/// The cancellation check runs under the watch channel's write lock, the same
/// lock [`cancel_publishing`] takes, so a shutdown either lands before the
/// check or after the update is visible. Returns whether `update` ran.
fn publish_unless_cancelled<F>(
    state_tx: &watch::Sender<PollState>,
    shutdown: &CancellationToken,
    update: F,
) -> bool
where
    F: FnOnce(&mut PollState),
{
    state_tx.send_if_modified(|state| {
        if shutdown.is_cancelled() {
            return false;
        }
        update(state);
        true
    })
}

/// Cancel `shutdown` while holding the watch write lock, so no publish can
/// straddle the cancellation.
fn cancel_publishing(state_tx: &watch::Sender<PollState>, shutdown: &CancellationToken) {
    state_tx.send_if_modified(|_| {
        shutdown.cancel();
        false
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::roster::FetchError;
    use crate::roster::testing::{ScriptedSource, Step, server};

    fn config() -> PollerConfig {
        PollerConfig {
            interval: Duration::from_secs(30),
            refetch_on_focus: true,
        }
    }

    async fn settle() {
        tokio::time::sleep(Duration::from_millis(10)).await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_fetches_immediately_on_start() {
        let source = Arc::new(ScriptedSource::new(vec![Step::ok(vec![server("1", 10)])]));
        let poller = Poller::spawn(source.clone(), Credential::anonymous(), config()).unwrap();

        assert!(poller.state().is_loading);
        settle().await;

        let state = poller.state();
        assert_eq!(source.calls(), 1);
        assert!(!state.is_loading);
        assert!(state.is_success);
        assert_eq!(state.generation, 1);
        assert_eq!(state.roster.unwrap().servers[0].remaining_secs, 10);

        poller.shutdown().await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_refetches_on_interval() {
        let source = Arc::new(ScriptedSource::new(vec![
            Step::ok(vec![server("1", 10)]),
            Step::ok(vec![server("1", 50)]),
        ]));
        let poller = Poller::spawn(source.clone(), Credential::anonymous(), config()).unwrap();

        tokio::time::sleep(Duration::from_millis(29_500)).await;
        assert_eq!(source.calls(), 1);

        tokio::time::sleep(Duration::from_secs(1)).await;
        assert_eq!(source.calls(), 2);
        let state = poller.state();
        assert_eq!(state.generation, 2);
        assert_eq!(state.roster.unwrap().servers[0].remaining_secs, 50);

        poller.shutdown().await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_focus_triggers_refetch() {
        let source = Arc::new(ScriptedSource::new(vec![
            Step::ok(vec![server("1", 10)]),
            Step::ok(vec![server("1", 9)]),
        ]));
        let poller = Poller::spawn(source.clone(), Credential::anonymous(), config()).unwrap();
        settle().await;

        poller.focus_regained();
        settle().await;

        assert_eq!(source.calls(), 2);
        assert_eq!(poller.state().generation, 2);

        poller.shutdown().await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_focus_ignored_when_disabled() {
        let source = Arc::new(ScriptedSource::new(vec![Step::ok(vec![server("1", 10)])]));
        let poller = Poller::spawn(
            source.clone(),
            Credential::anonymous(),
            PollerConfig {
                refetch_on_focus: false,
                ..config()
            },
        )
        .unwrap();
        settle().await;

        assert!(poller.focus_handle().notify());
        settle().await;

        assert_eq!(source.calls(), 1);
        poller.shutdown().await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_failure_keeps_last_roster_without_retry() {
        let source = Arc::new(ScriptedSource::new(vec![
            Step::ok(vec![server("1", 10)]),
            Step::err(FetchError::Status { status: 502 }),
        ]));
        let poller = Poller::spawn(source.clone(), Credential::anonymous(), config()).unwrap();

        tokio::time::sleep(Duration::from_millis(30_500)).await;

        let state = poller.state();
        assert_eq!(source.calls(), 2);
        assert!(!state.is_success);
        assert!(!state.is_loading);
        assert_eq!(state.generation, 1);
        assert_eq!(state.roster.unwrap().servers[0].remaining_secs, 10);
        assert_eq!(state.last_error, Some(FetchError::Status { status: 502 }));

        // No retry before the next scheduled poll
        tokio::time::sleep(Duration::from_secs(20)).await;
        assert_eq!(source.calls(), 2);

        poller.shutdown().await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_first_fetch_failure_ends_loading() {
        let source = Arc::new(ScriptedSource::new(vec![Step::err(FetchError::Unauthorized {
            status: 401,
        })]));
        let poller = Poller::spawn(source, Credential::bearer("bad"), config()).unwrap();
        settle().await;

        let state = poller.state();
        assert!(!state.is_loading);
        assert!(!state.is_success);
        assert!(state.roster.is_none());

        poller.shutdown().await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_triggers_coalesce_into_in_flight_fetch() {
        let source = Arc::new(ScriptedSource::new(vec![
            Step::ok(vec![server("1", 10)]).after(Duration::from_secs(45)),
        ]));
        let poller = Poller::spawn(source.clone(), Credential::anonymous(), config()).unwrap();
        settle().await;
        assert!(poller.state().is_fetching);

        // Interval tick at 30s and a focus trigger both land on the slow fetch
        poller.focus_regained();
        tokio::time::sleep(Duration::from_secs(31)).await;
        assert_eq!(source.calls(), 1);

        tokio::time::sleep(Duration::from_secs(15)).await;
        let state = poller.state();
        assert_eq!(state.generation, 1);
        assert!(!state.is_fetching);

        poller.shutdown().await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_fetch_resolving_after_shutdown_is_discarded() {
        let source = Arc::new(ScriptedSource::new(vec![
            Step::ok(vec![server("1", 10)]).after(Duration::from_secs(10)),
        ]));
        let poller = Poller::spawn(source.clone(), Credential::anonymous(), config()).unwrap();
        let rx = poller.subscribe();

        tokio::time::sleep(Duration::from_secs(1)).await;
        poller.shutdown().await.unwrap();
        tokio::time::sleep(Duration::from_secs(60)).await;

        let state = rx.borrow().clone();
        assert_eq!(source.calls(), 1);
        assert_eq!(state.generation, 0);
        assert!(state.roster.is_none());
        assert!(state.is_loading);
    }

    #[test]
    fn test_publish_after_cancel_leaves_state_untouched() {
        let (state_tx, mut rx) = watch::channel(PollState::default());
        let shutdown = CancellationToken::new();

        cancel_publishing(&state_tx, &shutdown);
        assert!(shutdown.is_cancelled());
        assert!(!rx.has_changed().unwrap());

        let published = publish_unless_cancelled(&state_tx, &shutdown, |state| {
            state.apply_success(vec![server("1", 10)])
        });
        assert!(!published);
        assert!(!rx.has_changed().unwrap());

        let state = rx.borrow_and_update().clone();
        assert_eq!(state.generation, 0);
        assert!(state.roster.is_none());
    }

    #[test]
    fn test_publish_before_cancel_notifies_receivers() {
        let (state_tx, mut rx) = watch::channel(PollState::default());
        let shutdown = CancellationToken::new();

        let published = publish_unless_cancelled(&state_tx, &shutdown, |state| {
            state.apply_success(vec![server("1", 10)])
        });
        assert!(published);
        assert!(rx.has_changed().unwrap());
        assert_eq!(rx.borrow_and_update().generation, 1);

        cancel_publishing(&state_tx, &shutdown);
        assert!(!publish_unless_cancelled(&state_tx, &shutdown, PollState::mark_fetching));
        assert_eq!(rx.borrow().generation, 1);
        assert!(!rx.borrow().is_fetching);
    }

    #[test]
    fn test_spawn_outside_runtime_fails() {
        let source = Arc::new(ScriptedSource::new(vec![]));
        let result = Poller::spawn(source, Credential::anonymous(), config());
        assert!(matches!(result, Err(PollerError::NoRuntime)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_focus_handle_reports_stopped_poller() {
        let source = Arc::new(ScriptedSource::new(vec![]));
        let poller = Poller::spawn(source, Credential::anonymous(), config()).unwrap();
        let focus = poller.focus_handle();

        poller.shutdown().await.unwrap();
        settle().await;
        assert!(!focus.notify());
    }
}
