//! Polling scheduler driving connection checks and event fetches.
//!
//! One engine owns one [`SyncState`]. Every pass, whether started by the
//! interval timer or by a manual trigger, goes through the same in-flight
//! slot, so at most one probe/fetch sequence runs at a time; callers that
//! trigger while a pass is running join it instead of starting another.
//!
//! Passes are tagged with the engine generation they were started under.
//! `stop()` advances the generation, and a pass re-checks its tag after
//! each suspension point (probe, fetch) under the same lock that guards
//! state writes. A stale pass can therefore never touch state after `stop()`
//! returns.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};
use std::time::Duration;

use calsync_domain::constants::{CONTEXT_FETCH_EVENTS, CONTEXT_RETRY};
use calsync_domain::{
    CalSyncError, CalendarEvent, ClassifiedError, EngineStatus, EventQuery, SyncState,
};
use chrono::Utc;
use futures::future::{BoxFuture, FutureExt, Shared};
use parking_lot::Mutex;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument, warn};

use super::error::{SchedulerError, SchedulerResult};
use super::failure::SyncFailure;
use super::options::SyncOptions;
use super::ports::{ConnectionProbe, ConnectivityOracle, EventFetcher, KeyValueStore};
use crate::classification::ErrorClassifier;
use crate::error_log::ErrorLog;
use crate::retry::{run_with_retry, RetryPolicy};

const STOP_JOIN_TIMEOUT: Duration = Duration::from_secs(5);

/// Result of one sync pass as observed by the caller that triggered it
#[derive(Debug, Clone, PartialEq)]
pub enum SyncOutcome {
    /// Events were fetched and published.
    Synced { event_count: usize },
    /// The probe reported no integration; no fetch was issued.
    NotConnected(ClassifiedError),
    /// The fetch failed; the error was logged and published.
    Failed(ClassifiedError),
    /// The engine was stopped before the pass could publish anything.
    Discarded,
    /// The pass task did not run to completion (it panicked).
    Aborted(String),
}

impl SyncOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Synced { .. })
    }
}

/// Collaborators injected into the engine
#[derive(Clone)]
pub struct SyncEnginePorts {
    pub probe: Arc<dyn ConnectionProbe>,
    pub fetcher: Arc<dyn EventFetcher>,
    pub error_store: Arc<dyn KeyValueStore>,
    pub connectivity: Arc<dyn ConnectivityOracle>,
}

type PassHandle = Shared<BoxFuture<'static, SyncOutcome>>;

struct InFlight {
    pass_id: u64,
    handle: PassHandle,
}

struct Lifecycle {
    status: EngineStatus,
    generation: u64,
    cancellation: CancellationToken,
    timer: Option<JoinHandle<()>>,
}

struct EngineInner {
    options: SyncOptions,
    probe: Arc<dyn ConnectionProbe>,
    fetcher: Arc<dyn EventFetcher>,
    classifier: ErrorClassifier,
    error_log: ErrorLog,
    retry_policy: RetryPolicy,
    state: watch::Sender<SyncState>,
    lifecycle: Mutex<Lifecycle>,
    in_flight: Mutex<Option<InFlight>>,
    next_pass_id: AtomicU64,
}

impl Drop for EngineInner {
    fn drop(&mut self) {
        self.lifecycle.get_mut().cancellation.cancel();
    }
}

/// Calendar sync engine.
///
/// Cheap to clone; clones share state and lifecycle. Must be driven from
/// within a Tokio runtime.
#[derive(Clone)]
pub struct SyncEngine {
    inner: Arc<EngineInner>,
}

impl std::fmt::Debug for SyncEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SyncEngine")
            .field("status", &self.status())
            .field("options", &self.inner.options)
            .finish_non_exhaustive()
    }
}

impl SyncEngine {
    /// Create an idle engine.
    ///
    /// # Errors
    ///
    /// Returns [`SchedulerError::InvalidOptions`] for a zero interval or page size.
    pub fn new(options: SyncOptions, ports: SyncEnginePorts) -> SchedulerResult<Self> {
        options.validate().map_err(SchedulerError::InvalidOptions)?;

        let SyncEnginePorts { probe, fetcher, error_store, connectivity } = ports;
        let (state, _) = watch::channel(SyncState::default());

        Ok(Self {
            inner: Arc::new(EngineInner {
                options,
                probe,
                fetcher,
                classifier: ErrorClassifier::new(connectivity),
                error_log: ErrorLog::new(error_store),
                retry_policy: RetryPolicy::default(),
                state,
                lifecycle: Mutex::new(Lifecycle {
                    status: EngineStatus::Idle,
                    generation: 0,
                    cancellation: CancellationToken::new(),
                    timer: None,
                }),
                in_flight: Mutex::new(None),
                next_pass_id: AtomicU64::new(1),
            }),
        })
    }

    /// Replace the policy used by [`fetch_with_retry`](Self::fetch_with_retry).
    ///
    /// Only valid before the engine is shared.
    #[must_use]
    pub fn with_retry_policy(mut self, policy: RetryPolicy) -> Self {
        if let Some(inner) = Arc::get_mut(&mut self.inner) {
            inner.retry_policy = policy;
        } else {
            warn!("retry policy ignored: engine already shared");
        }
        self
    }

    /// Start the engine.
    ///
    /// With auto-sync enabled this runs one pass immediately and arms the
    /// interval timer. Without it the engine stays idle and only syncs on
    /// demand. Starting a stopped engine resets its state.
    ///
    /// # Errors
    ///
    /// Returns [`SchedulerError::AlreadyRunning`] if the timer is armed.
    #[instrument(skip(self), fields(auto_sync = self.inner.options.auto_sync))]
    pub fn start(&self) -> SchedulerResult<()> {
        let mut lifecycle = self.inner.lifecycle.lock();
        match lifecycle.status {
            EngineStatus::Running => return Err(SchedulerError::AlreadyRunning),
            EngineStatus::Stopped => {
                self.inner.state.send_replace(SyncState::default());
                lifecycle.status = EngineStatus::Idle;
            }
            EngineStatus::Idle => {}
        }

        if !self.inner.options.auto_sync {
            info!("Calendar sync engine started in manual mode");
            return Ok(());
        }

        lifecycle.status = EngineStatus::Running;
        lifecycle.cancellation = CancellationToken::new();
        let cancel = lifecycle.cancellation.clone();
        let interval = self.inner.options.interval;
        let engine = Arc::downgrade(&self.inner);
        lifecycle.timer = Some(tokio::spawn(Self::timer_loop(engine, interval, cancel)));
        drop(lifecycle);

        info!(interval_secs = interval.as_secs(), "Calendar sync engine started");
        Ok(())
    }

    /// Stop the engine.
    ///
    /// Disarms the timer and invalidates any pass in flight; its network
    /// calls complete but their results are discarded. Callbacks are skipped
    /// for passes stopped before notifying; a callback already running when
    /// `stop()` is called is not interrupted.
    ///
    /// # Errors
    ///
    /// Returns [`SchedulerError::NotRunning`] if already stopped, or a
    /// timeout/join error if the timer task does not wind down.
    #[instrument(skip(self))]
    pub async fn stop(&self) -> SchedulerResult<()> {
        let timer = {
            let mut lifecycle = self.inner.lifecycle.lock();
            if lifecycle.status == EngineStatus::Stopped {
                return Err(SchedulerError::NotRunning);
            }
            lifecycle.status = EngineStatus::Stopped;
            lifecycle.generation += 1;
            lifecycle.cancellation.cancel();
            lifecycle.timer.take()
        };
        self.inner.in_flight.lock().take();

        if let Some(handle) = timer {
            tokio::time::timeout(STOP_JOIN_TIMEOUT, handle)
                .await
                .map_err(|_| SchedulerError::Timeout { duration: STOP_JOIN_TIMEOUT })??;
        }

        info!("Calendar sync engine stopped");
        Ok(())
    }

    /// Run a pass with `query`, or join the pass already in flight.
    pub async fn trigger_sync(&self, query: EventQuery) -> SyncOutcome {
        match self.begin_pass(query) {
            Some(handle) => handle.await,
            None => SyncOutcome::Discarded,
        }
    }

    /// Run a pass with `query`, defaulting to the configured page size.
    pub async fn sync_now(&self, query: Option<EventQuery>) -> SyncOutcome {
        let query = query.unwrap_or_else(|| self.default_query());
        self.trigger_sync(query).await
    }

    /// Sync the events of the current day.
    pub async fn sync_today(&self) -> SyncOutcome {
        let query = EventQuery::today().with_max_results(self.inner.options.max_results);
        self.trigger_sync(query).await
    }

    /// Sync every event of `month` (1-12) in `year`.
    ///
    /// # Errors
    ///
    /// Returns [`CalSyncError::InvalidInput`] for an invalid month, without
    /// touching the network.
    pub async fn sync_month(&self, year: i32, month: u32) -> Result<SyncOutcome, CalSyncError> {
        let query = EventQuery::month(year, month)?.with_max_results(self.inner.options.max_results);
        Ok(self.trigger_sync(query).await)
    }

    /// Probe the integration status and publish it as `connected`.
    #[instrument(skip(self))]
    pub async fn check_connection(&self) -> bool {
        let generation = self.inner.current_generation();
        let connected = self.inner.probe.check().await;
        self.inner.apply_if_current(generation, |state| state.connected = connected);
        debug!(connected, "Connection checked");
        connected
    }

    /// Fetch once outside the pass machinery, retrying recoverable failures.
    ///
    /// Does not touch [`SyncState`]. The final failure is recorded in the
    /// error log.
    pub async fn fetch_with_retry(
        &self,
        query: EventQuery,
    ) -> Result<Vec<CalendarEvent>, ClassifiedError> {
        let fetcher = &self.inner.fetcher;
        let query = &query;
        let result = run_with_retry(&self.inner.retry_policy, &self.inner.classifier, move || {
            fetcher.fetch(query)
        })
        .await;
        if let Err(error) = &result {
            self.inner.record_error(CONTEXT_RETRY, error).await;
        }
        result
    }

    /// Snapshot of the current state.
    pub fn state(&self) -> SyncState {
        self.inner.state.borrow().clone()
    }

    /// Receiver notified on every state change.
    pub fn subscribe(&self) -> watch::Receiver<SyncState> {
        self.inner.state.subscribe()
    }

    pub fn status(&self) -> EngineStatus {
        self.inner.lifecycle.lock().status
    }

    /// Whether a pass is in flight.
    pub fn is_syncing(&self) -> bool {
        self.inner.in_flight.lock().is_some()
    }

    pub fn error_log(&self) -> &ErrorLog {
        &self.inner.error_log
    }

    pub fn classifier(&self) -> &ErrorClassifier {
        &self.inner.classifier
    }

    pub fn retry_policy(&self) -> &RetryPolicy {
        &self.inner.retry_policy
    }

    fn default_query(&self) -> EventQuery {
        EventQuery::default().with_max_results(self.inner.options.max_results)
    }

    /// Join the in-flight pass or spawn a new one. `None` once stopped.
    fn begin_pass(&self, query: EventQuery) -> Option<PassHandle> {
        let generation = {
            let lifecycle = self.inner.lifecycle.lock();
            if lifecycle.status == EngineStatus::Stopped {
                debug!("Sync requested on stopped engine");
                return None;
            }
            lifecycle.generation
        };

        let mut slot = self.inner.in_flight.lock();
        if let Some(in_flight) = slot.as_ref() {
            debug!(pass_id = in_flight.pass_id, "Sync already in flight; joining");
            return Some(in_flight.handle.clone());
        }

        let pass_id = self.inner.next_pass_id.fetch_add(1, Ordering::Relaxed);
        let inner = Arc::clone(&self.inner);
        let task = tokio::spawn(async move {
            let outcome = inner.run_pass(pass_id, generation, query).await;
            inner.finish_pass(pass_id);
            outcome
        });
        let handle = async move {
            task.await.unwrap_or_else(|err| {
                warn!(pass_id, error = %err, "Sync pass task failed");
                SyncOutcome::Aborted(err.to_string())
            })
        }
        .boxed()
        .shared();

        *slot = Some(InFlight { pass_id, handle: handle.clone() });
        Some(handle)
    }

    async fn timer_loop(engine: Weak<EngineInner>, interval: Duration, cancel: CancellationToken) {
        if !Self::tick(&engine) {
            return;
        }

        // Intervals past the clock's range never tick again.
        let first_tick = Instant::now()
            .checked_add(interval)
            .filter(|first| first.checked_add(interval).is_some());
        let Some(first_tick) = first_tick else {
            warn!(interval_secs = interval.as_secs(), "Sync interval out of range; timer parked");
            cancel.cancelled().await;
            return;
        };
        let mut ticker = tokio::time::interval_at(first_tick, interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                () = cancel.cancelled() => {
                    debug!("Sync timer cancelled");
                    break;
                }
                _ = ticker.tick() => {
                    if !Self::tick(&engine) {
                        break;
                    }
                }
            }
        }
    }

    /// Fire one scheduled pass. `false` once the engine is gone.
    fn tick(engine: &Weak<EngineInner>) -> bool {
        let Some(inner) = engine.upgrade() else {
            return false;
        };
        let engine = Self { inner };
        let query = engine.default_query();
        // Scheduled passes are fire-and-forget.
        drop(engine.begin_pass(query));
        true
    }
}

impl EngineInner {
    #[instrument(skip(self, query))]
    async fn run_pass(&self, pass_id: u64, generation: u64, query: EventQuery) -> SyncOutcome {
        if !self.apply_if_current(generation, |state| state.is_loading = true) {
            return SyncOutcome::Discarded;
        }

        let connected = self.probe.check().await;
        if !self.is_current(generation) {
            debug!("Discarding stale pass after connection probe");
            return SyncOutcome::Discarded;
        }

        if !connected {
            let error = self.classifier.classify(&SyncFailure::integration_required());
            let applied = self.apply_if_current(generation, |state| {
                state.connected = false;
                state.is_loading = false;
                state.error = Some(error.user_message().to_string());
            });
            if !applied {
                return SyncOutcome::Discarded;
            }
            info!(code = %error.code(), "Calendar integration not connected");
            if self.is_current(generation) {
                self.notify_error(error.user_message());
            }
            return SyncOutcome::NotConnected(error);
        }

        let result = self.fetcher.fetch(&query).await;
        if !self.is_current(generation) {
            debug!("Discarding stale pass after event fetch");
            return SyncOutcome::Discarded;
        }

        match result {
            Ok(events) => {
                let event_count = events.len();
                let applied = self.apply_if_current(generation, |state| {
                    state.events = events.clone();
                    state.last_synced = Some(Utc::now());
                    state.connected = true;
                    state.error = None;
                    state.is_loading = false;
                });
                if !applied {
                    return SyncOutcome::Discarded;
                }
                info!(event_count, "Calendar events synced");
                if let Some(on_success) = &self.options.on_success {
                    if self.is_current(generation) {
                        on_success(&events);
                    }
                }
                SyncOutcome::Synced { event_count }
            }
            Err(failure) => {
                let error = self.classifier.classify(&failure);
                let disconnect = error.code().requires_reauthorization();
                let applied = self.apply_if_current(generation, |state| {
                    if disconnect {
                        state.connected = false;
                    }
                    state.error = Some(error.user_message().to_string());
                    state.is_loading = false;
                });
                if !applied {
                    return SyncOutcome::Discarded;
                }
                warn!(code = %error.code(), raw = error.raw_message(), "Calendar sync failed");
                self.record_error(CONTEXT_FETCH_EVENTS, &error).await;
                if self.is_current(generation) {
                    self.notify_error(error.user_message());
                }
                SyncOutcome::Failed(error)
            }
        }
    }

    fn finish_pass(&self, pass_id: u64) {
        let mut slot = self.in_flight.lock();
        if slot.as_ref().is_some_and(|in_flight| in_flight.pass_id == pass_id) {
            *slot = None;
        }
    }

    /// Persist `error` on the blocking pool; the journal does file I/O.
    async fn record_error(&self, context: &'static str, error: &ClassifiedError) {
        let log = self.error_log.clone();
        let error = error.clone();
        let write = tokio::task::spawn_blocking(move || log.record(context, &error));
        if let Err(err) = write.await {
            warn!(context, error = %err, "Error log write task failed");
        }
    }

    fn notify_error(&self, message: &str) {
        if let Some(on_error) = &self.options.on_error {
            on_error(message);
        }
    }

    fn current_generation(&self) -> u64 {
        self.lifecycle.lock().generation
    }

    fn is_current(&self, generation: u64) -> bool {
        let lifecycle = self.lifecycle.lock();
        lifecycle.generation == generation && lifecycle.status != EngineStatus::Stopped
    }

    /// Mutate state only if the pass still belongs to a live engine generation.
    fn apply_if_current(&self, generation: u64, update: impl FnOnce(&mut SyncState)) -> bool {
        let lifecycle = self.lifecycle.lock();
        if lifecycle.generation != generation || lifecycle.status == EngineStatus::Stopped {
            return false;
        }
        self.state.send_modify(update);
        drop(lifecycle);
        true
    }
}
