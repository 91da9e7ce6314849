//! The status monitor.
//!
//! [`StatusMonitor`] owns the polling schedule, the [`StatusTable`] and the
//! transition classifier. Every poll fetches a snapshot, diffs it against the
//! table, dispatches notification intents for genuine changes, records the
//! new statuses and finally hands the snapshot to the indicator hook.
//!
//! ## Lifecycle
//!
//! ```text
//!            start()                pause()
//!  Stopped ──────────▶ Running ──────────────▶ Paused
//!     ▲                  ▲  │                    │
//!     │ stop()           │  └────── stop() ──────┤
//!     └──────────────────┼───────────────────────┘
//!                        └──── resume() ─────────┘  (unless disabled by stop())
//! ```
//!
//! ## Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use std::time::Duration;
//! use pingwatch::{FileSource, LogNotifier, StatusMonitor};
//!
//! # tokio_test::block_on(async {
//! let monitor = StatusMonitor::builder(Arc::new(FileSource::new("status.json")))
//!     .notifier(Arc::new(LogNotifier))
//!     .interval(Duration::from_secs(5))
//!     .build();
//!
//! monitor.start().await;
//! # });
//! ```

mod classify;
mod table;

pub use classify::{classify, NotificationIntent};
pub use table::{StatusTable, Transition};

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use pingwatch_adapters::{AdapterError, ErrorKind};
use pingwatch_types::{EntityId, Snapshot, StatusValue};
use serde::Serialize;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{debug, error, info, warn};

use crate::duration::format_duration;
use crate::indicator::IndicatorRenderer;
use crate::notify::{LogNotifier, Notifier, Severity};
use crate::source::{EntityRefresher, StatusFetcher};

/// Default time between scheduled polls.
pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(10);

/// Shortest accepted polling interval; shorter ones are raised to it.
pub const MIN_INTERVAL: Duration = Duration::from_millis(100);

/// Default delay between a force-check request and its follow-up poll.
pub const DEFAULT_FORCE_CHECK_DELAY: Duration = Duration::from_secs(1);

/// Lifecycle state of a monitor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MonitorState {
    Stopped,
    Running,
    Paused,
}

/// Foreground/background state of the hosting session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    Visible,
    Hidden,
}

/// What a successful poll did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PollReport {
    /// Entities present in the snapshot.
    pub observed: usize,
    /// Entities whose status differed from the recorded one.
    pub changed: usize,
    /// Notifications dispatched.
    pub notified: usize,
}

/// Result of a single poll. Polls never fail outward.
#[derive(Debug)]
pub enum PollOutcome {
    /// The snapshot was applied to the table.
    Applied(PollReport),
    /// Fetching failed; nothing was changed.
    Abandoned(AdapterError),
    /// Another poll was still in flight.
    Skipped,
}

impl PollOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, PollOutcome::Applied(_))
    }

    pub fn report(&self) -> Option<&PollReport> {
        match self {
            PollOutcome::Applied(report) => Some(report),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct MonitorOptions {
    interval: Duration,
    force_check_delay: Duration,
}

struct Lifecycle {
    state: MonitorState,
    /// Set by `stop()`; blocks `resume()` until the next `start()`.
    disabled: bool,
    /// Present while a recurring schedule is active.
    stop_tx: Option<watch::Sender<bool>>,
}

impl Lifecycle {
    fn cancel_schedule(&mut self) {
        if let Some(stop_tx) = self.stop_tx.take() {
            let _ = stop_tx.send(true);
        }
    }
}

struct Inner {
    fetcher: Arc<dyn StatusFetcher>,
    refresher: Option<Arc<dyn EntityRefresher>>,
    notifier: Arc<dyn Notifier>,
    indicator: Option<Arc<dyn IndicatorRenderer>>,
    options: MonitorOptions,
    table: Mutex<StatusTable>,
    lifecycle: Mutex<Lifecycle>,
    in_flight: AtomicBool,
}

/// Polls a status source and notifies on connection state changes.
///
/// Cloning is cheap; clones share the same table and schedule.
#[derive(Clone)]
pub struct StatusMonitor {
    inner: Arc<Inner>,
}

impl StatusMonitor {
    /// Create a builder around the given status source.
    pub fn builder(fetcher: Arc<dyn StatusFetcher>) -> StatusMonitorBuilder {
        StatusMonitorBuilder::new(fetcher)
    }

    /// Start monitoring: poll once right away, then on every interval.
    ///
    /// Clears the disabled flag set by [`stop`](Self::stop). No-op while
    /// already running.
    pub async fn start(&self) {
        {
            let mut lifecycle = self.inner.lifecycle.lock();
            if lifecycle.state == MonitorState::Running {
                debug!(event = "monitor.start_skipped", reason = "already running");
                return;
            }
            lifecycle.state = MonitorState::Running;
            lifecycle.disabled = false;
        }

        info!(
            event = "monitor.started",
            source = self.inner.fetcher.description(),
            interval = %format_duration(self.inner.options.interval)
        );

        self.inner.poll().await;
        self.schedule();
    }

    /// Cancel the schedule, keeping recorded statuses. No-op unless running.
    ///
    /// A poll already in flight is allowed to finish and is applied.
    pub fn pause(&self) {
        let mut lifecycle = self.inner.lifecycle.lock();
        if lifecycle.state != MonitorState::Running {
            return;
        }
        lifecycle.cancel_schedule();
        lifecycle.state = MonitorState::Paused;
        info!(event = "monitor.paused");
    }

    /// Start again unless running or disabled by [`stop`](Self::stop).
    pub async fn resume(&self) {
        let resumable = {
            let lifecycle = self.inner.lifecycle.lock();
            lifecycle.state != MonitorState::Running && !lifecycle.disabled
        };
        if !resumable {
            debug!(event = "monitor.resume_skipped");
            return;
        }

        self.start().await;
        info!(event = "monitor.resumed");
    }

    /// Cancel the schedule and disable [`resume`](Self::resume) until the
    /// next explicit [`start`](Self::start).
    pub fn stop(&self) {
        let mut lifecycle = self.inner.lifecycle.lock();
        lifecycle.cancel_schedule();
        lifecycle.state = MonitorState::Stopped;
        lifecycle.disabled = true;
        info!(event = "monitor.stopped");
    }

    /// React to the hosting session moving to the background or foreground.
    pub async fn set_visibility(&self, visibility: Visibility) {
        match visibility {
            Visibility::Hidden => self.on_hidden(),
            Visibility::Visible => self.on_visible().await,
        }
    }

    /// The hosting session went to the background.
    pub fn on_hidden(&self) {
        self.pause();
    }

    /// The hosting session came back to the foreground.
    pub async fn on_visible(&self) {
        self.resume().await;
    }

    /// Fetch a snapshot and apply it. Never fails outward.
    pub async fn poll(&self) -> PollOutcome {
        self.inner.poll().await
    }

    /// Ask the backend to re-check one entity, then poll shortly after.
    ///
    /// Fire-and-forget: failures are logged. The returned handle may be
    /// awaited or dropped.
    pub fn force_check(&self, id: impl Into<EntityId>) -> JoinHandle<()> {
        let id = id.into();
        let inner = self.inner.clone();

        tokio::spawn(async move {
            let Some(refresher) = inner.refresher.clone() else {
                warn!(
                    event = "monitor.force_check_skipped",
                    id = %id,
                    reason = "no refresh endpoint configured"
                );
                return;
            };

            match refresher.request_refresh(&id).await {
                Ok(()) => {
                    debug!(event = "monitor.force_check_requested", id = %id);
                    tokio::time::sleep(inner.options.force_check_delay).await;
                    inner.poll().await;
                }
                Err(e) => {
                    warn!(event = "monitor.force_check_failed", id = %id, error = %e);
                }
            }
        })
    }

    /// Send a canned notification to verify the notifier wiring.
    pub fn send_test_notification(&self, severity: Severity) {
        let message = match severity {
            Severity::Success => "Test connection restored: Test Account",
            Severity::Warning => "Test connection error: Test Account",
            Severity::Error | Severity::Info => "Test connection failed: Test Account",
        };
        self.inner.notifier.notify(message, severity);
    }

    pub fn state(&self) -> MonitorState {
        self.inner.lifecycle.lock().state
    }

    /// True after [`stop`](Self::stop) until the next [`start`](Self::start).
    pub fn is_disabled(&self) -> bool {
        self.inner.lifecycle.lock().disabled
    }

    pub fn interval(&self) -> Duration {
        self.inner.options.interval
    }

    /// Copy of the current status table.
    pub fn statuses(&self) -> StatusTable {
        self.inner.table.lock().clone()
    }

    /// Last recorded status of one entity.
    pub fn status_of(&self, id: &EntityId) -> Option<StatusValue> {
        self.inner.table.lock().get(id).cloned()
    }

    fn schedule(&self) {
        let mut stop_rx = {
            let mut lifecycle = self.inner.lifecycle.lock();
            // paused or stopped during the initial poll
            if lifecycle.state != MonitorState::Running || lifecycle.stop_tx.is_some() {
                return;
            }
            let (stop_tx, stop_rx) = watch::channel(false);
            lifecycle.stop_tx = Some(stop_tx);
            stop_rx
        };

        let period = self.inner.options.interval;
        let inner = Arc::downgrade(&self.inner);

        tokio::spawn(async move {
            let mut ticker = interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    biased;
                    changed = stop_rx.changed() => {
                        if changed.is_err() || *stop_rx.borrow() {
                            break;
                        }
                    }
                    _ = ticker.tick() => {
                        let Some(inner) = inner.upgrade() else {
                            break;
                        };
                        inner.poll().await;
                    }
                }
            }

            debug!(event = "monitor.schedule_cancelled");
        });
    }
}

impl fmt::Debug for StatusMonitor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StatusMonitor")
            .field("source", &self.inner.fetcher.description())
            .field("state", &self.state())
            .field("interval", &self.inner.options.interval)
            .finish()
    }
}

impl Inner {
    async fn poll(&self) -> PollOutcome {
        let Some(_in_flight) = InFlight::acquire(&self.in_flight) else {
            debug!(event = "monitor.poll.skipped", reason = "in flight");
            return PollOutcome::Skipped;
        };

        let snapshot = match self.fetcher.fetch_snapshot().await {
            Ok(snapshot) => snapshot,
            Err(e) => {
                let kind = match e.kind() {
                    ErrorKind::Transport => "transport",
                    ErrorKind::Protocol => "protocol",
                };
                error!(
                    event = "monitor.poll.failed",
                    source = self.fetcher.description(),
                    kind = kind,
                    error = %e
                );
                return PollOutcome::Abandoned(e);
            }
        };

        let report = self.apply(&snapshot);

        if let Some(indicator) = &self.indicator {
            if let Err(e) = indicator.refresh(&snapshot).await {
                warn!(event = "monitor.indicator.refresh_failed", error = %e);
            }
        }

        debug!(
            event = "monitor.poll.completed",
            observed = report.observed,
            changed = report.changed,
            notified = report.notified
        );
        PollOutcome::Applied(report)
    }

    /// Diff the snapshot against the table and dispatch notifications.
    fn apply(&self, snapshot: &Snapshot) -> PollReport {
        let mut report = PollReport {
            observed: snapshot.len(),
            ..Default::default()
        };
        let mut intents = Vec::new();

        {
            let mut table = self.table.lock();
            for entity in snapshot.iter() {
                let first_seen = table.get(&entity.id).is_none();

                match table.observe(entity) {
                    Some(transition) => {
                        report.changed += 1;
                        let name = entity.display_name();
                        info!(
                            event = "monitor.status.changed",
                            name = %name,
                            from = %transition.from,
                            to = %transition.to
                        );
                        if let Some(intent) = classify(&name, &transition.from, &transition.to) {
                            intents.push(intent);
                        }
                    }
                    None if first_seen && entity.status != StatusValue::Connected => {
                        debug!(
                            event = "monitor.status.initial",
                            name = %entity.display_name(),
                            status = %entity.status
                        );
                    }
                    None => {}
                }
            }
        }

        // Dispatch outside the lock; notifiers may call back into the monitor
        for intent in intents {
            self.notifier.notify(&intent.message, intent.severity);
            report.notified += 1;
        }

        report
    }
}

/// Marks a poll as outstanding for as long as it is alive.
struct InFlight<'a>(&'a AtomicBool);

impl<'a> InFlight<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| InFlight(flag))
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Builder for configuring a StatusMonitor.
pub struct StatusMonitorBuilder {
    fetcher: Arc<dyn StatusFetcher>,
    refresher: Option<Arc<dyn EntityRefresher>>,
    notifier: Option<Arc<dyn Notifier>>,
    indicator: Option<Arc<dyn IndicatorRenderer>>,
    interval: Option<Duration>,
    force_check_delay: Option<Duration>,
}

impl StatusMonitorBuilder {
    pub fn new(fetcher: Arc<dyn StatusFetcher>) -> Self {
        Self {
            fetcher,
            refresher: None,
            notifier: None,
            indicator: None,
            interval: None,
            force_check_delay: None,
        }
    }

    /// Set the endpoint used by [`StatusMonitor::force_check`].
    pub fn refresher(mut self, refresher: Arc<dyn EntityRefresher>) -> Self {
        self.refresher = Some(refresher);
        self
    }

    /// Set the notifier (default: [`LogNotifier`]).
    pub fn notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = Some(notifier);
        self
    }

    /// Install an indicator hook called after every successful poll.
    pub fn indicator(mut self, indicator: Arc<dyn IndicatorRenderer>) -> Self {
        self.indicator = Some(indicator);
        self
    }

    /// Set the polling interval.
    ///
    /// Defaults to 10 seconds if not specified. Values below
    /// [`MIN_INTERVAL`] (including zero) are raised to it.
    pub fn interval(mut self, interval: Duration) -> Self {
        self.interval = Some(interval);
        self
    }

    /// Set the delay before the follow-up poll of a force check.
    ///
    /// Defaults to 1 second if not specified.
    pub fn force_check_delay(mut self, delay: Duration) -> Self {
        self.force_check_delay = Some(delay);
        self
    }

    /// Build the monitor in the `Stopped` state.
    pub fn build(self) -> StatusMonitor {
        let mut interval = self.interval.unwrap_or(DEFAULT_INTERVAL);
        if interval < MIN_INTERVAL {
            warn!(
                event = "monitor.interval_clamped",
                requested = %format_duration(interval),
                interval = %format_duration(MIN_INTERVAL)
            );
            interval = MIN_INTERVAL;
        }

        StatusMonitor {
            inner: Arc::new(Inner {
                fetcher: self.fetcher,
                refresher: self.refresher,
                notifier: self.notifier.unwrap_or_else(|| Arc::new(LogNotifier)),
                indicator: self.indicator,
                options: MonitorOptions {
                    interval,
                    force_check_delay: self.force_check_delay.unwrap_or(DEFAULT_FORCE_CHECK_DELAY),
                },
                table: Mutex::new(StatusTable::new()),
                lifecycle: Mutex::new(Lifecycle {
                    state: MonitorState::Stopped,
                    disabled: false,
                    stop_tx: None,
                }),
                in_flight: AtomicBool::new(false),
            }),
        }
    }
}
