use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, trace};

use super::{SimulationEventSink, SurfaceProvider};

/// Default polling period of the collector
pub const DEFAULT_TELEMETRY_INTERVAL: Duration = Duration::from_millis(1000);

/// What a single tick did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// A previous tick was still running
    Skipped,
    /// No surface was active
    NoSurface,
    /// The drain returned no events; the sink was not called
    Empty,
    /// A batch of this many events was forwarded
    Forwarded(usize),
    /// Obtaining or draining the surface failed; nothing was forwarded
    Suppressed,
}

/// Counters describing the collector's activity
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CollectorStats {
    pub ticks: u64,
    pub skipped: u64,
    pub batches_forwarded: u64,
    pub events_forwarded: u64,
    pub failures_suppressed: u64,
}

#[derive(Default)]
struct Counters {
    ticks: AtomicU64,
    skipped: AtomicU64,
    batches_forwarded: AtomicU64,
    events_forwarded: AtomicU64,
    failures_suppressed: AtomicU64,
}

/// Periodically drains the active preview surface into a sink
pub struct SimulationTelemetryCollector {
    provider: Arc<dyn SurfaceProvider>,
    sink: Arc<dyn SimulationEventSink>,
    interval: Duration,
    in_flight: AtomicBool,
    counters: Counters,
}

/// Clears the in-flight flag however the tick exits
struct InFlightGuard<'a>(&'a AtomicBool);

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl SimulationTelemetryCollector {
    pub fn new(provider: Arc<dyn SurfaceProvider>, sink: Arc<dyn SimulationEventSink>) -> Self {
        Self {
            provider,
            sink,
            interval: DEFAULT_TELEMETRY_INTERVAL,
            in_flight: AtomicBool::new(false),
            counters: Counters::default(),
        }
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Run one collection pass.
    ///
    /// Never fails: a missing surface, a drain error or a concurrent tear-down
    /// all end the tick without calling the sink.
    pub async fn tick(&self) -> TickOutcome {
        if self.in_flight.swap(true, Ordering::AcqRel) {
            self.counters.skipped.fetch_add(1, Ordering::Relaxed);
            trace!("Telemetry tick skipped, previous tick still running");
            return TickOutcome::Skipped;
        }
        let _guard = InFlightGuard(&self.in_flight);
        self.counters.ticks.fetch_add(1, Ordering::Relaxed);

        let surface = match self.provider.active_surface() {
            Ok(Some(surface)) => surface,
            Ok(None) => return TickOutcome::NoSurface,
            Err(e) => {
                self.counters
                    .failures_suppressed
                    .fetch_add(1, Ordering::Relaxed);
                debug!(error = %e, "Could not obtain preview surface");
                return TickOutcome::Suppressed;
            }
        };

        let events = match surface.drain().await {
            Ok(events) => events,
            Err(e) => {
                self.counters
                    .failures_suppressed
                    .fetch_add(1, Ordering::Relaxed);
                debug!(error = %e, "Could not drain preview surface");
                return TickOutcome::Suppressed;
            }
        };

        if events.is_empty() {
            return TickOutcome::Empty;
        }

        let count = events.len();
        self.sink.forward(events).await;
        self.counters
            .batches_forwarded
            .fetch_add(1, Ordering::Relaxed);
        self.counters
            .events_forwarded
            .fetch_add(count as u64, Ordering::Relaxed);
        trace!(count, "Forwarded simulation events");

        TickOutcome::Forwarded(count)
    }

    pub fn stats(&self) -> CollectorStats {
        CollectorStats {
            ticks: self.counters.ticks.load(Ordering::Relaxed),
            skipped: self.counters.skipped.load(Ordering::Relaxed),
            batches_forwarded: self.counters.batches_forwarded.load(Ordering::Relaxed),
            events_forwarded: self.counters.events_forwarded.load(Ordering::Relaxed),
            failures_suppressed: self.counters.failures_suppressed.load(Ordering::Relaxed),
        }
    }

    /// Spawn the periodic task on the current tokio runtime.
    ///
    /// The first tick fires one interval after start. Ticks missed while a
    /// slow tick runs are dropped rather than replayed.
    pub fn start(self: Arc<Self>) -> CollectorHandle {
        let cancel = CancellationToken::new();
        let task_cancel = cancel.child_token();
        let collector = Arc::clone(&self);

        info!(
            interval_ms = self.interval.as_millis() as u64,
            "Simulation telemetry collector started"
        );

        let task = tokio::spawn(async move {
            let period = collector.interval;
            let mut ticker = tokio::time::interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

            loop {
                tokio::select! {
                    biased;
                    _ = task_cancel.cancelled() => break,
                    _ = ticker.tick() => {
                        collector.tick().await;
                    }
                }
            }

            debug!("Simulation telemetry collector loop exited");
        });

        CollectorHandle {
            collector: self,
            cancel,
            task: Some(task),
        }
    }
}

/// Owner of a running collector task.
///
/// Dropping the handle cancels the task; [`stop`](Self::stop) also waits for
/// it to finish.
pub struct CollectorHandle {
    collector: Arc<SimulationTelemetryCollector>,
    cancel: CancellationToken,
    task: Option<JoinHandle<()>>,
}

impl CollectorHandle {
    pub fn collector(&self) -> &Arc<SimulationTelemetryCollector> {
        &self.collector
    }

    pub fn is_running(&self) -> bool {
        self.task.as_ref().is_some_and(|task| !task.is_finished())
    }

    /// Cancel the task and wait for an in-progress tick to complete
    pub async fn stop(mut self) -> CollectorStats {
        self.cancel.cancel();
        if let Some(task) = self.task.take() {
            if let Err(e) = task.await {
                debug!(error = %e, "Telemetry collector task ended abnormally");
            }
        }
        let stats = self.collector.stats();
        info!(
            ticks = stats.ticks,
            batches = stats.batches_forwarded,
            events = stats.events_forwarded,
            "Simulation telemetry collector stopped"
        );
        stats
    }
}

impl Drop for CollectorHandle {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}
