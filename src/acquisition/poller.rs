// Background acquisition task.
// The task owns the snapshot; each poll cycle runs as its own task and reports
// back over a channel, so overlapping cycles never touch the snapshot directly.
// Consumers subscribe through a watch channel.

use std::sync::Arc;

use tokio::sync::{mpsc, watch};
use tokio::time::{Duration, Instant, interval, interval_at};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument, warn};

use super::cycle::{Event, run_cycle};
use super::snapshot::{CycleId, DashboardSnapshot, Transition};
use crate::source::TelemetrySource;

/// Three events per cycle; room for a few overlapping cycles.
const EVENT_CHANNEL_CAPACITY: usize = 32;

/// Poll counters, logged every `stats_log_interval_secs`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PollStats {
    pub cycles_started: u64,
    pub primary_failures: u64,
    pub secondary_failures: u64,
    pub stale_discarded: u64,
}

/// The acquisition state machine: the snapshot plus cycle bookkeeping.
#[derive(Debug, Default)]
pub struct Acquisition {
    snapshot: DashboardSnapshot,
    last_cycle: CycleId,
    stats: PollStats,
}

impl Acquisition {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resume from an existing snapshot; new cycles number after its latest write.
    pub fn with_snapshot(snapshot: DashboardSnapshot) -> Self {
        let last_cycle = snapshot.latest_cycle();
        Self {
            snapshot,
            last_cycle,
            stats: PollStats::default(),
        }
    }

    pub fn snapshot(&self) -> &DashboardSnapshot {
        &self.snapshot
    }

    pub fn stats(&self) -> PollStats {
        self.stats
    }

    /// Allocates the next cycle id.
    pub fn begin_cycle(&mut self) -> CycleId {
        self.last_cycle += 1;
        self.stats.cycles_started += 1;
        self.last_cycle
    }

    /// Applies one fetch result. Secondary failures are logged and swallowed.
    pub fn apply(&mut self, event: Event) -> Transition {
        let transition = match event {
            Event::Primary {
                cycle,
                result: Ok(reading),
            } => self.snapshot.apply_primary_success(cycle, reading),
            Event::Primary {
                cycle,
                result: Err(e),
            } => {
                self.stats.primary_failures += 1;
                warn!(
                    cycle,
                    error = %e,
                    operation = "fetch_dashboard",
                    "dashboard fetch failed"
                );
                self.snapshot.apply_primary_failure(cycle, e.to_string())
            }
            Event::Historical {
                cycle,
                result: Ok(points),
            } => self.snapshot.apply_historical(cycle, points),
            Event::Historical {
                cycle,
                result: Err(e),
            } => {
                self.stats.secondary_failures += 1;
                warn!(
                    cycle,
                    error = %e,
                    operation = "fetch_historical",
                    "historical data not available"
                );
                Transition::Unchanged
            }
            Event::Distribution {
                cycle,
                result: Ok(buckets),
            } => self.snapshot.apply_distribution(cycle, buckets),
            Event::Distribution {
                cycle,
                result: Err(e),
            } => {
                self.stats.secondary_failures += 1;
                warn!(
                    cycle,
                    error = %e,
                    operation = "fetch_distribution",
                    "AQI distribution data not available"
                );
                Transition::Unchanged
            }
        };
        if let Transition::Discarded { latest } = transition {
            self.stats.stale_discarded += 1;
            debug!(latest, "discarded result from an older poll cycle");
        }
        transition
    }

    /// Runs one full cycle inline and applies its results.
    pub async fn poll_once<S>(&mut self, source: &S, fetch_timeout: Duration) -> &DashboardSnapshot
    where
        S: TelemetrySource + ?Sized,
    {
        let cycle = self.begin_cycle();
        let (tx, mut rx) = mpsc::channel(EVENT_CHANNEL_CAPACITY);
        run_cycle(source, cycle, fetch_timeout, &tx).await;
        drop(tx);
        while let Some(event) = rx.recv().await {
            let _ = self.apply(event);
        }
        &self.snapshot
    }
}

/// Source, publication channel, and lifetime token for the poller.
pub struct PollerDeps<S: ?Sized> {
    pub source: Arc<S>,
    pub snapshot_tx: watch::Sender<DashboardSnapshot>,
    /// Cancelling stops the timer and abandons in-flight cycles.
    pub shutdown: CancellationToken,
}

/// Poll timing config.
#[derive(Debug, Clone)]
pub struct PollerConfig {
    pub interval_ms: u64,
    pub fetch_timeout_ms: u64,
    pub stats_log_interval_secs: u64,
}

/// Spawns the acquisition task. The first cycle starts immediately, then one every `interval_ms`.
pub fn spawn<S>(deps: PollerDeps<S>, config: PollerConfig) -> tokio::task::JoinHandle<()>
where
    S: TelemetrySource + ?Sized + 'static,
{
    tokio::spawn(async move { run(deps, config).await })
}

#[instrument(skip_all, fields(interval_ms = config.interval_ms))]
async fn run<S>(deps: PollerDeps<S>, config: PollerConfig)
where
    S: TelemetrySource + ?Sized + 'static,
{
    let PollerDeps {
        source,
        snapshot_tx,
        shutdown,
    } = deps;
    let fetch_timeout = Duration::from_millis(config.fetch_timeout_ms);
    let stats_log_interval = Duration::from_secs(config.stats_log_interval_secs);

    let mut acquisition = Acquisition::new();
    snapshot_tx.send_replace(acquisition.snapshot().clone());

    let (event_tx, mut event_rx) = mpsc::channel::<Event>(EVENT_CHANNEL_CAPACITY);
    let mut tick = interval(Duration::from_millis(config.interval_ms));
    tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
    let mut stats_log_tick = interval_at(Instant::now() + stats_log_interval, stats_log_interval);
    stats_log_tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            biased;
            _ = shutdown.cancelled() => {
                debug!("acquisition shutting down");
                break;
            }
            Some(event) = event_rx.recv() => {
                if acquisition.apply(event).is_applied() {
                    snapshot_tx.send_replace(acquisition.snapshot().clone());
                }
            }
            _ = tick.tick() => {
                let cycle = acquisition.begin_cycle();
                let source = source.clone();
                let events = event_tx.clone();
                let token = shutdown.clone();
                tokio::spawn(async move {
                    tokio::select! {
                        _ = token.cancelled() => {
                            debug!(cycle, "poll cycle abandoned");
                        }
                        _ = run_cycle(source.as_ref(), cycle, fetch_timeout, &events) => {}
                    }
                });
            }
            _ = stats_log_tick.tick() => {
                let stats = acquisition.stats();
                let snapshot = acquisition.snapshot();
                info!(
                    cycles_started = stats.cycles_started,
                    primary_failures = stats.primary_failures,
                    secondary_failures = stats.secondary_failures,
                    stale_discarded = stats.stale_discarded,
                    status = ?snapshot.status,
                    secondary_stale = snapshot.secondary_is_stale(),
                    "poll stats"
                );
            }
        }
    }
}
