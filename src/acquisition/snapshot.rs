// Dashboard snapshot and its transitions.
// Every write is tagged with the poll cycle that produced it; a result from an
// older cycle than a slice's last writer is discarded.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::models::{
    HistoricalPoint, HourlyAqiBucket, Reading, is_chronological, sort_chronologically,
};

/// Poll cycle identifier; starts at 1, 0 means "never written".
pub type CycleId = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Loading,
    Ready,
    Failed,
}

/// Outcome of applying one fetch result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use]
pub enum Transition {
    Applied,
    /// A newer cycle already wrote this slice.
    Discarded { latest: CycleId },
    /// Nothing to change (swallowed secondary failure).
    Unchanged,
}

impl Transition {
    pub fn is_applied(self) -> bool {
        self == Transition::Applied
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardSnapshot {
    pub status: Status,
    /// Last good reading. Kept when a later primary fetch fails.
    pub reading: Option<Reading>,
    pub historical: Vec<HistoricalPoint>,
    pub distribution: Vec<HourlyAqiBucket>,
    pub error: Option<String>,
    /// Cycle of the last applied primary outcome, success or failure.
    pub primary_cycle: CycleId,
    /// Cycle that produced `reading`.
    pub reading_cycle: CycleId,
    pub historical_cycle: CycleId,
    pub distribution_cycle: CycleId,
}

impl Default for DashboardSnapshot {
    fn default() -> Self {
        Self {
            status: Status::Loading,
            reading: None,
            historical: Vec::new(),
            distribution: Vec::new(),
            error: None,
            primary_cycle: 0,
            reading_cycle: 0,
            historical_cycle: 0,
            distribution_cycle: 0,
        }
    }
}

impl DashboardSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Highest cycle that has written any slice.
    pub fn latest_cycle(&self) -> CycleId {
        self.primary_cycle
            .max(self.historical_cycle)
            .max(self.distribution_cycle)
    }

    pub fn apply_primary_success(&mut self, cycle: CycleId, reading: Reading) -> Transition {
        if cycle < self.primary_cycle {
            return Transition::Discarded {
                latest: self.primary_cycle,
            };
        }
        self.reading = Some(reading);
        self.status = Status::Ready;
        self.error = None;
        self.primary_cycle = cycle;
        self.reading_cycle = cycle;
        Transition::Applied
    }

    /// Marks the snapshot failed. Reading and secondary slices are left as they were.
    pub fn apply_primary_failure(&mut self, cycle: CycleId, message: String) -> Transition {
        if cycle < self.primary_cycle {
            return Transition::Discarded {
                latest: self.primary_cycle,
            };
        }
        self.status = Status::Failed;
        self.error = Some(message);
        self.primary_cycle = cycle;
        Transition::Applied
    }

    /// Replaces the historical series, sorting it first if it arrived out of order.
    pub fn apply_historical(
        &mut self,
        cycle: CycleId,
        mut points: Vec<HistoricalPoint>,
    ) -> Transition {
        if cycle < self.historical_cycle {
            return Transition::Discarded {
                latest: self.historical_cycle,
            };
        }
        if !is_chronological(&points) {
            warn!(
                cycle,
                points = points.len(),
                operation = "apply_historical",
                "historical series not in chronological order; sorting"
            );
            sort_chronologically(&mut points);
        }
        self.historical = points;
        self.historical_cycle = cycle;
        Transition::Applied
    }

    pub fn apply_distribution(
        &mut self,
        cycle: CycleId,
        buckets: Vec<HourlyAqiBucket>,
    ) -> Transition {
        if cycle < self.distribution_cycle {
            return Transition::Discarded {
                latest: self.distribution_cycle,
            };
        }
        self.distribution = buckets;
        self.distribution_cycle = cycle;
        Transition::Applied
    }

    /// Historical series predates the current reading.
    pub fn historical_is_stale(&self) -> bool {
        self.reading.is_some() && self.historical_cycle < self.reading_cycle
    }

    /// Distribution predates the current reading.
    pub fn distribution_is_stale(&self) -> bool {
        self.reading.is_some() && self.distribution_cycle < self.reading_cycle
    }

    pub fn secondary_is_stale(&self) -> bool {
        self.historical_is_stale() || self.distribution_is_stale()
    }
}
