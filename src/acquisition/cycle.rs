// One poll cycle: primary fetch, then both secondaries concurrently.
// Results go back to the snapshot owner as events; nothing here mutates state.

use std::future::Future;

use tokio::sync::mpsc;
use tokio::time::Duration;

use super::snapshot::CycleId;
use crate::models::{HistoricalPoint, HourlyAqiBucket, Reading};
use crate::source::{
    DASHBOARD_PATH, DISTRIBUTION_PATH, FetchError, HISTORICAL_PATH, TelemetrySource,
};

/// A fetch result tagged with the cycle that issued it.
#[derive(Debug)]
pub enum Event {
    Primary {
        cycle: CycleId,
        result: Result<Reading, FetchError>,
    },
    Historical {
        cycle: CycleId,
        result: Result<Vec<HistoricalPoint>, FetchError>,
    },
    Distribution {
        cycle: CycleId,
        result: Result<Vec<HourlyAqiBucket>, FetchError>,
    },
}

impl Event {
    pub fn cycle(&self) -> CycleId {
        match self {
            Event::Primary { cycle, .. }
            | Event::Historical { cycle, .. }
            | Event::Distribution { cycle, .. } => *cycle,
        }
    }
}

/// Bounds `fetch` by `limit`; running out of time is a `FetchError::Timeout`.
pub async fn fetch_with_timeout<T>(
    endpoint: &'static str,
    limit: Duration,
    fetch: impl Future<Output = Result<T, FetchError>>,
) -> Result<T, FetchError> {
    match tokio::time::timeout(limit, fetch).await {
        Ok(result) => result,
        Err(_) => Err(FetchError::Timeout {
            endpoint,
            timeout_ms: limit.as_millis() as u64,
        }),
    }
}

/// Runs cycle `cycle` against `source`, sending each result as soon as it resolves.
/// Secondaries are only issued after the primary succeeded. Stops early if the
/// receiving side is gone.
pub async fn run_cycle<S>(
    source: &S,
    cycle: CycleId,
    fetch_timeout: Duration,
    events: &mpsc::Sender<Event>,
) where
    S: TelemetrySource + ?Sized,
{
    let result = fetch_with_timeout(DASHBOARD_PATH, fetch_timeout, source.fetch_reading()).await;
    let primary_ok = result.is_ok();
    if events.send(Event::Primary { cycle, result }).await.is_err() {
        tracing::debug!(cycle, "snapshot owner gone; dropping primary result");
        return;
    }
    if !primary_ok {
        return;
    }

    let historical = async {
        let result =
            fetch_with_timeout(HISTORICAL_PATH, fetch_timeout, source.fetch_historical()).await;
        if events.send(Event::Historical { cycle, result }).await.is_err() {
            tracing::debug!(cycle, "snapshot owner gone; dropping historical result");
        }
    };
    let distribution = async {
        let result =
            fetch_with_timeout(DISTRIBUTION_PATH, fetch_timeout, source.fetch_distribution())
                .await;
        if events.send(Event::Distribution { cycle, result }).await.is_err() {
            tracing::debug!(cycle, "snapshot owner gone; dropping distribution result");
        }
    };
    tokio::join!(historical, distribution);
}
