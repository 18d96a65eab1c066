// Fetch capability for the three backend endpoints

mod http;

pub use http::HttpSource;

use async_trait::async_trait;

use crate::models::{HistoricalPoint, HourlyAqiBucket, Reading};

pub const DASHBOARD_PATH: &str = "/api/dashboard";
pub const HISTORICAL_PATH: &str = "/api/historical";
pub const DISTRIBUTION_PATH: &str = "/api/aqi-distribution";

/// Why a fetch produced no data. `endpoint` is the request path.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FetchError {
    #[error("request to {endpoint} failed: {message}")]
    Transport {
        endpoint: &'static str,
        message: String,
    },
    #[error("request to {endpoint} timed out after {timeout_ms} ms")]
    Timeout {
        endpoint: &'static str,
        timeout_ms: u64,
    },
    #[error("{endpoint} returned HTTP {status}")]
    Http { endpoint: &'static str, status: u16 },
    #[error("malformed response from {endpoint}: {message}")]
    Decode {
        endpoint: &'static str,
        message: String,
    },
}

impl FetchError {
    /// Non-success HTTP status, as opposed to transport-level failure.
    pub fn is_http_status(&self) -> bool {
        matches!(self, FetchError::Http { .. })
    }
}

/// Read-only access to the backend. `fetch_reading` is the primary source;
/// the other two are optional and may fail without failing a poll cycle.
#[async_trait]
pub trait TelemetrySource: Send + Sync {
    async fn fetch_reading(&self) -> Result<Reading, FetchError>;

    async fn fetch_historical(&self) -> Result<Vec<HistoricalPoint>, FetchError>;

    async fn fetch_distribution(&self) -> Result<Vec<HourlyAqiBucket>, FetchError>;
}
