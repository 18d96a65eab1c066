// Backend access over HTTP via reqwest

use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;

use super::{DASHBOARD_PATH, DISTRIBUTION_PATH, FetchError, HISTORICAL_PATH, TelemetrySource};
use crate::models::{HistoricalPoint, HourlyAqiBucket, Reading};
use crate::version::{NAME, VERSION};

pub struct HttpSource {
    client: reqwest::Client,
    base_url: String,
    timeout: Duration,
}

impl HttpSource {
    /// Client for `base_url` (e.g. "http://localhost:8000"); every request is
    /// bounded by `timeout`.
    pub fn new(base_url: &str, timeout: Duration) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(format!("{NAME}/{VERSION}"))
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn get_json<T: DeserializeOwned>(&self, endpoint: &'static str) -> Result<T, FetchError> {
        let response = self
            .client
            .get(self.url(endpoint))
            .send()
            .await
            .map_err(|e| self.transport_error(endpoint, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Http {
                endpoint,
                status: status.as_u16(),
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| self.transport_error(endpoint, e))?;
        serde_json::from_slice(&body).map_err(|e| FetchError::Decode {
            endpoint,
            message: e.to_string(),
        })
    }

    fn transport_error(&self, endpoint: &'static str, e: reqwest::Error) -> FetchError {
        if e.is_timeout() {
            FetchError::Timeout {
                endpoint,
                timeout_ms: self.timeout.as_millis() as u64,
            }
        } else {
            FetchError::Transport {
                endpoint,
                message: e.to_string(),
            }
        }
    }
}

#[async_trait]
impl TelemetrySource for HttpSource {
    async fn fetch_reading(&self) -> Result<Reading, FetchError> {
        self.get_json(DASHBOARD_PATH).await
    }

    async fn fetch_historical(&self) -> Result<Vec<HistoricalPoint>, FetchError> {
        self.get_json(HISTORICAL_PATH).await
    }

    async fn fetch_distribution(&self) -> Result<Vec<HourlyAqiBucket>, FetchError> {
        self.get_json(DISTRIBUTION_PATH).await
    }
}
