// Shared test helpers: a scripted backend and sample data

#![allow(dead_code)]

use airguard::models::*;
use airguard::source::{DASHBOARD_PATH, FetchError, TelemetrySource};
use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

pub fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 1, 14, 14, 0, 0).unwrap()
}

/// The reading from the "moderate day" scenario.
pub fn moderate_reading() -> Reading {
    Reading {
        aqi: 55.0,
        pm25: 30.2,
        pm10: 60.1,
        humidity: 70.0,
        visibility: 3.5,
        timestamp: t0(),
        hazard_level: HazardLevel::Low,
        health_recommendations: vec![],
    }
}

pub fn history(hours: u32) -> Vec<HistoricalPoint> {
    (0..hours)
        .map(|h| HistoricalPoint {
            timestamp: Utc.with_ymd_and_hms(2025, 1, 14, h, 0, 0).unwrap(),
            pm25: 20.0 + h as f64,
            temp: 10.0 + h as f64 * 0.5,
            humidity: 65.0,
            windspeed: 1.5,
            aqi: 68.0 + h as f64,
        })
        .collect()
}

pub fn distribution() -> Vec<HourlyAqiBucket> {
    vec![
        HourlyAqiBucket {
            hour: "08:00".into(),
            count: 30,
            category: "Unhealthy".into(),
            aqi: 162.0,
        },
        HourlyAqiBucket {
            hour: "03:00".into(),
            count: 30,
            category: "Moderate".into(),
            aqi: 88.0,
        },
    ]
}

pub fn http_500(endpoint: &'static str) -> FetchError {
    FetchError::Http {
        endpoint,
        status: 500,
    }
}

/// Backend double: each endpoint returns whatever it is currently set to.
pub struct FakeSource {
    pub reading: Mutex<Result<Reading, FetchError>>,
    pub historical: Mutex<Result<Vec<HistoricalPoint>, FetchError>>,
    pub distribution: Mutex<Result<Vec<HourlyAqiBucket>, FetchError>>,
    pub primary_delay: Mutex<Duration>,
    /// Per-call overrides for the primary, consumed in call order.
    pub primary_script: Mutex<VecDeque<(Duration, Result<Reading, FetchError>)>>,
    pub primary_calls: AtomicUsize,
    /// Primary fetches that ran to completion (not dropped mid-delay).
    pub primary_completed: AtomicUsize,
    pub secondary_calls: AtomicUsize,
}

impl FakeSource {
    /// Every endpoint succeeds.
    pub fn healthy() -> Self {
        Self {
            reading: Mutex::new(Ok(moderate_reading())),
            historical: Mutex::new(Ok(history(24))),
            distribution: Mutex::new(Ok(distribution())),
            primary_delay: Mutex::new(Duration::ZERO),
            primary_script: Mutex::new(VecDeque::new()),
            primary_calls: AtomicUsize::new(0),
            primary_completed: AtomicUsize::new(0),
            secondary_calls: AtomicUsize::new(0),
        }
    }

    pub fn set_reading(&self, value: Result<Reading, FetchError>) {
        *self.reading.lock().unwrap() = value;
    }

    pub fn set_historical(&self, value: Result<Vec<HistoricalPoint>, FetchError>) {
        *self.historical.lock().unwrap() = value;
    }

    pub fn set_distribution(&self, value: Result<Vec<HourlyAqiBucket>, FetchError>) {
        *self.distribution.lock().unwrap() = value;
    }

    pub fn set_primary_delay(&self, delay: Duration) {
        *self.primary_delay.lock().unwrap() = delay;
    }

    /// The next primary call waits `delay`, then returns `value`.
    pub fn script_primary(&self, delay: Duration, value: Result<Reading, FetchError>) {
        self.primary_script.lock().unwrap().push_back((delay, value));
    }

    pub fn fail_primary(&self) {
        self.set_reading(Err(http_500(DASHBOARD_PATH)));
    }
}

#[async_trait]
impl TelemetrySource for FakeSource {
    async fn fetch_reading(&self) -> Result<Reading, FetchError> {
        self.primary_calls.fetch_add(1, Ordering::SeqCst);
        let scripted = self.primary_script.lock().unwrap().pop_front();
        let (delay, result) = match scripted {
            Some(step) => step,
            None => (
                *self.primary_delay.lock().unwrap(),
                self.reading.lock().unwrap().clone(),
            ),
        };
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        self.primary_completed.fetch_add(1, Ordering::SeqCst);
        result
    }

    async fn fetch_historical(&self) -> Result<Vec<HistoricalPoint>, FetchError> {
        self.secondary_calls.fetch_add(1, Ordering::SeqCst);
        self.historical.lock().unwrap().clone()
    }

    async fn fetch_distribution(&self) -> Result<Vec<HourlyAqiBucket>, FetchError> {
        self.secondary_calls.fetch_add(1, Ordering::SeqCst);
        self.distribution.lock().unwrap().clone()
    }
}
