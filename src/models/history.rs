// Secondary series: last-24h samples (GET /api/historical) and hourly AQI averages (GET /api/aqi-distribution)

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::timestamp;

/// One historical sample. Sequences are expected in chronological order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoricalPoint {
    #[serde(deserialize_with = "timestamp::deserialize")]
    pub timestamp: DateTime<Utc>,
    pub pm25: f64,
    /// Temperature in °C.
    pub temp: f64,
    pub humidity: f64,
    pub windspeed: f64,
    pub aqi: f64,
}

/// Average AQI for one hour of the day, already averaged upstream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HourlyAqiBucket {
    /// Label such as "14:00".
    pub hour: String,
    /// Number of samples averaged; the backend may omit it.
    #[serde(default)]
    pub count: u32,
    pub category: String,
    pub aqi: f64,
}

impl HourlyAqiBucket {
    /// Hour of day parsed from the label ("14:00", "7"), if it is one.
    pub fn hour_of_day(&self) -> Option<u32> {
        let head = self.hour.trim().split(':').next()?;
        head.parse::<u32>().ok().filter(|h| *h < 24)
    }
}

/// True when timestamps never decrease.
pub fn is_chronological(points: &[HistoricalPoint]) -> bool {
    points.windows(2).all(|w| w[0].timestamp <= w[1].timestamp)
}

/// Stable sort by timestamp; equal timestamps keep their delivered order.
pub fn sort_chronologically(points: &mut [HistoricalPoint]) {
    points.sort_by_key(|p| p.timestamp);
}
