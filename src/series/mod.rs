// Chart series projected from the snapshot's secondary data.
// Pure and recomputed per render; nothing here is cached or mutated.

mod format;

pub use format::{TooltipEntry, format_axis_time, format_tooltip, format_value};

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::models::{HistoricalPoint, HourlyAqiBucket};

pub const PM25_SERIES: &str = "PM2.5 (µg/m³)";
pub const TEMPERATURE_SERIES: &str = "Temperature (°C)";
pub const HUMIDITY_SERIES: &str = "Humidity (%)";
pub const AVERAGE_AQI_SERIES: &str = "Average AQI";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendPoint {
    pub timestamp: DateTime<Utc>,
    pub pm25: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnvironmentalPoint {
    pub timestamp: DateTime<Utc>,
    pub pm25: f64,
    pub temp: f64,
    pub humidity: f64,
}

impl TrendPoint {
    pub fn tooltip_entries(&self) -> Vec<TooltipEntry> {
        vec![TooltipEntry {
            timestamp: self.timestamp,
            series_name: PM25_SERIES.to_string(),
            value: self.pm25,
        }]
    }
}

impl EnvironmentalPoint {
    /// One entry per axis, in legend order.
    pub fn tooltip_entries(&self) -> Vec<TooltipEntry> {
        [
            (PM25_SERIES, self.pm25),
            (TEMPERATURE_SERIES, self.temp),
            (HUMIDITY_SERIES, self.humidity),
        ]
        .into_iter()
        .map(|(name, value)| TooltipEntry {
            timestamp: self.timestamp,
            series_name: name.to_string(),
            value,
        })
        .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HourlyBar {
    pub hour: String,
    pub aqi: f64,
}

/// PM2.5 over time for the single-metric trend chart.
///
/// Expects chronological input and keeps the delivered order. Samples with a
/// non-finite PM2.5 are skipped.
pub fn build_trend(historical: &[HistoricalPoint]) -> Vec<TrendPoint> {
    historical
        .iter()
        .filter(|p| p.pm25.is_finite())
        .map(|p| TrendPoint {
            timestamp: p.timestamp,
            pm25: p.pm25,
        })
        .collect()
}

/// PM2.5, temperature and humidity for the multi-axis chart.
pub fn build_environmental(historical: &[HistoricalPoint]) -> Vec<EnvironmentalPoint> {
    historical
        .iter()
        .filter(|p| p.pm25.is_finite() && p.temp.is_finite() && p.humidity.is_finite())
        .map(|p| EnvironmentalPoint {
            timestamp: p.timestamp,
            pm25: p.pm25,
            temp: p.temp,
            humidity: p.humidity,
        })
        .collect()
}

/// Hour/AQI pairs for the bar chart, in hour-of-day order.
///
/// Only projects fields; the averages come from upstream. Buckets whose label
/// is not an hour keep their relative order after the parsed ones.
pub fn build_hourly_averages(distribution: &[HourlyAqiBucket]) -> Vec<HourlyBar> {
    let mut buckets: Vec<&HourlyAqiBucket> = distribution
        .iter()
        .filter(|b| b.aqi.is_finite())
        .collect();
    buckets.sort_by_key(|b| b.hour_of_day().unwrap_or(u32::MAX));
    buckets
        .into_iter()
        .map(|b| HourlyBar {
            hour: b.hour.clone(),
            aqi: b.aqi,
        })
        .collect()
}
