// Backend timestamps: RFC 3339, naive "YYYY-MM-DD HH:MM:SS" (taken as UTC), or epoch numbers.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TimestampError {
    #[error("empty timestamp")]
    Empty,
    #[error("unrecognized timestamp format: {0:?}")]
    Unrecognized(String),
    #[error("epoch value out of range: {0}")]
    OutOfRange(i64),
}

/// Offset-carrying formats that RFC 3339 parsing does not cover (space separator).
const OFFSET_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S%.f%:z", "%Y-%m-%d %H:%M:%S%.f%z"];

const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
];

/// Epoch magnitudes at or above this are milliseconds (year 5138 in seconds).
const EPOCH_MILLIS_THRESHOLD: i64 = 100_000_000_000;

pub fn parse_timestamp(s: &str) -> Result<DateTime<Utc>, TimestampError> {
    let s = s.trim();
    if s.is_empty() {
        return Err(TimestampError::Empty);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }
    for fmt in OFFSET_FORMATS {
        if let Ok(dt) = DateTime::parse_from_str(s, fmt) {
            return Ok(dt.with_timezone(&Utc));
        }
    }
    for fmt in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
            return Ok(naive.and_utc());
        }
    }
    if let Ok(n) = s.parse::<i64>() {
        return from_epoch(n);
    }
    if let Ok(f) = s.parse::<f64>() {
        return from_epoch_f64(f).ok_or_else(|| TimestampError::Unrecognized(s.to_string()));
    }
    Err(TimestampError::Unrecognized(s.to_string()))
}

/// Epoch seconds, or milliseconds when the magnitude says so.
pub fn from_epoch(n: i64) -> Result<DateTime<Utc>, TimestampError> {
    let dt = if n.unsigned_abs() >= EPOCH_MILLIS_THRESHOLD as u64 {
        DateTime::from_timestamp_millis(n)
    } else {
        DateTime::from_timestamp(n, 0)
    };
    dt.ok_or(TimestampError::OutOfRange(n))
}

fn from_epoch_f64(f: f64) -> Option<DateTime<Utc>> {
    if !f.is_finite() {
        return None;
    }
    if f.abs() >= EPOCH_MILLIS_THRESHOLD as f64 {
        DateTime::from_timestamp_millis(f.round() as i64)
    } else {
        DateTime::from_timestamp_millis((f * 1000.0).round() as i64)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawTimestamp {
    Int(i64),
    Float(f64),
    Text(String),
}

/// `deserialize_with` helper for timestamp fields.
pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let parsed = match RawTimestamp::deserialize(deserializer)? {
        RawTimestamp::Int(n) => from_epoch(n),
        RawTimestamp::Float(f) => {
            from_epoch_f64(f).ok_or_else(|| TimestampError::Unrecognized(f.to_string()))
        }
        RawTimestamp::Text(s) => parse_timestamp(&s),
    };
    parsed.map_err(serde::de::Error::custom)
}
