// Primary reading (GET /api/dashboard) and the upstream hazard level

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::timestamp;

/// Upstream hazard label, ordered from benign to worst.
///
/// Parsed case-insensitively. Labels the client does not know keep their
/// upstream text and sort above every known level, so they are never
/// mistaken for `Low`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum HazardLevel {
    Low,
    Moderate,
    High,
    Unrecognized(String),
}

impl HazardLevel {
    /// Parse from the backend label (e.g. "Low", "high").
    pub fn from_label(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "low" => HazardLevel::Low,
            "moderate" | "medium" => HazardLevel::Moderate,
            "high" => HazardLevel::High,
            _ => HazardLevel::Unrecognized(s.trim().to_string()),
        }
    }

    /// Canonical name for known levels, the upstream text otherwise.
    pub fn as_str(&self) -> &str {
        match self {
            HazardLevel::Low => "Low",
            HazardLevel::Moderate => "Moderate",
            HazardLevel::High => "High",
            HazardLevel::Unrecognized(label) => label,
        }
    }

    /// Anything but `Low` warrants a precaution banner.
    pub fn is_elevated(&self) -> bool {
        *self > HazardLevel::Low
    }
}

impl std::fmt::Display for HazardLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for HazardLevel {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for HazardLevel {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let label = String::deserialize(deserializer)?;
        Ok(HazardLevel::from_label(&label))
    }
}

/// Current conditions plus model-derived health guidance.
///
/// Replaced wholesale on each successful poll. A missing field fails
/// deserialization, which the poller treats as an absent reading.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reading {
    pub aqi: f64,
    /// PM2.5 concentration in µg/m³.
    pub pm25: f64,
    /// PM10 concentration in µg/m³.
    pub pm10: f64,
    /// Relative humidity, 0–100.
    pub humidity: f64,
    /// Visibility in km.
    pub visibility: f64,
    #[serde(deserialize_with = "timestamp::deserialize")]
    pub timestamp: DateTime<Utc>,
    pub hazard_level: HazardLevel,
    pub health_recommendations: Vec<String>,
}
