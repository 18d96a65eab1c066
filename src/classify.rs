// AQI severity bands (US EPA breakpoints) and the gauge fraction

use serde::Serialize;
use tracing::warn;

/// AQI at which the gauge is full.
pub const GAUGE_FULL_SCALE: f64 = 500.0;

/// Severity, ordered from healthiest to worst.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Good,
    Moderate,
    UnhealthyForSensitiveGroups,
    Unhealthy,
    VeryUnhealthy,
    Hazardous,
}

/// Badge text contrast against the band colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BadgeContrast {
    /// White text.
    Light,
    /// Near-black text.
    Dark,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeverityBand {
    pub severity: Severity,
    /// Inclusive upper bound; `f64::INFINITY` for the last band.
    pub upper_bound: f64,
    pub label: &'static str,
    pub description: &'static str,
    /// Hex colour, e.g. "#00E400".
    pub color: &'static str,
    pub badge_contrast: BadgeContrast,
}

/// Bands in ascending order. Lookup is first match on `aqi <= upper_bound`,
/// so a value on a boundary belongs to the healthier band.
pub static BANDS: [SeverityBand; 6] = [
    SeverityBand {
        severity: Severity::Good,
        upper_bound: 50.0,
        label: "Good",
        description: "Air quality is satisfactory",
        color: "#00E400",
        badge_contrast: BadgeContrast::Light,
    },
    SeverityBand {
        severity: Severity::Moderate,
        upper_bound: 100.0,
        label: "Moderate",
        description: "Acceptable air quality",
        color: "#FDFD96",
        badge_contrast: BadgeContrast::Dark,
    },
    SeverityBand {
        severity: Severity::UnhealthyForSensitiveGroups,
        upper_bound: 150.0,
        label: "Unhealthy for Sensitive Groups",
        description: "Members of sensitive groups may experience health effects",
        color: "#FF7E00",
        badge_contrast: BadgeContrast::Light,
    },
    SeverityBand {
        severity: Severity::Unhealthy,
        upper_bound: 200.0,
        label: "Unhealthy",
        description: "Some members of the general public may experience health effects",
        color: "#FF0000",
        badge_contrast: BadgeContrast::Light,
    },
    SeverityBand {
        severity: Severity::VeryUnhealthy,
        upper_bound: 300.0,
        label: "Very Unhealthy",
        description: "Health alert: the entire population is more likely to be affected",
        color: "#8F3F97",
        badge_contrast: BadgeContrast::Light,
    },
    SeverityBand {
        severity: Severity::Hazardous,
        upper_bound: f64::INFINITY,
        label: "Hazardous",
        description: "Health warning of emergency conditions",
        color: "#7E0023",
        badge_contrast: BadgeContrast::Light,
    },
];

#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
pub enum ClassifyError {
    #[error("invalid AQI {0}: must be finite and non-negative")]
    InvalidInput(f64),
}

/// Strict lookup: negative or non-finite input is an error.
pub fn try_classify(aqi: f64) -> Result<&'static SeverityBand, ClassifyError> {
    if !aqi.is_finite() || aqi < 0.0 {
        return Err(ClassifyError::InvalidInput(aqi));
    }
    Ok(lookup(aqi))
}

/// Total lookup for the render path. Invalid input is clamped to 0 and logged.
pub fn classify(aqi: f64) -> &'static SeverityBand {
    lookup(clamp_aqi(aqi))
}

/// `min(aqi / 500, 1.0)`; saturates instead of overflowing the gauge.
pub fn gauge_fraction(aqi: f64) -> f64 {
    (clamp_aqi(aqi) / GAUGE_FULL_SCALE).min(1.0)
}

fn lookup(aqi: f64) -> &'static SeverityBand {
    BANDS
        .iter()
        .find(|band| aqi <= band.upper_bound)
        .unwrap_or(&BANDS[BANDS.len() - 1])
}

fn clamp_aqi(aqi: f64) -> f64 {
    match try_classify(aqi) {
        Ok(_) => aqi,
        Err(e) => {
            warn!(error = %e, operation = "classify", "clamping AQI to 0");
            0.0
        }
    }
}
