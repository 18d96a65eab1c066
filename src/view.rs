// Dashboard view-model: what a renderer needs from the latest snapshot.
// Built per render from the classifier and series builders; never stored.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::acquisition::{DashboardSnapshot, Status};
use crate::classify::{BadgeContrast, Severity, classify, gauge_fraction};
use crate::models::{HazardLevel, Reading};
use crate::series::{
    AVERAGE_AQI_SERIES, EnvironmentalPoint, HUMIDITY_SERIES, HourlyBar, PM25_SERIES,
    TEMPERATURE_SERIES, TooltipEntry, TrendPoint, build_environmental, build_hourly_averages,
    build_trend, format_axis_time, format_tooltip,
};

pub const NO_RECOMMENDATIONS: &str = "No specific recommendations at this time.";
pub const CONNECTION_ERROR_FALLBACK: &str = "Unable to load dashboard data";
pub const DISCLAIMER: &str = "These recommendations are generated using a trained machine \
learning model for informational purposes only. Final decisions should always be made by a \
qualified human professional and not solely based on this prediction.";

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "lowercase")]
pub enum DashboardView {
    Loading,
    /// Connection error; charts are suppressed. `last_good_at` is the time of
    /// the reading still held in the snapshot, if any.
    Failed {
        message: String,
        last_good_at: Option<DateTime<Utc>>,
    },
    Ready(Box<ReadyPanel>),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BandView {
    pub severity: Severity,
    pub label: &'static str,
    pub description: &'static str,
    pub color: &'static str,
    pub badge_contrast: BadgeContrast,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum HazardBanner {
    Favorable,
    Warning { level: HazardLevel },
}

impl HazardBanner {
    pub fn for_level(level: &HazardLevel) -> Self {
        if level.is_elevated() {
            HazardBanner::Warning {
                level: level.clone(),
            }
        } else {
            HazardBanner::Favorable
        }
    }

    pub fn headline(&self) -> String {
        match self {
            HazardBanner::Favorable => "Air Quality Good".to_string(),
            HazardBanner::Warning { level } => format!("Hazard Level: {level}"),
        }
    }

    pub fn advice(&self) -> &'static str {
        match self {
            HazardBanner::Favorable => "Current conditions are favorable for outdoor activities.",
            HazardBanner::Warning { .. } => {
                "Air quality is not ideal. Consider taking precautions."
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "items", rename_all = "lowercase")]
pub enum Recommendations {
    Items(Vec<String>),
    Fallback(&'static str),
}

/// One chart: legend names in axis order, then its points.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Chart<P> {
    pub series: Vec<&'static str>,
    pub points: Vec<P>,
}

/// A time-series point with its "HH:MM" tick and rendered tooltip.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LabeledPoint<P> {
    #[serde(flatten)]
    pub point: P,
    pub axis_label: String,
    pub tooltip: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReadyPanel {
    pub aqi: f64,
    pub pm25: f64,
    pub pm10: f64,
    pub humidity: f64,
    pub visibility: f64,
    pub timestamp: DateTime<Utc>,
    /// "YYYY-MM-DD HH:MM:SS" (UTC).
    pub last_updated: String,
    pub band: BandView,
    pub gauge_fraction: f64,
    pub hazard: HazardBanner,
    pub recommendations: Recommendations,
    pub disclaimer: &'static str,
    /// `None` when there is nothing to chart.
    pub trend: Option<Chart<LabeledPoint<TrendPoint>>>,
    pub environmental: Option<Chart<LabeledPoint<EnvironmentalPoint>>>,
    pub hourly: Option<Chart<HourlyBar>>,
    pub historical_stale: bool,
    pub distribution_stale: bool,
}

/// Builds the view for `snapshot`.
pub fn render(snapshot: &DashboardSnapshot) -> DashboardView {
    match (snapshot.status, snapshot.reading.as_ref()) {
        (Status::Loading, _) => DashboardView::Loading,
        (Status::Failed, held) => DashboardView::Failed {
            message: snapshot
                .error
                .clone()
                .unwrap_or_else(|| CONNECTION_ERROR_FALLBACK.to_string()),
            last_good_at: held.map(|r| r.timestamp),
        },
        (Status::Ready, None) => DashboardView::Failed {
            message: CONNECTION_ERROR_FALLBACK.to_string(),
            last_good_at: None,
        },
        (Status::Ready, Some(reading)) => {
            DashboardView::Ready(Box::new(ready_panel(snapshot, reading)))
        }
    }
}

fn ready_panel(snapshot: &DashboardSnapshot, reading: &Reading) -> ReadyPanel {
    let band = classify(reading.aqi);
    ReadyPanel {
        aqi: reading.aqi,
        pm25: reading.pm25,
        pm10: reading.pm10,
        humidity: reading.humidity,
        visibility: reading.visibility,
        timestamp: reading.timestamp,
        last_updated: reading.timestamp.format("%Y-%m-%d %H:%M:%S").to_string(),
        band: BandView {
            severity: band.severity,
            label: band.label,
            description: band.description,
            color: band.color,
            badge_contrast: band.badge_contrast,
        },
        gauge_fraction: gauge_fraction(reading.aqi),
        hazard: HazardBanner::for_level(&reading.hazard_level),
        recommendations: recommendations(&reading.health_recommendations),
        disclaimer: DISCLAIMER,
        trend: time_chart(
            vec![PM25_SERIES],
            build_trend(&snapshot.historical),
            |p| (p.timestamp, p.tooltip_entries()),
        ),
        environmental: time_chart(
            vec![PM25_SERIES, TEMPERATURE_SERIES, HUMIDITY_SERIES],
            build_environmental(&snapshot.historical),
            |p| (p.timestamp, p.tooltip_entries()),
        ),
        hourly: chart(
            vec![AVERAGE_AQI_SERIES],
            build_hourly_averages(&snapshot.distribution),
        ),
        historical_stale: snapshot.historical_is_stale(),
        distribution_stale: snapshot.distribution_is_stale(),
    }
}

fn recommendations(raw: &[String]) -> Recommendations {
    let items: Vec<String> = raw
        .iter()
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect();
    if items.is_empty() {
        Recommendations::Fallback(NO_RECOMMENDATIONS)
    } else {
        Recommendations::Items(items)
    }
}

/// `None` when there is nothing to chart.
fn chart<P>(series: Vec<&'static str>, points: Vec<P>) -> Option<Chart<P>> {
    (!points.is_empty()).then_some(Chart { series, points })
}

fn time_chart<P>(
    series: Vec<&'static str>,
    points: Vec<P>,
    entries: impl Fn(&P) -> (DateTime<Utc>, Vec<TooltipEntry>),
) -> Option<Chart<LabeledPoint<P>>> {
    let labeled = points
        .into_iter()
        .map(|point| {
            let (timestamp, tooltip) = entries(&point);
            LabeledPoint {
                axis_label: format_axis_time(timestamp),
                tooltip: format_tooltip(&tooltip).unwrap_or_default(),
                point,
            }
        })
        .collect();
    chart(series, labeled)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::HourlyAqiBucket;
    use chrono::TimeZone;

    fn reading(hazard_level: HazardLevel, recs: Vec<&str>) -> Reading {
        Reading {
            aqi: 155.0,
            pm25: 63.0,
            pm10: 75.6,
            humidity: 48.0,
            visibility: 2.1,
            timestamp: Utc.with_ymd_and_hms(2025, 1, 14, 14, 0, 0).unwrap(),
            hazard_level,
            health_recommendations: recs.into_iter().map(String::from).collect(),
        }
    }

    #[test]
    fn loading_snapshot_renders_loading() {
        assert_eq!(render(&DashboardSnapshot::new()), DashboardView::Loading);
    }

    #[test]
    fn failed_snapshot_suppresses_panel_but_reports_last_good_time() {
        let mut snapshot = DashboardSnapshot::new();
        let _ = snapshot.apply_primary_success(1, reading(HazardLevel::Low, vec![]));
        let _ = snapshot.apply_primary_failure(2, "/api/dashboard returned HTTP 500".into());
        match render(&snapshot) {
            DashboardView::Failed {
                message,
                last_good_at,
            } => {
                assert_eq!(message, "/api/dashboard returned HTTP 500");
                assert_eq!(
                    last_good_at,
                    Some(Utc.with_ymd_and_hms(2025, 1, 14, 14, 0, 0).unwrap())
                );
            }
            other => panic!("expected failed view, got {other:?}"),
        }
    }

    #[test]
    fn ready_panel_omits_empty_charts_and_warns_on_high_hazard() {
        let mut snapshot = DashboardSnapshot::new();
        let _ = snapshot.apply_primary_success(
            1,
            reading(HazardLevel::High, vec!["Wear a mask.", "  "]),
        );
        let _ = snapshot.apply_distribution(
            1,
            vec![HourlyAqiBucket {
                hour: "08:00".into(),
                count: 4,
                category: "Unhealthy".into(),
                aqi: 170.0,
            }],
        );
        let DashboardView::Ready(panel) = render(&snapshot) else {
            panic!("expected ready view");
        };
        assert_eq!(panel.band.label, "Unhealthy");
        assert_eq!(panel.last_updated, "2025-01-14 14:00:00");
        assert!(panel.trend.is_none());
        assert!(panel.environmental.is_none());
        let hourly = panel.hourly.as_ref().expect("hourly chart");
        assert_eq!(hourly.series, vec!["Average AQI"]);
        assert_eq!(hourly.points.len(), 1);
        assert_eq!(
            panel.hazard,
            HazardBanner::Warning {
                level: HazardLevel::High
            }
        );
        assert_eq!(panel.hazard.headline(), "Hazard Level: High");
        assert_eq!(
            panel.recommendations,
            Recommendations::Items(vec!["Wear a mask.".into()])
        );
        assert!(panel.historical_stale);
        assert!(!panel.distribution_stale);
    }

    #[test]
    fn low_hazard_is_favorable() {
        let banner = HazardBanner::for_level(&HazardLevel::Low);
        assert_eq!(banner, HazardBanner::Favorable);
        assert_eq!(banner.headline(), "Air Quality Good");
        assert!(matches!(
            HazardBanner::for_level(&HazardLevel::from_label("Severe?")),
            HazardBanner::Warning { .. }
        ));
    }

    #[test]
    fn unknown_hazard_label_is_shown_verbatim() {
        let mut snapshot = DashboardSnapshot::new();
        let _ = snapshot.apply_primary_success(
            1,
            reading(HazardLevel::from_label("Very High"), vec![]),
        );
        let DashboardView::Ready(panel) = render(&snapshot) else {
            panic!("expected ready view");
        };
        assert_eq!(panel.hazard.headline(), "Hazard Level: Very High");
        let json = serde_json::to_value(&panel.hazard).unwrap();
        assert_eq!(json["kind"], "warning");
        assert_eq!(json["level"], "Very High");
    }

    #[test]
    fn time_charts_carry_series_names_axis_labels_and_tooltips() {
        let mut snapshot = DashboardSnapshot::new();
        let _ = snapshot.apply_primary_success(1, reading(HazardLevel::Low, vec![]));
        let _ = snapshot.apply_historical(
            1,
            vec![crate::models::HistoricalPoint {
                timestamp: Utc.with_ymd_and_hms(2025, 1, 14, 9, 30, 0).unwrap(),
                pm25: 35.26,
                temp: 18.0,
                humidity: 55.0,
                windspeed: 2.0,
                aqi: 99.0,
            }],
        );
        let DashboardView::Ready(panel) = render(&snapshot) else {
            panic!("expected ready view");
        };

        let trend = panel.trend.as_ref().expect("trend chart");
        assert_eq!(trend.series, vec!["PM2.5 (µg/m³)"]);
        assert_eq!(trend.points[0].axis_label, "09:30");
        assert_eq!(
            trend.points[0].tooltip,
            "2025-01-14 09:30:00\nPM2.5 (µg/m³): 35.3"
        );

        let env = panel.environmental.as_ref().expect("environmental chart");
        assert_eq!(
            env.series,
            vec!["PM2.5 (µg/m³)", "Temperature (°C)", "Humidity (%)"]
        );
        assert!(env.points[0].tooltip.ends_with("Humidity (%): 55.0"));

        let json = serde_json::to_value(&*panel).unwrap();
        assert_eq!(json["trend"]["points"][0]["pm25"], 35.26);
        assert_eq!(json["trend"]["points"][0]["axis_label"], "09:30");
    }

    #[test]
    fn view_serializes_with_state_tag() {
        let json = serde_json::to_value(render(&DashboardSnapshot::new())).unwrap();
        assert_eq!(json["state"], "loading");
    }
}
