// Typed tooltip and axis formatting for the chart series

use chrono::{DateTime, Utc};
use serde::Serialize;

/// One value under the cursor: which series, when, and what.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TooltipEntry {
    pub timestamp: DateTime<Utc>,
    pub series_name: String,
    pub value: f64,
}

/// Axis tick label, "HH:MM".
pub fn format_axis_time(timestamp: DateTime<Utc>) -> String {
    timestamp.format("%H:%M").to_string()
}

/// One decimal place; non-finite values render as "n/a".
pub fn format_value(value: f64) -> String {
    if value.is_finite() {
        format!("{value:.1}")
    } else {
        "n/a".to_string()
    }
}

/// Header line with the first entry's time, then one "name: value" line per entry.
/// Empty input renders nothing.
pub fn format_tooltip(entries: &[TooltipEntry]) -> Option<String> {
    let first = entries.first()?;
    let mut lines = Vec::with_capacity(entries.len() + 1);
    lines.push(first.timestamp.format("%Y-%m-%d %H:%M:%S").to_string());
    for entry in entries {
        lines.push(format!("{}: {}", entry.series_name, format_value(entry.value)));
    }
    Some(lines.join("\n"))
}
