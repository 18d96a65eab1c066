// Wire models for the air-quality backend

mod history;
mod reading;
pub mod timestamp;

pub use history::{HistoricalPoint, HourlyAqiBucket, is_chronological, sort_chronologically};
pub use reading::{HazardLevel, Reading};
pub use timestamp::{TimestampError, parse_timestamp};
