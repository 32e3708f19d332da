//! Normalized timetable row.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::error::TransformError;

/// Provenance tag written on every row.
pub const SOURCE: &str = "tfl_api";

/// Service day used when a schedule has no name.
pub const UNKNOWN_SERVICE_DAY: &str = "unknown";

/// One scheduled arrival of a line at a stop on a service day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimetableRow {
    /// Date the snapshot was taken, not the date the journey runs.
    pub snapshot_date: NaiveDate,
    pub line_id: Option<String>,
    pub stop_id: Option<String>,
    /// Ordinal position of the stop on the route, supplied by the caller.
    pub stop_sequence: u32,
    pub direction: Option<String>,
    /// Schedule name, e.g. "Monday - Friday".
    pub service_day: String,
    /// Zero-padded `HH:MM`.
    pub arrival_time: String,
    /// Minutes since midnight, `hour * 60 + minute`.
    pub arrival_minutes: i64,
    pub interval_id: Option<Value>,
    pub source: String,
}

/// Format an hour/minute pair as zero-padded `HH:MM`.
pub fn format_arrival_time(hour: i64, minute: i64) -> String {
    format!("{hour:02}:{minute:02}")
}

/// Minutes since midnight for an hour/minute pair.
///
/// Fails with [`TransformError::InvalidTimeComponent`] on `hour` when the
/// result does not fit in an `i64`.
pub fn arrival_minutes(hour: i64, minute: i64) -> Result<i64, TransformError> {
    hour.checked_mul(60)
        .and_then(|m| m.checked_add(minute))
        .ok_or_else(|| TransformError::InvalidTimeComponent {
            field: "hour",
            value: hour.to_string(),
        })
}
