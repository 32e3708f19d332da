//! Flattening of TfL timetable responses into rows.
//!
//! The response nests `timetable.routes[].schedules[].knownJourneys[]`.
//! Every known journey becomes one [`TimetableRow`], in the order routes,
//! schedules and journeys appear in the document.

use chrono::NaiveDate;
use serde_json::Value;

use crate::clock::Clock;

use super::error::TransformError;
use super::json_path::{array_or_empty, coerce_int, lookup, optional_string};
use super::row::{SOURCE, TimetableRow, UNKNOWN_SERVICE_DAY, arrival_minutes, format_arrival_time};

/// Fields shared by every row extracted from one response.
struct RowContext {
    snapshot_date: NaiveDate,
    line_id: Option<String>,
    stop_id: Option<String>,
    stop_sequence: u32,
    direction: Option<String>,
}

impl RowContext {
    fn row(&self, service_day: &str, journey: &Value) -> Result<TimetableRow, TransformError> {
        let hour = coerce_int(lookup(journey, &["hour"])?, "hour")?;
        let minute = coerce_int(lookup(journey, &["minute"])?, "minute")?;
        let interval_id = lookup(journey, &["intervalId"])?.cloned();
        let minutes = arrival_minutes(hour, minute)?;

        Ok(TimetableRow {
            snapshot_date: self.snapshot_date,
            line_id: self.line_id.clone(),
            stop_id: self.stop_id.clone(),
            stop_sequence: self.stop_sequence,
            direction: self.direction.clone(),
            service_day: service_day.to_string(),
            arrival_time: format_arrival_time(hour, minute),
            arrival_minutes: minutes,
            interval_id,
            source: SOURCE.to_string(),
        })
    }
}

/// Transform a timetable response into normalized rows.
///
/// `timetable` and `stop_sequence` are required; `None` (or a JSON `null`
/// document) fails before anything is read. `snapshot_date` defaults to
/// `clock.today()`.
///
/// Missing keys and `null`s anywhere in the document read as absent, so
/// `{}` yields no rows. A value of the wrong JSON type, such as a string
/// where `routes` should be an array, fails with
/// [`TransformError::UnexpectedShape`].
pub fn extract_timetable_rows<C: Clock + ?Sized>(
    timetable: Option<&Value>,
    snapshot_date: Option<NaiveDate>,
    stop_sequence: Option<u32>,
    clock: &C,
) -> Result<Vec<TimetableRow>, TransformError> {
    let timetable = timetable
        .filter(|v| !v.is_null())
        .ok_or(TransformError::MissingInput("timetable_json"))?;
    let stop_sequence = stop_sequence.ok_or(TransformError::MissingInput("stop_sequence"))?;

    let context = RowContext {
        snapshot_date: snapshot_date.unwrap_or_else(|| clock.today()),
        line_id: optional_string(timetable, &["lineId"])?,
        stop_id: optional_string(timetable, &["timetable", "departureStopId"])?,
        stop_sequence,
        direction: optional_string(timetable, &["direction"])?,
    };

    let mut rows = Vec::new();

    let routes = array_or_empty(timetable, &["timetable", "routes"])?;
    for (r, route) in routes.iter().enumerate() {
        let route_path = || format!("timetable.routes[{r}]");

        let schedules =
            array_or_empty(route, &["schedules"]).map_err(|e| e.within(&route_path()))?;

        for (s, schedule) in schedules.iter().enumerate() {
            let schedule_path = || format!("{}.schedules[{s}]", route_path());

            let service_day = optional_string(schedule, &["name"])
                .map_err(|e| e.within(&schedule_path()))?
                .unwrap_or_else(|| UNKNOWN_SERVICE_DAY.to_string());

            let journeys = array_or_empty(schedule, &["knownJourneys"])
                .map_err(|e| e.within(&schedule_path()))?;

            rows.reserve(journeys.len());
            for (j, journey) in journeys.iter().enumerate() {
                let row = context.row(&service_day, journey).map_err(|e| {
                    e.within(&format!("{}.knownJourneys[{j}]", schedule_path()))
                })?;
                rows.push(row);
            }
        }
    }

    Ok(rows)
}
