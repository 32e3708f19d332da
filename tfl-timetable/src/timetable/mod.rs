//! Timetable normalization.
//!
//! Turns the nested JSON returned by the TfL timetable endpoint into flat
//! [`TimetableRow`]s, one per scheduled journey, ready to be written to a
//! table or serialized one object per line.

mod error;
mod extract;
pub mod json_path;
mod row;

pub use error::TransformError;
pub use extract::extract_timetable_rows;
pub use row::{SOURCE, TimetableRow, UNKNOWN_SERVICE_DAY, arrival_minutes, format_arrival_time};
