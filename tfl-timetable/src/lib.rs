//! TfL bus data acquisition.
//!
//! A thin client for the Transport for London unified API (line routes,
//! stop sequences, live arrivals and timetables) and a transform that
//! flattens timetable responses into rows for storage or analysis.

pub mod clock;
pub mod tfl;
pub mod timetable;
