//! TfL unified API client.
//!
//! This module provides an HTTP client for the Transport for London API,
//! covering the bus line, stop sequence, arrivals and timetable endpoints.
//!
//! Key characteristics:
//! - Responses are returned as raw `serde_json::Value`; no schema is enforced
//! - Credentials (`app_id`, `app_key`) travel as query parameters and are
//!   optional; anonymous access is heavily rate limited
//! - Only the timetable endpoint retries (on 429) and treats 400/404 as
//!   "no data" rather than a failure

mod client;
mod config;
mod error;
mod retry;

pub use client::{Direction, TflClient};
pub use config::{Credentials, DEFAULT_BASE_URL, DEFAULT_TIMEOUT_SECS, TflConfig};
pub use error::TflError;
pub use retry::{DEFAULT_BASE_SLEEP, DEFAULT_MAX_RETRIES, RetryPolicy, Sleeper, TokioSleeper};
