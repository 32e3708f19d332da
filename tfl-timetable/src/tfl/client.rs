//! TfL unified API HTTP client.
//!
//! Every method issues plain GETs and hands back the raw JSON body. Only
//! the timetable endpoint has special status handling: 429 is retried with
//! exponential backoff and 400/404 mean "no timetable for this stop".

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use reqwest::{StatusCode, Url};
use serde_json::Value;
use tracing::{debug, warn};

use super::config::{Credentials, TflConfig};
use super::error::TflError;
use super::retry::{RetryPolicy, Sleeper, TokioSleeper};

/// Longest prefix of an unparseable body kept in [`TflError::Json`].
const MAX_ERROR_BODY_CHARS: usize = 500;

/// Direction of a stop sequence request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Inbound,
    Outbound,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Inbound => "inbound",
            Direction::Outbound => "outbound",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// TfL unified API client.
///
/// Holds no per-call state; clones share the underlying connection pool.
#[derive(Clone)]
pub struct TflClient {
    http: reqwest::Client,
    base_url: Url,
    credentials: Credentials,
    retry: RetryPolicy,
    sleeper: Arc<dyn Sleeper>,
}

impl fmt::Debug for TflClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TflClient")
            .field("base_url", &self.base_url.as_str())
            .field("credentials", &self.credentials)
            .field("retry", &self.retry)
            .finish_non_exhaustive()
    }
}

impl TflClient {
    /// Create a new TfL client with the given configuration.
    pub fn new(config: TflConfig) -> Result<Self, TflError> {
        config.validate()?;

        let base_url = Url::parse(&config.base_url)
            .map_err(|e| TflError::InvalidBaseUrl(format!("{}: {e}", config.base_url)))?;
        if base_url.cannot_be_a_base() {
            return Err(TflError::InvalidBaseUrl(config.base_url));
        }

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url,
            credentials: config.credentials,
            retry: config.retry,
            sleeper: Arc::new(TokioSleeper),
        })
    }

    /// Replace the sleeper used between rate-limited attempts.
    pub fn with_sleeper(mut self, sleeper: Arc<dyn Sleeper>) -> Self {
        self.sleeper = sleeper;
        self
    }

    /// Retry policy used by [`TflClient::get_timetable`].
    pub fn retry_policy(&self) -> RetryPolicy {
        self.retry
    }

    /// List all bus-mode line routes.
    pub async fn list_line_routes(&self) -> Result<Value, TflError> {
        let url = self.endpoint(&["Line", "Mode", "bus", "Route"])?;
        self.get_json(url, &self.credentials.each_present()).await
    }

    /// Fetch the inbound and outbound stop sequences for a line.
    ///
    /// The two requests run one after the other; the outbound request is
    /// not sent if the inbound one fails.
    pub async fn list_stop_sequence(&self, line_id: &str) -> Result<(Value, Value), TflError> {
        if line_id.is_empty() {
            return Err(TflError::MissingParameter("line_id"));
        }

        let inbound = self.stop_sequence(line_id, Direction::Inbound).await?;
        let outbound = self.stop_sequence(line_id, Direction::Outbound).await?;
        Ok((inbound, outbound))
    }

    /// Fetch a single direction of a line's stop sequence.
    pub async fn stop_sequence(
        &self,
        line_id: &str,
        direction: Direction,
    ) -> Result<Value, TflError> {
        if line_id.is_empty() {
            return Err(TflError::MissingParameter("line_id"));
        }

        let url = self.endpoint(&["Line", line_id, "Route", "Sequence", direction.as_str()])?;
        self.get_json(url, &self.credentials.each_present()).await
    }

    /// Get live arrival predictions for one or more lines.
    ///
    /// The ids are joined with `,` in iteration order into a single path
    /// segment. Credentials are only sent when both are configured.
    pub async fn get_arrivals<I, S>(&self, line_ids: I) -> Result<Value, TflError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let joined = join_ids(line_ids);
        if joined.is_empty() {
            return Err(TflError::MissingParameter("line_ids"));
        }

        let url = self.endpoint(&["Line", &joined, "Arrivals"])?;
        self.get_json(url, &self.credentials.both_or_neither()).await
    }

    /// Get the timetable for a stop on a line using the configured retry policy.
    ///
    /// Returns `Ok(None)` when TfL answers 400 or 404, which happens when the
    /// stop is not served by the line.
    pub async fn get_timetable(
        &self,
        line_id: &str,
        stop_id: &str,
    ) -> Result<Option<Value>, TflError> {
        self.get_timetable_with_policy(line_id, stop_id, &self.retry).await
    }

    /// Get the timetable for a stop on a line with an explicit retry policy.
    ///
    /// Each attempt that receives 429 is followed by a sleep of
    /// `base_sleep * 2^(attempt - 1)`. After the last allowed attempt the
    /// call fails with [`TflError::RetriesExhausted`] without another request.
    /// Any other unsuccessful status, and any transport failure, is returned
    /// immediately.
    pub async fn get_timetable_with_policy(
        &self,
        line_id: &str,
        stop_id: &str,
        policy: &RetryPolicy,
    ) -> Result<Option<Value>, TflError> {
        if line_id.is_empty() {
            return Err(TflError::MissingParameter("line_id"));
        }
        if stop_id.is_empty() {
            return Err(TflError::MissingParameter("stop_id"));
        }

        let url = self.endpoint(&["Line", line_id, "Timetable", stop_id])?;
        let params = self.credentials.each_present();

        for attempt in 1..=policy.max_retries {
            let response = self.send(url.clone(), &params).await?;
            let status = response.status();

            if status.is_success() {
                return parse_json(response).await.map(Some);
            }

            match status {
                StatusCode::TOO_MANY_REQUESTS => {
                    let delay = policy.delay_for(attempt);
                    warn!(
                        line_id,
                        stop_id,
                        attempt,
                        max_retries = policy.max_retries,
                        delay_ms = delay.as_millis() as u64,
                        "Timetable request rate limited, backing off"
                    );
                    self.sleeper.sleep(delay).await;
                }
                StatusCode::BAD_REQUEST | StatusCode::NOT_FOUND => {
                    debug!(
                        line_id,
                        stop_id,
                        status = status.as_u16(),
                        "No timetable for stop"
                    );
                    return Ok(None);
                }
                _ => return Err(api_error(response).await),
            }
        }

        Err(TflError::RetriesExhausted {
            line_id: line_id.to_string(),
            stop_id: stop_id.to_string(),
            attempts: policy.max_retries,
        })
    }

    /// Build an endpoint URL by appending percent-encoded path segments.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, TflError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| TflError::InvalidBaseUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn send(
        &self,
        url: Url,
        params: &[(&'static str, &str)],
    ) -> Result<reqwest::Response, TflError> {
        debug!(path = url.path(), "GET");
        let response = self.http.get(url).query(params).send().await?;
        Ok(response)
    }

    async fn get_json(
        &self,
        url: Url,
        params: &[(&'static str, &str)],
    ) -> Result<Value, TflError> {
        let response = self.send(url, params).await?;
        if !response.status().is_success() {
            return Err(api_error(response).await);
        }
        parse_json(response).await
    }
}

fn join_ids<I, S>(line_ids: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    line_ids
        .into_iter()
        .map(|id| id.as_ref().to_owned())
        .collect::<Vec<_>>()
        .join(",")
}

async fn api_error(response: reqwest::Response) -> TflError {
    let status = response.status().as_u16();
    let message = error_message(response.text().await);
    TflError::Api { status, message }
}

/// Message for an unsuccessful response. The status is still reported when
/// the body itself cannot be read.
fn error_message<E: fmt::Display>(body: Result<String, E>) -> String {
    match body {
        Ok(body) => body,
        Err(e) => {
            warn!(error = %e, "Failed to read error response body");
            format!("<failed to read response body: {e}>")
        }
    }
}

async fn parse_json(response: reqwest::Response) -> Result<Value, TflError> {
    let body = response.text().await?;
    serde_json::from_str(&body).map_err(|e| TflError::Json {
        message: e.to_string(),
        body: Some(body.chars().take(MAX_ERROR_BODY_CHARS).collect()),
    })
}
