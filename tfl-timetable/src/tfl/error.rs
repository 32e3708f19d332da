//! TfL client error types.

/// Errors that can occur when talking to the TfL unified API.
#[derive(Debug, thiserror::Error)]
pub enum TflError {
    /// A required identifier was missing or empty
    #[error("{0} must be provided")]
    MissingParameter(&'static str),

    /// HTTP request failed (network error, timeout, etc.)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// API returned an unsuccessful status code
    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    /// Response body was not valid JSON
    #[error("JSON parse error: {message}")]
    Json {
        message: String,
        body: Option<String>,
    },

    /// Timetable endpoint kept answering 429 until the retry budget ran out
    #[error("exceeded {attempts} retries for timetable line={line_id}, stop={stop_id}")]
    RetriesExhausted {
        line_id: String,
        stop_id: String,
        attempts: u32,
    },

    /// Base URL could not be used to build endpoint URLs
    #[error("invalid base URL: {0}")]
    InvalidBaseUrl(String),

    /// Configuration values were rejected
    #[error("configuration error: {0}")]
    Config(String),
}

impl TflError {
    /// HTTP status carried by this error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            TflError::Api { status, .. } => Some(*status),
            TflError::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}
