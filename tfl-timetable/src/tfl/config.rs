//! Configuration for the TfL client.

use std::fmt;

use super::error::TflError;
use super::retry::RetryPolicy;

/// Default base URL for the TfL unified API.
pub const DEFAULT_BASE_URL: &str = "https://api.tfl.gov.uk";

/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Optional `app_id` / `app_key` pair passed through as query parameters.
///
/// Empty strings are treated as absent.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    app_id: Option<String>,
    app_key: Option<String>,
}

impl Credentials {
    /// Create credentials from optional parts.
    pub fn new(app_id: Option<String>, app_key: Option<String>) -> Self {
        Self {
            app_id: app_id.filter(|s| !s.is_empty()),
            app_key: app_key.filter(|s| !s.is_empty()),
        }
    }

    /// Anonymous access.
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn app_id(&self) -> Option<&str> {
        self.app_id.as_deref()
    }

    pub fn app_key(&self) -> Option<&str> {
        self.app_key.as_deref()
    }

    /// Query parameters with each present credential included on its own.
    pub fn each_present(&self) -> Vec<(&'static str, &str)> {
        let mut params = Vec::with_capacity(2);
        if let Some(id) = self.app_id() {
            params.push(("app_id", id));
        }
        if let Some(key) = self.app_key() {
            params.push(("app_key", key));
        }
        params
    }

    /// Query parameters only when both credentials are present.
    ///
    /// The arrivals endpoint is called this way; the other endpoints use
    /// [`Credentials::each_present`].
    pub fn both_or_neither(&self) -> Vec<(&'static str, &str)> {
        match (self.app_id(), self.app_key()) {
            (Some(id), Some(key)) => vec![("app_id", id), ("app_key", key)],
            _ => Vec::new(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("app_id", &self.app_id)
            .field("app_key", &self.app_key.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// Configuration for the TfL client.
#[derive(Debug, Clone)]
pub struct TflConfig {
    /// Base URL for the API (defaults to production TfL)
    pub base_url: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// Credentials passed as query parameters
    pub credentials: Credentials,
    /// Backoff for the timetable endpoint
    pub retry: RetryPolicy,
}

impl TflConfig {
    /// Create a config with the given credentials and production defaults.
    pub fn new(credentials: Credentials) -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            credentials,
            retry: RetryPolicy::default(),
        }
    }

    /// Build a config from `TFL_APP_ID`, `TFL_APP_KEY` and `TFL_BASE_URL`.
    ///
    /// Missing variables are not an error: the client falls back to
    /// anonymous access and the production base URL.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build a config from variables resolved by `lookup`, with the same
    /// rules as [`TflConfig::from_env`]. An empty value counts as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let credentials = Credentials::new(lookup("TFL_APP_ID"), lookup("TFL_APP_KEY"));
        let config = Self::new(credentials);
        match lookup("TFL_BASE_URL") {
            Some(url) if !url.is_empty() => config.with_base_url(url),
            _ => config,
        }
    }

    /// Set a custom base URL (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    /// Replace the credentials.
    pub fn with_credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = credentials;
        self
    }

    /// Set the default backoff for timetable fetches.
    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Check the configuration for values the client cannot work with.
    pub fn validate(&self) -> Result<(), TflError> {
        if self.base_url.is_empty() {
            return Err(TflError::Config("base_url must not be empty".to_string()));
        }
        if self.timeout_secs == 0 {
            return Err(TflError::Config(
                "timeout_secs must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for TflConfig {
    fn default() -> Self {
        Self::new(Credentials::anonymous())
    }
}
