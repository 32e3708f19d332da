//! Backoff policy for the timetable endpoint.
//!
//! TfL answers 429 when the per-key (or anonymous) quota is used up. The
//! timetable fetch waits `base_sleep * 2^(attempt - 1)` between attempts and
//! gives up after `max_retries` attempts.

use std::time::Duration;

use futures::future::BoxFuture;

/// Default number of attempts for a timetable fetch.
pub const DEFAULT_MAX_RETRIES: u32 = 5;

/// Default base delay for exponential backoff.
pub const DEFAULT_BASE_SLEEP: Duration = Duration::from_secs(1);

/// Retry settings for rate-limited requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Maximum number of attempts (not additional retries).
    pub max_retries: u32,
    /// Delay after the first rate-limited attempt; doubles each time.
    pub base_sleep: Duration,
}

impl RetryPolicy {
    /// Create a policy with the given attempt budget and base delay.
    pub fn new(max_retries: u32, base_sleep: Duration) -> Self {
        Self {
            max_retries,
            base_sleep,
        }
    }

    /// Delay to wait after the given 1-indexed attempt was rate limited.
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let factor = 2u32.saturating_pow(attempt.saturating_sub(1));
        self.base_sleep.saturating_mul(factor)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_RETRIES, DEFAULT_BASE_SLEEP)
    }
}

/// Something that can wait for a duration.
///
/// The client sleeps through this seam so that tests can record the
/// backoff schedule instead of waiting for it.
pub trait Sleeper: Send + Sync {
    /// Wait for `duration`.
    fn sleep(&self, duration: Duration) -> BoxFuture<'static, ()>;
}

/// Sleeper backed by the tokio timer.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioSleeper;

impl Sleeper for TokioSleeper {
    fn sleep(&self, duration: Duration) -> BoxFuture<'static, ()> {
        Box::pin(tokio::time::sleep(duration))
    }
}
