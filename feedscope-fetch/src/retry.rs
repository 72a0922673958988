//! Retry policy for listing and search fetches.
//!
//! A [`RetryPolicy`] runs an attempt function up to `max_attempts` times,
//! sleeping between failures according to its [`Backoff`]. When every
//! attempt fails the caller gets a [`RetryFailure`] carrying the
//! categorized user message.

use std::future::Future;
use std::time::Duration;

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::error::{FailureCategory, FetchError};

/// Longest single wait between attempts.
const MAX_DELAY_SECS: u64 = 60;

// ============================================================================
// Backoff
// ============================================================================

/// Wait schedule between attempts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backoff {
    /// `2^attempt` seconds after attempt `attempt` (2s, 4s, ...).
    Exponential,
    /// The same delay after every failure.
    Fixed(Duration),
    /// No waiting at all.
    Immediate,
    /// Caller-supplied schedule keyed by the failed attempt number.
    Custom(fn(u32) -> Duration),
}

impl Backoff {
    /// Calculates the delay after the given (1-based) failed attempt.
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        match self {
            Self::Exponential => {
                let secs = 2u64.saturating_pow(attempt).min(MAX_DELAY_SECS);
                Duration::from_secs(secs)
            }
            Self::Fixed(delay) => *delay,
            Self::Immediate => Duration::ZERO,
            Self::Custom(schedule) => schedule(attempt),
        }
    }
}

// ============================================================================
// Retry Attempt
// ============================================================================

/// What an attempt function is told about the attempt it is making.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryAttempt {
    /// 1-based attempt number.
    pub attempt_number: u32,
    /// Total attempts allowed.
    pub max_attempts: u32,
    /// Error text of the previous attempt, if any.
    pub last_error: Option<String>,
}

impl RetryAttempt {
    /// Returns true on the final allowed attempt.
    pub fn is_last(&self) -> bool {
        self.attempt_number >= self.max_attempts
    }
}

// ============================================================================
// Retry Failure
// ============================================================================

/// All attempts failed.
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct RetryFailure {
    /// Categorized, context-labelled message for display.
    pub message: String,
    /// Category of the last error.
    pub category: FailureCategory,
    /// Number of attempts made.
    pub attempts: u32,
    /// The last error.
    pub last_error: FetchError,
}

impl RetryFailure {
    fn new(context: &str, error: FetchError, attempts: u32) -> Self {
        Self {
            message: error.user_message(context),
            category: error.category(),
            attempts,
            last_error: error,
        }
    }
}

// ============================================================================
// Retry Policy
// ============================================================================

/// Bounded retry with a pluggable backoff.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Maximum number of attempts (at least 1).
    pub max_attempts: u32,
    /// Wait schedule between attempts.
    pub backoff: Backoff,
}

impl RetryPolicy {
    /// Creates a policy with exponential backoff.
    pub fn new(max_attempts: u32) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            backoff: Backoff::Exponential,
        }
    }

    /// Policy for listing fetches: 3 attempts, waits 2s then 4s.
    pub fn listing() -> Self {
        Self::new(3)
    }

    /// Policy for searches: 2 attempts, 1s apart.
    pub fn search() -> Self {
        Self::new(2).with_backoff(Backoff::Fixed(Duration::from_secs(1)))
    }

    /// Disables retries.
    pub fn no_retry() -> Self {
        Self::new(1).with_backoff(Backoff::Immediate)
    }

    /// Sets the backoff.
    #[must_use]
    pub fn with_backoff(mut self, backoff: Backoff) -> Self {
        self.backoff = backoff;
        self
    }

    /// Sets the attempt count.
    #[must_use]
    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts.max(1);
        self
    }

    /// Runs `operation` until it succeeds or the attempts are exhausted.
    ///
    /// `context` labels the failure message (e.g. `r/technology`).
    pub async fn run<T, F, Fut>(&self, context: &str, mut operation: F) -> Result<T, RetryFailure>
    where
        F: FnMut(RetryAttempt) -> Fut,
        Fut: Future<Output = Result<T, FetchError>>,
    {
        let max_attempts = self.max_attempts.max(1);
        let mut last_error: Option<String> = None;
        let mut attempt_number = 0;

        loop {
            attempt_number += 1;
            let attempt = RetryAttempt {
                attempt_number,
                max_attempts,
                last_error: last_error.take(),
            };
            debug!(context, attempt = attempt_number, max_attempts, "Fetch attempt");

            match operation(attempt).await {
                Ok(value) => {
                    if attempt_number > 1 {
                        info!(context, attempt = attempt_number, "Fetch succeeded after retry");
                    }
                    return Ok(value);
                }
                Err(err) if attempt_number >= max_attempts => {
                    warn!(context, attempts = attempt_number, error = %err, "All attempts failed");
                    return Err(RetryFailure::new(context, err, attempt_number));
                }
                Err(err) => {
                    let delay = self.backoff.delay_for_attempt(attempt_number);
                    warn!(
                        context,
                        attempt = attempt_number,
                        max_attempts,
                        delay_secs = delay.as_secs_f64(),
                        error = %err,
                        "Fetch attempt failed, retrying"
                    );
                    last_error = Some(err.to_string());
                    if !delay.is_zero() {
                        tokio::time::sleep(delay).await;
                    }
                }
            }
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::listing()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicU32, Ordering};

    use super::*;

    #[test]
    fn test_exponential_backoff() {
        let backoff = Backoff::Exponential;

        assert_eq!(backoff.delay_for_attempt(1), Duration::from_secs(2));
        assert_eq!(backoff.delay_for_attempt(2), Duration::from_secs(4));
        assert_eq!(backoff.delay_for_attempt(3), Duration::from_secs(8));
    }

    #[test]
    fn test_max_delay_cap() {
        assert_eq!(
            Backoff::Exponential.delay_for_attempt(10),
            Duration::from_secs(MAX_DELAY_SECS)
        );
    }

    #[test]
    fn test_custom_backoff() {
        let backoff = Backoff::Custom(|n| Duration::from_millis(u64::from(n) * 10));
        assert_eq!(backoff.delay_for_attempt(3), Duration::from_millis(30));
    }

    #[test]
    fn test_presets() {
        assert_eq!(RetryPolicy::listing().max_attempts, 3);
        assert_eq!(RetryPolicy::search().max_attempts, 2);
        assert_eq!(
            RetryPolicy::search().backoff,
            Backoff::Fixed(Duration::from_secs(1))
        );
        assert_eq!(RetryPolicy::new(0).max_attempts, 1);
    }

    #[tokio::test]
    async fn test_always_failing_makes_exactly_max_attempts() {
        let calls = Arc::new(AtomicU32::new(0));
        let policy = RetryPolicy::listing().with_backoff(Backoff::Immediate);

        let counter = calls.clone();
        let result: Result<(), _> = policy
            .run("r/popular", |_| {
                counter.fetch_add(1, Ordering::SeqCst);
                async { Err(FetchError::status(500)) }
            })
            .await;

        let failure = result.unwrap_err();
        assert_eq!(calls.load(Ordering::SeqCst), 3);
        assert_eq!(failure.attempts, 3);
        assert_eq!(failure.category, FailureCategory::ServerError);
        assert!(failure.message.starts_with("r/popular: Server error."));
    }

    #[tokio::test]
    async fn test_success_on_second_attempt_stops() {
        let calls = Arc::new(AtomicU32::new(0));
        let policy = RetryPolicy::listing().with_backoff(Backoff::Immediate);

        let counter = calls.clone();
        let result = policy
            .run("r/popular", |attempt| {
                counter.fetch_add(1, Ordering::SeqCst);
                async move {
                    if attempt.attempt_number == 1 {
                        Err(FetchError::Network("reset".into()))
                    } else {
                        Ok(attempt.last_error)
                    }
                }
            })
            .await;

        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert_eq!(
            result.unwrap(),
            Some("Failed to fetch: reset".to_string())
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_listing_backoff_waits_two_then_four_seconds() {
        let start = tokio::time::Instant::now();
        let result: Result<(), _> = RetryPolicy::listing()
            .run("r/popular", |_| async { Err(FetchError::Timeout(Duration::from_secs(10))) })
            .await;

        assert!(result.is_err());
        assert_eq!(start.elapsed(), Duration::from_secs(6));
    }

    #[tokio::test(start_paused = true)]
    async fn test_search_backoff_waits_one_second() {
        let start = tokio::time::Instant::now();
        let result: Result<(), _> = RetryPolicy::search()
            .run("search", |_| async { Err(FetchError::status(404)) })
            .await;

        assert_eq!(result.unwrap_err().attempts, 2);
        assert_eq!(start.elapsed(), Duration::from_secs(1));
    }
}
