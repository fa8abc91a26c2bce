//! Retry with backoff for forecast requests.
//!
//! Transient failures are retried:
//! - Timeouts and connection failures
//! - 5xx server errors and 408
//! - 429 rate limiting
//!
//! Everything else (other 4xx, unparseable bodies, empty forecasts) fails
//! immediately.

use std::future::Future;
use std::time::Duration;

use crate::types::WeatherError;

pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;
pub const DEFAULT_BACKOFF_STEP_MS: u64 = 2000;

/// Retry configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first one
    pub max_attempts: u32,
    /// Wait after failed attempt `n` is `n * backoff_step`
    pub backoff_step: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            backoff_step: Duration::from_millis(DEFAULT_BACKOFF_STEP_MS),
        }
    }
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, backoff_step_ms: u64) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            backoff_step: Duration::from_millis(backoff_step_ms),
        }
    }

    /// Delay after the given failed attempt (1-based)
    pub fn delay_after_attempt(&self, attempt: u32) -> Duration {
        self.backoff_step.saturating_mul(attempt)
    }
}

/// Run `operation` until it succeeds, fails permanently, or attempts run out.
///
/// No delay follows the final attempt. When attempts run out after more than
/// one try, the last error is wrapped in [`WeatherError::Exhausted`].
pub async fn with_retry<T, F, Fut>(policy: &RetryPolicy, mut operation: F) -> Result<T, WeatherError>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<T, WeatherError>>,
{
    let max_attempts = policy.max_attempts.max(1);
    let mut attempt = 1;

    loop {
        match operation(attempt).await {
            Ok(value) => {
                if attempt > 1 {
                    tracing::info!("Request succeeded on attempt {}", attempt);
                }
                return Ok(value);
            }
            Err(e) if !e.is_retryable() => {
                tracing::debug!("Non-retryable error: {}", e);
                return Err(e);
            }
            Err(e) if attempt >= max_attempts => {
                tracing::error!("All {} attempts failed, last error: {}", max_attempts, e);
                if max_attempts == 1 {
                    return Err(e);
                }
                return Err(WeatherError::Exhausted {
                    attempts: max_attempts,
                    last: Box::new(e),
                });
            }
            Err(e) => {
                let delay = policy.delay_after_attempt(attempt);
                tracing::warn!(
                    "Attempt {} of {} failed: {}; retrying in {:?}",
                    attempt,
                    max_attempts,
                    e,
                    delay
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[test]
    fn test_retry_policy_default() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.max_attempts, 3);
        assert_eq!(policy.backoff_step, Duration::from_millis(2000));
    }

    #[test]
    fn test_delay_grows_by_step() {
        let policy = RetryPolicy::new(3, 2000);
        assert_eq!(policy.delay_after_attempt(1), Duration::from_secs(2));
        assert_eq!(policy.delay_after_attempt(2), Duration::from_secs(4));
        assert_eq!(policy.delay_after_attempt(3), Duration::from_secs(6));
    }

    #[test]
    fn test_zero_attempts_clamped() {
        assert_eq!(RetryPolicy::new(0, 10).max_attempts, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_succeeds_after_transient_failures() {
        let calls = AtomicU32::new(0);
        let policy = RetryPolicy::new(3, 2000);

        let started = tokio::time::Instant::now();
        let result = with_retry(&policy, |_| {
            let n = calls.fetch_add(1, Ordering::SeqCst) + 1;
            async move {
                if n < 3 {
                    Err(WeatherError::Status(503))
                } else {
                    Ok(n)
                }
            }
        })
        .await;

        assert_eq!(result.unwrap(), 3);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
        // 2s after the first failure, 4s after the second
        assert_eq!(started.elapsed(), Duration::from_secs(6));
    }

    #[tokio::test(start_paused = true)]
    async fn test_no_sleep_after_last_attempt() {
        let policy = RetryPolicy::new(3, 2000);

        let started = tokio::time::Instant::now();
        let result: Result<(), _> =
            with_retry(&policy, |_| async { Err(WeatherError::RateLimited) }).await;

        assert!(matches!(
            result,
            Err(WeatherError::Exhausted { attempts: 3, .. })
        ));
        assert_eq!(started.elapsed(), Duration::from_secs(6));
    }

    #[tokio::test(start_paused = true)]
    async fn test_permanent_error_not_retried() {
        let calls = AtomicU32::new(0);
        let policy = RetryPolicy::default();

        let result: Result<(), _> = with_retry(&policy, |_| {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Err(WeatherError::Status(403)) }
        })
        .await;

        assert!(matches!(result, Err(WeatherError::Status(403))));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_single_attempt_returns_raw_error() {
        let policy = RetryPolicy::new(1, 10);
        let result: Result<(), _> = with_retry(&policy, |_| async { Err(WeatherError::Status(500)) }).await;
        assert!(matches!(result, Err(WeatherError::Status(500))));
    }
}
