//! Bounded retry with exponential backoff for transient provider errors.
//!
//! Retries stay small: the orchestrator already wraps every adapter call in
//! its own timeout, so the retry budget must fit inside that window. Retry
//! exhaustion surfaces the last error to the adapter's caller, where the
//! orchestrator degrades it to an empty contribution.

use std::time::Duration;
use tokio::time::sleep;

use crate::sources::SourceError;

/// Configuration for retry behavior.
#[derive(Debug, Clone, Copy)]
pub struct RetryConfig {
    /// Maximum number of attempts, including the first.
    pub max_attempts: u32,
    /// Delay before the first retry.
    pub initial_delay: Duration,
    /// Ceiling on the backoff delay.
    pub max_delay: Duration,
    /// Multiplier applied to the delay after each failed attempt.
    pub backoff_multiplier: f64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 2,
            initial_delay: Duration::from_millis(500),
            max_delay: Duration::from_secs(5),
            backoff_multiplier: 2.0,
        }
    }
}

/// Whether an error is worth retrying.
///
/// Parse and API-contract errors are permanent: the same request will fail
/// the same way again.
pub fn is_transient(err: &SourceError) -> bool {
    match err {
        SourceError::Network(_) | SourceError::RateLimit => true,
        SourceError::Api(msg) => {
            let msg = msg.to_lowercase();
            msg.contains("timeout")
                || msg.contains("service unavailable")
                || msg.contains("temporarily unavailable")
        }
        SourceError::Parse(_) => false,
    }
}

/// Execute an async operation, retrying transient failures with backoff.
pub async fn with_retry<T, F, Fut>(config: RetryConfig, mut operation: F) -> Result<T, SourceError>
where
    F: FnMut() -> Fut,
    Fut: std::future::Future<Output = Result<T, SourceError>>,
{
    let mut attempts = 0;
    let mut delay = config.initial_delay;

    loop {
        attempts += 1;

        match operation().await {
            Ok(result) => {
                if attempts > 1 {
                    tracing::debug!(attempts, "operation succeeded after retry");
                }
                return Ok(result);
            }
            Err(error) => {
                if !is_transient(&error) || attempts >= config.max_attempts {
                    return Err(error);
                }

                tracing::debug!(attempts, %error, ?delay, "transient error, retrying");
                sleep(delay).await;

                let next = delay.as_secs_f64() * config.backoff_multiplier;
                delay = Duration::from_secs_f64(next.min(config.max_delay.as_secs_f64()));
            }
        }
    }
}

/// Retry configuration used by the provider adapters.
pub fn api_retry_config() -> RetryConfig {
    RetryConfig {
        max_attempts: 2,
        initial_delay: Duration::from_millis(500),
        max_delay: Duration::from_secs(2),
        backoff_multiplier: 2.0,
    }
}
