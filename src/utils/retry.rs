//! Retry policy with exponential backoff
//!
//! The policy is a plain value injected into the pipeline; no timing decision
//! lives in the fetcher or the extractor.

use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::future::Future;
use std::time::Duration;
use tracing::{debug, warn};

/// Configuration for retry behavior
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryPolicy {
    /// Maximum number of retry attempts after the first one
    pub max_retries: u32,

    /// Delay before the first retry, in milliseconds
    pub base_delay_ms: u64,

    /// Multiplier for exponential backoff (default: 2.0)
    pub backoff_multiplier: f64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 2,
            base_delay_ms: 5_000,
            backoff_multiplier: 2.0,
        }
    }
}

impl RetryPolicy {
    /// Create a new retry policy with custom max retries
    pub fn new(max_retries: u32) -> Self {
        Self {
            max_retries,
            ..Default::default()
        }
    }

    /// Create a retry policy with a custom base delay
    pub fn with_base_delay(max_retries: u32, base_delay: Duration) -> Self {
        Self {
            max_retries,
            base_delay_ms: u64::try_from(base_delay.as_millis()).unwrap_or(u64::MAX),
            backoff_multiplier: 2.0,
        }
    }

    /// Delay to wait before `attempt` (zero-based); the first attempt never waits
    pub fn delay_before(&self, attempt: u32) -> Duration {
        if attempt == 0 {
            return Duration::ZERO;
        }

        let exponent = i32::try_from(attempt - 1).unwrap_or(i32::MAX);
        let delay_ms = self.base_delay_ms as f64 * self.backoff_multiplier.powi(exponent);

        if delay_ms.is_finite() && delay_ms < u64::MAX as f64 {
            Duration::from_millis(delay_ms as u64)
        } else {
            Duration::from_millis(u64::MAX)
        }
    }
}

/// Execute an operation with retry logic and exponential backoff
///
/// The operation receives the zero-based attempt index. Returns the first
/// success, or the error produced by the final attempt.
pub async fn with_retry<T, E, F, Fut>(policy: &RetryPolicy, mut operation: F) -> Result<T, E>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: Display,
{
    let mut attempt = 0;

    loop {
        if attempt > 0 {
            let delay = policy.delay_before(attempt);
            debug!(
                attempt = attempt,
                delay_ms = delay.as_millis() as u64,
                "Retrying operation after delay"
            );
            tokio::time::sleep(delay).await;
        }

        match operation(attempt).await {
            Ok(result) => {
                if attempt > 0 {
                    debug!(attempt = attempt, "Operation succeeded after retry");
                }
                return Ok(result);
            }
            Err(e) => {
                warn!(
                    attempt = attempt,
                    max_retries = policy.max_retries,
                    error = %e,
                    "Operation failed"
                );
                if attempt >= policy.max_retries {
                    return Err(e);
                }
            }
        }

        attempt += 1;
    }
}
