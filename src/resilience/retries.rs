//! Retry logic.
//!
//! # Responsibilities
//! - Decide whether a failure is worth retrying (transient only)
//! - Execute attempts sequentially with exponential backoff + jitter
//! - Bound the total number of attempts
//!
//! Only use this for calls that are idempotent on the ledger side, such as
//! resubmitting an already-signed transaction.

use std::future::Future;
use std::time::Duration;

use crate::blockchain::types::ClientResult;
use crate::config::RetryConfig;
use crate::observability::metrics;
use crate::resilience::backoff::calculate_backoff;

/// Bounded retry policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first. Never less than 1.
    pub max_attempts: u32,
    pub base_delay: Duration,
    pub max_delay: Duration,
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, base_delay: Duration, max_delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            base_delay,
            max_delay,
        }
    }

    /// A policy that tries exactly once.
    pub fn none() -> Self {
        Self::new(1, Duration::ZERO, Duration::ZERO)
    }

    /// Run `attempt` until it succeeds, fails permanently, or attempts run out.
    ///
    /// `attempt` receives the 1-based attempt number. The next attempt only
    /// starts after the previous one has finished and the backoff elapsed.
    pub async fn run<T, F, Fut>(&self, operation: &'static str, mut attempt: F) -> ClientResult<T>
    where
        F: FnMut(u32) -> Fut,
        Fut: Future<Output = ClientResult<T>>,
    {
        let mut tries = 1;
        loop {
            match attempt(tries).await {
                Ok(value) => return Ok(value),
                Err(e) if e.is_transient() && tries < self.max_attempts => {
                    let delay = calculate_backoff(tries, self.base_delay, self.max_delay);
                    tracing::warn!(
                        operation,
                        attempt = tries,
                        max_attempts = self.max_attempts,
                        delay_ms = delay.as_millis() as u64,
                        error = %e,
                        "Transient failure, retrying"
                    );
                    metrics::record_retry(operation);
                    tokio::time::sleep(delay).await;
                    tries += 1;
                }
                Err(e) => {
                    if e.is_transient() {
                        tracing::warn!(
                            operation,
                            attempts = tries,
                            error = %e,
                            "Retries exhausted"
                        );
                    }
                    return Err(e);
                }
            }
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from(&RetryConfig::default())
    }
}

impl From<&RetryConfig> for RetryPolicy {
    fn from(config: &RetryConfig) -> Self {
        Self::new(
            config.max_attempts,
            Duration::from_millis(config.base_delay_ms),
            Duration::from_millis(config.max_delay_ms),
        )
    }
}
