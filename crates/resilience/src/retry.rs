//! Constant-delay retry policy.

use std::future::Future;
use tokio::time::{sleep, Duration};

use switchboard_core::Result;

/// Retry policy: up to `max_attempts` total tries with a constant delay
/// between them.
///
/// Retries unconditionally on any failure, circuit-breaker rejections
/// included; the error kind is not inspected. The last failure is
/// surfaced unchanged once attempts are exhausted.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            delay: Duration::from_secs(2),
        }
    }
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, delay: Duration) -> Self {
        Self {
            max_attempts,
            delay,
        }
    }

    /// Run `op`, retrying on failure until attempts are exhausted.
    pub async fn run<T, F, Fut>(&self, operation: &str, mut op: F) -> Result<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let mut attempt = 0u32;
        loop {
            attempt += 1;
            match op().await {
                Ok(value) => return Ok(value),
                Err(err) if attempt < self.max_attempts => {
                    tracing::warn!(
                        operation,
                        attempt,
                        max_attempts = self.max_attempts,
                        error = %err,
                        "attempt failed, retrying"
                    );
                    sleep(self.delay).await;
                }
                Err(err) => {
                    tracing::error!(operation, attempts = attempt, error = %err, "attempts exhausted");
                    return Err(err);
                }
            }
        }
    }
}
