//! Composable resilient call pipeline.

use std::future::Future;
use std::sync::Arc;
use std::time::Instant;
use tokio::time::{timeout, Duration};

use switchboard_core::{Error, Result};

use crate::breaker::CircuitBreaker;
use crate::retry::RetryPolicy;

/// Policy bundle for one dependency: retry, breaker, per-attempt timeout.
///
/// The breaker is shared (`Arc`) so several call sites guarding the same
/// dependency trip together.
#[derive(Clone)]
pub struct CallPolicy {
    pub retry: RetryPolicy,
    pub breaker: Arc<CircuitBreaker>,
    pub attempt_timeout: Duration,
}

impl CallPolicy {
    pub fn new(retry: RetryPolicy, breaker: Arc<CircuitBreaker>, attempt_timeout: Duration) -> Self {
        Self {
            retry,
            breaker,
            attempt_timeout,
        }
    }
}

/// One named operation wrapped in the full resilience envelope.
///
/// Stacking order, outermost first: metrics, retry, breaker, timeout.
/// Metrics record a single duration spanning every attempt; the breaker
/// is consulted before each attempt, after retry has decided to try
/// again; the timeout bounds each admitted attempt so a hang becomes a
/// failure the breaker can count. Result caching sits outside this
/// envelope and only in front of idempotent reads.
pub struct ResilientCall<'a> {
    operation: &'a str,
    policy: &'a CallPolicy,
}

impl<'a> ResilientCall<'a> {
    pub fn new(operation: &'a str, policy: &'a CallPolicy) -> Self {
        Self { operation, policy }
    }

    /// Run the wrapped operation through the envelope.
    pub async fn run<T, F, Fut>(&self, op: F) -> Result<T>
    where
        F: Fn() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let operation = self.operation;
        let policy = self.policy;
        let started = Instant::now();

        let result = policy
            .retry
            .run(operation, || async {
                policy.breaker.try_acquire()?;
                switchboard_observe::metrics::track_attempt(operation);

                let outcome = match timeout(policy.attempt_timeout, op()).await {
                    Ok(outcome) => outcome,
                    Err(_) => Err(Error::Timeout(operation.to_string())),
                };

                match outcome {
                    Ok(value) => {
                        policy.breaker.record_success();
                        Ok(value)
                    }
                    Err(err) => {
                        policy.breaker.record_failure();
                        Err(err)
                    }
                }
            })
            .await;

        let outcome = if result.is_ok() { "success" } else { "failure" };
        switchboard_observe::metrics::track_call(operation, outcome, started.elapsed().as_secs_f64());
        result
    }
}
