//! Circuit breaker state machine.

use std::sync::{Mutex, MutexGuard};
use tokio::time::{Duration, Instant};

use switchboard_core::{Error, Result};

/// Breaker thresholds.
#[derive(Debug, Clone, Copy)]
pub struct BreakerConfig {
    /// Consecutive failures that open the breaker.
    pub failure_threshold: u32,
    /// How long the breaker stays open before allowing a probe.
    pub recovery_timeout: Duration,
}

impl Default for BreakerConfig {
    fn default() -> Self {
        Self {
            failure_threshold: 5,
            recovery_timeout: Duration::from_secs(60),
        }
    }
}

impl BreakerConfig {
    /// Tighter policy for lower-tier or optional dependencies.
    pub fn tight() -> Self {
        Self {
            failure_threshold: 3,
            recovery_timeout: Duration::from_secs(30),
        }
    }
}

/// Observable breaker state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BreakerState {
    /// Calls pass through; failures are counted.
    Closed,
    /// Calls are rejected without invoking the dependency.
    Open,
    /// One probe call is in flight; its outcome decides the next state.
    HalfOpen,
}

#[derive(Debug)]
struct BreakerInner {
    state: BreakerState,
    failure_count: u32,
    last_failure: Option<Instant>,
    probe_in_flight: bool,
}

/// Circuit breaker guarding one named dependency.
///
/// Callers ask [`CircuitBreaker::try_acquire`] before each attempt and
/// report the outcome with `record_success` / `record_failure`.
/// Rejected acquires never count as failures; only the outcome of
/// admitted attempts moves the failure count.
#[derive(Debug)]
pub struct CircuitBreaker {
    name: String,
    config: BreakerConfig,
    inner: Mutex<BreakerInner>,
}

impl CircuitBreaker {
    pub fn new(name: impl Into<String>, config: BreakerConfig) -> Self {
        Self {
            name: name.into(),
            config,
            inner: Mutex::new(BreakerInner {
                state: BreakerState::Closed,
                failure_count: 0,
                last_failure: None,
                probe_in_flight: false,
            }),
        }
    }

    /// Breaker name as used in errors and logs.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Ask permission for one attempt.
    pub fn try_acquire(&self) -> Result<()> {
        let mut inner = self.lock();
        match inner.state {
            BreakerState::Closed => Ok(()),
            BreakerState::Open => {
                let recovered = inner
                    .last_failure
                    .map(|at| at.elapsed() >= self.config.recovery_timeout)
                    .unwrap_or(true);
                if recovered {
                    inner.state = BreakerState::HalfOpen;
                    inner.probe_in_flight = true;
                    tracing::info!(breaker = %self.name, "circuit breaker half-open, probing");
                    Ok(())
                } else {
                    Err(Error::BreakerOpen(self.name.clone()))
                }
            }
            BreakerState::HalfOpen => {
                if inner.probe_in_flight {
                    Err(Error::BreakerOpen(self.name.clone()))
                } else {
                    inner.probe_in_flight = true;
                    Ok(())
                }
            }
        }
    }

    /// Record a successful attempt: closes the breaker and resets counts.
    pub fn record_success(&self) {
        let mut inner = self.lock();
        if inner.state == BreakerState::HalfOpen {
            tracing::info!(breaker = %self.name, "circuit breaker closed after successful probe");
        }
        inner.state = BreakerState::Closed;
        inner.failure_count = 0;
        inner.last_failure = None;
        inner.probe_in_flight = false;
    }

    /// Record a failed attempt.
    pub fn record_failure(&self) {
        let mut inner = self.lock();
        inner.last_failure = Some(Instant::now());
        inner.probe_in_flight = false;
        match inner.state {
            BreakerState::HalfOpen => {
                inner.state = BreakerState::Open;
                tracing::warn!(breaker = %self.name, "circuit breaker re-opened after failed probe");
            }
            BreakerState::Closed => {
                inner.failure_count += 1;
                if inner.failure_count >= self.config.failure_threshold {
                    inner.state = BreakerState::Open;
                    tracing::warn!(
                        breaker = %self.name,
                        failures = inner.failure_count,
                        "circuit breaker opened"
                    );
                }
            }
            BreakerState::Open => {
                // Late report from an attempt admitted before the breaker opened
                inner.failure_count += 1;
            }
        }
    }

    /// Current state, as last observed.
    pub fn state(&self) -> BreakerState {
        self.lock().state
    }

    /// Consecutive failure count.
    pub fn failure_count(&self) -> u32 {
        self.lock().failure_count
    }

    fn lock(&self) -> MutexGuard<'_, BreakerInner> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn breaker(threshold: u32, recovery_secs: u64) -> CircuitBreaker {
        CircuitBreaker::new(
            "test",
            BreakerConfig {
                failure_threshold: threshold,
                recovery_timeout: Duration::from_secs(recovery_secs),
            },
        )
    }

    #[tokio::test(start_paused = true)]
    async fn opens_after_threshold_failures() {
        let breaker = breaker(2, 1);

        breaker.try_acquire().unwrap();
        breaker.record_failure();
        assert_eq!(breaker.state(), BreakerState::Closed);

        breaker.try_acquire().unwrap();
        breaker.record_failure();
        assert_eq!(breaker.state(), BreakerState::Open);

        let rejected = breaker.try_acquire();
        assert!(matches!(rejected, Err(Error::BreakerOpen(_))));
        // Rejections do not move the failure count
        assert_eq!(breaker.failure_count(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn probe_success_closes_breaker() {
        let breaker = breaker(2, 1);
        breaker.record_failure();
        breaker.record_failure();
        assert_eq!(breaker.state(), BreakerState::Open);

        tokio::time::advance(Duration::from_millis(1100)).await;

        breaker.try_acquire().unwrap();
        assert_eq!(breaker.state(), BreakerState::HalfOpen);
        breaker.record_success();
        assert_eq!(breaker.state(), BreakerState::Closed);
        assert_eq!(breaker.failure_count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn probe_failure_reopens_breaker() {
        let breaker = breaker(1, 1);
        breaker.record_failure();
        assert_eq!(breaker.state(), BreakerState::Open);

        tokio::time::advance(Duration::from_millis(1100)).await;
        breaker.try_acquire().unwrap();
        breaker.record_failure();
        assert_eq!(breaker.state(), BreakerState::Open);

        // A fresh recovery window is required before the next probe
        assert!(breaker.try_acquire().is_err());
        tokio::time::advance(Duration::from_millis(1100)).await;
        breaker.try_acquire().unwrap();
        breaker.record_success();
        assert_eq!(breaker.state(), BreakerState::Closed);
    }

    #[tokio::test(start_paused = true)]
    async fn half_open_admits_single_probe() {
        let breaker = breaker(1, 1);
        breaker.record_failure();

        tokio::time::advance(Duration::from_millis(1100)).await;

        breaker.try_acquire().unwrap();
        // Concurrent acquire while the probe is in flight is rejected
        assert!(matches!(
            breaker.try_acquire(),
            Err(Error::BreakerOpen(_))
        ));

        breaker.record_success();
        assert!(breaker.try_acquire().is_ok());
    }

    #[tokio::test(start_paused = true)]
    async fn success_resets_consecutive_count() {
        let breaker = breaker(3, 1);
        breaker.record_failure();
        breaker.record_failure();
        breaker.record_success();
        assert_eq!(breaker.failure_count(), 0);

        breaker.record_failure();
        breaker.record_failure();
        assert_eq!(breaker.state(), BreakerState::Closed);
    }
}
