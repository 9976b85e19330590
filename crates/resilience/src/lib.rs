//! Resilience envelope for outbound calls.
//!
//! Explicit, composable policies instead of implicit wrappers: retry,
//! circuit breaker, per-attempt timeout, and a TTL result cache, stacked
//! in a fixed order by [`call::ResilientCall`].

pub mod breaker;
pub mod cache;
pub mod call;
pub mod retry;

pub use breaker::{BreakerConfig, BreakerState, CircuitBreaker};
pub use cache::ResultCache;
pub use call::{CallPolicy, ResilientCall};
pub use retry::RetryPolicy;
