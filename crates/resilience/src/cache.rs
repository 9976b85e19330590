//! TTL result cache over a shared key-value store.

use sha2::{Digest, Sha256};
use std::future::Future;
use std::sync::Arc;

use switchboard_core::{KeyValueCache, Result};

/// Memoizes operation results keyed by operation name and argument payload.
///
/// Cache trouble never fails the call: unreadable entries fall through to
/// the wrapped operation and write failures are logged and dropped.
#[derive(Clone)]
pub struct ResultCache {
    store: Arc<dyn KeyValueCache>,
    prefix: String,
    ttl_secs: u64,
}

impl ResultCache {
    pub fn new(store: Arc<dyn KeyValueCache>, prefix: impl Into<String>, ttl_secs: u64) -> Self {
        Self {
            store,
            prefix: prefix.into(),
            ttl_secs,
        }
    }

    fn key(&self, operation: &str, args: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(args.as_bytes());
        format!("{}:{}:{:x}", self.prefix, operation, hasher.finalize())
    }

    /// Look up `operation(args)`, running `op` on a miss and storing the result.
    pub async fn get_or_compute<F, Fut>(&self, operation: &str, args: &str, op: F) -> Result<String>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<String>>,
    {
        let key = self.key(operation, args);

        match self.store.get(&key).await {
            Ok(Some(hit)) => {
                switchboard_observe::metrics::track_cache(operation, "hit");
                tracing::debug!(operation, "result cache hit");
                return Ok(hit);
            }
            Ok(None) => {}
            Err(err) => {
                tracing::warn!(operation, error = %err, "cache read failed, computing directly");
            }
        }

        let value = op().await?;
        switchboard_observe::metrics::track_cache(operation, "miss");

        if let Err(err) = self.store.set_ex(&key, &value, self.ttl_secs).await {
            tracing::warn!(operation, error = %err, "cache write failed");
        }

        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use switchboard_core::mocks::FailingCache;
    use switchboard_store::MemoryKv;
    use tokio::time::Duration;

    #[tokio::test]
    async fn sequential_second_call_hits_cache() {
        let cache = ResultCache::new(Arc::new(MemoryKv::new()), "test", 60);
        let calls = AtomicU32::new(0);

        for _ in 0..2 {
            let value = cache
                .get_or_compute("describe", "greeting", || {
                    calls.fetch_add(1, Ordering::SeqCst);
                    async { Ok("hello there".to_string()) }
                })
                .await
                .unwrap();
            assert_eq!(value, "hello there");
        }

        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn distinct_args_compute_separately() {
        let cache = ResultCache::new(Arc::new(MemoryKv::new()), "test", 60);
        let calls = AtomicU32::new(0);

        for args in ["greeting", "goodbye"] {
            cache
                .get_or_compute("describe", args, || {
                    calls.fetch_add(1, Ordering::SeqCst);
                    async move { Ok(args.to_string()) }
                })
                .await
                .unwrap();
        }

        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn expired_entry_recomputes() {
        let cache = ResultCache::new(Arc::new(MemoryKv::new()), "test", 60);
        let calls = AtomicU32::new(0);

        let op = || {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Ok("v".to_string()) }
        };

        cache.get_or_compute("describe", "x", op).await.unwrap();
        tokio::time::advance(Duration::from_secs(61)).await;
        cache.get_or_compute("describe", "x", op).await.unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn unavailable_store_falls_through_to_operation() {
        let cache = ResultCache::new(Arc::new(FailingCache::new()), "test", 60);
        let calls = AtomicU32::new(0);

        for _ in 0..2 {
            let value = cache
                .get_or_compute("describe", "greeting", || {
                    calls.fetch_add(1, Ordering::SeqCst);
                    async { Ok("direct".to_string()) }
                })
                .await
                .unwrap();
            assert_eq!(value, "direct");
        }

        // Every call computes directly when the store is down
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }
}
