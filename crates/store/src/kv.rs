//! In-memory key-value cache using DashMap.

use async_trait::async_trait;
use dashmap::DashMap;
use std::time::Duration;
use tokio::time::Instant;

use switchboard_core::{traits::KeyValueCache, Result};

/// In-memory TTL'd cache backed by a concurrent map.
///
/// Expired entries are dropped lazily on the next read of their key. Expiry
/// runs on the tokio clock, so entries age under `tokio::time::pause` in
/// tests the same way they age on the wall clock.
#[derive(Debug, Default)]
pub struct MemoryKv {
    data: DashMap<String, (String, Instant)>,
}

impl MemoryKv {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self {
            data: DashMap::new(),
        }
    }

    /// Number of entries currently held, including not-yet-collected expired ones.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Check if the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

#[async_trait]
impl KeyValueCache for MemoryKv {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let live = self.data.get(key).and_then(|entry| {
            let (value, expires_at) = entry.value();
            (Instant::now() < *expires_at).then(|| value.clone())
        });

        if live.is_none() {
            self.data
                .remove_if(key, |_, (_, expires_at)| Instant::now() >= *expires_at);
        }

        Ok(live)
    }

    async fn set_ex(&self, key: &str, value: &str, ttl_secs: u64) -> Result<()> {
        let expires_at = Instant::now() + Duration::from_secs(ttl_secs);
        self.data
            .insert(key.to_string(), (value.to_string(), expires_at));
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<()> {
        self.data.remove(key);
        Ok(())
    }
}
