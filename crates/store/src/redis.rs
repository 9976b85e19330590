//! Redis implementation of the key-value cache.

use async_trait::async_trait;
use redis::{AsyncCommands, Client};

use switchboard_core::{traits::KeyValueCache, Error, Result};

/// Redis-backed TTL'd cache.
///
/// TTLs are enforced server-side via `SETEX`, so multiple Switchboard
/// instances pointed at the same Redis share one cache.
pub struct RedisKv {
    client: Client,
}

impl RedisKv {
    /// Create a new Redis cache client for the given URL.
    ///
    /// Connections are established lazily per operation; this only validates
    /// the URL.
    pub fn new(url: &str) -> Result<Self> {
        let client = Client::open(url)
            .map_err(|e| Error::cache(format!("Failed to connect to Redis: {}", e)))?;

        Ok(Self { client })
    }

    async fn connection(&self) -> Result<redis::aio::MultiplexedConnection> {
        self.client
            .get_multiplexed_async_connection()
            .await
            .map_err(|e| Error::cache(format!("Redis connection error: {}", e)))
    }
}

#[async_trait]
impl KeyValueCache for RedisKv {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let mut conn = self.connection().await?;

        let value: Option<String> = conn
            .get(key)
            .await
            .map_err(|e| Error::cache(format!("Redis get error: {}", e)))?;

        Ok(value)
    }

    async fn set_ex(&self, key: &str, value: &str, ttl_secs: u64) -> Result<()> {
        let mut conn = self.connection().await?;

        let _: () = conn
            .set_ex(key, value, ttl_secs)
            .await
            .map_err(|e| Error::cache(format!("Redis set error: {}", e)))?;

        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<()> {
        let mut conn = self.connection().await?;

        let _: () = conn
            .del(key)
            .await
            .map_err(|e| Error::cache(format!("Redis delete error: {}", e)))?;

        Ok(())
    }
}
