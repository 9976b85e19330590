//! Persistence traits.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::Result;
use crate::types::{Interaction, ScoredInteraction};

/// Vector-indexed interaction store.
#[async_trait]
pub trait InteractionIndex: Send + Sync {
    /// Insert or update an interaction, optionally with its embedding.
    ///
    /// Interactions without an embedding are still stored and appear in
    /// `recent`, but never in `search` results.
    async fn upsert(&self, interaction: &Interaction, embedding: Option<Vec<f32>>) -> Result<()>;

    /// Most recent interactions for a user, newest first.
    async fn recent(&self, user_id: &str, limit: usize) -> Result<Vec<Interaction>>;

    /// Nearest interactions to a query embedding, optionally scoped to a user.
    async fn search(
        &self,
        embedding: Vec<f32>,
        limit: usize,
        user_id: Option<&str>,
    ) -> Result<Vec<ScoredInteraction>>;

    /// Delete interactions older than the cutoff. Returns the removed count.
    async fn prune(&self, older_than: DateTime<Utc>) -> Result<u64>;
}

/// TTL'd key-value cache.
#[async_trait]
pub trait KeyValueCache: Send + Sync {
    /// Fetch a value if present and unexpired.
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Store a value with a TTL in seconds.
    async fn set_ex(&self, key: &str, value: &str, ttl_secs: u64) -> Result<()>;

    /// Remove a key.
    async fn delete(&self, key: &str) -> Result<()>;
}
