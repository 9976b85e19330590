//! Append-only interaction history over a vector index.

use std::sync::Arc;

use switchboard_core::{
    traits::{InteractionIndex, LlmClient},
    types::{InputKind, Interaction, ScoredInteraction},
    Result,
};

use crate::retention::RetentionPolicy;

/// Interaction history with similarity search.
///
/// Writes never fail the caller: an embedding failure downgrades the row to
/// metadata-only, and an index failure is logged and swallowed. Reads
/// degrade to empty lists.
pub struct InteractionLog {
    index: Arc<dyn InteractionIndex>,
    embedder: Option<Arc<dyn LlmClient>>,
    retention: RetentionPolicy,
}

impl InteractionLog {
    /// Create a log over an index, without similarity search.
    pub fn new(index: Arc<dyn InteractionIndex>) -> Self {
        Self {
            index,
            embedder: None,
            retention: RetentionPolicy::default(),
        }
    }

    /// Enable similarity search by embedding stored content.
    pub fn with_embedder(mut self, embedder: Arc<dyn LlmClient>) -> Self {
        self.embedder = Some(embedder);
        self
    }

    /// Override the retention window.
    pub fn with_retention(mut self, retention: RetentionPolicy) -> Self {
        self.retention = retention;
        self
    }

    /// Record one turn. Always returns the generated interaction id, even
    /// when the index write fails.
    pub async fn store_interaction(
        &self,
        user_id: Option<&str>,
        session_id: Option<&str>,
        kind: InputKind,
        content: &str,
        intent: Option<&str>,
        response: Option<&str>,
    ) -> String {
        let mut interaction = Interaction::new(kind, content);
        if let Some(user_id) = user_id {
            interaction = interaction.with_user(user_id);
        }
        if let Some(session_id) = session_id {
            interaction = interaction.with_session(session_id);
        }
        if let Some(intent) = intent {
            interaction = interaction.with_intent(intent);
        }
        if let Some(response) = response {
            interaction = interaction.with_response(response);
        }

        let embedding = self.embed(content).await;
        let id = interaction.id.clone();

        if let Err(e) = self.index.upsert(&interaction, embedding).await {
            tracing::warn!(id = %id, error = %e, "Failed to index interaction");
        }

        id
    }

    async fn embed(&self, content: &str) -> Option<Vec<f32>> {
        let embedder = self.embedder.as_ref()?;
        match embedder.embed(content).await {
            Ok(vector) => Some(vector),
            Err(e) => {
                tracing::warn!(error = %e, "Embedding failed, storing interaction without vector");
                None
            }
        }
    }

    /// Newest interactions for a user. Empty on store failure.
    pub async fn recent(&self, user_id: &str, limit: usize) -> Vec<Interaction> {
        match self.index.recent(user_id, limit).await {
            Ok(items) => items,
            Err(e) => {
                tracing::warn!(user_id = %user_id, error = %e, "Failed to read recent interactions");
                Vec::new()
            }
        }
    }

    /// Nearest stored interactions to a free-text query. Empty on failure or
    /// when no embedder is configured.
    pub async fn search_similar(
        &self,
        query: &str,
        user_id: Option<&str>,
        limit: usize,
    ) -> Vec<ScoredInteraction> {
        let embedder = match self.embedder.as_ref() {
            Some(embedder) => embedder,
            None => {
                tracing::debug!("No embedder configured, similarity search returns nothing");
                return Vec::new();
            }
        };

        let embedding = match embedder.embed(query).await {
            Ok(vector) => vector,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to embed similarity query");
                return Vec::new();
            }
        };

        match self.index.search(embedding, limit, user_id).await {
            Ok(items) => items,
            Err(e) => {
                tracing::warn!(error = %e, "Similarity search failed");
                Vec::new()
            }
        }
    }

    /// Remove interactions older than the retention window. Returns the
    /// removed count.
    pub async fn prune(&self) -> Result<u64> {
        self.index.prune(self.retention.cutoff()).await
    }
}
