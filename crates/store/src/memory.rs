//! In-memory interaction index using cosine similarity.
//!
//! Reference backend and the fallback when no Qdrant URL is configured.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;

use switchboard_core::{
    traits::InteractionIndex,
    types::{Interaction, ScoredInteraction},
    Result,
};

/// In-memory vector index over stored interactions.
#[derive(Debug, Default)]
pub struct InMemoryIndex {
    data: DashMap<String, (Interaction, Option<Vec<f32>>)>,
}

impl InMemoryIndex {
    /// Create an empty index.
    pub fn new() -> Self {
        Self {
            data: DashMap::new(),
        }
    }

    /// Number of stored interactions.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Check if the index is empty.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Calculate cosine similarity between two vectors.
    fn cosine_similarity(v1: &[f32], v2: &[f32]) -> f32 {
        if v1.len() != v2.len() {
            return 0.0;
        }

        let dot_product: f32 = v1.iter().zip(v2.iter()).map(|(a, b)| a * b).sum();
        let magnitude1: f32 = v1.iter().map(|a| a * a).sum::<f32>().sqrt();
        let magnitude2: f32 = v2.iter().map(|a| a * a).sum::<f32>().sqrt();

        if magnitude1 == 0.0 || magnitude2 == 0.0 {
            return 0.0;
        }

        dot_product / (magnitude1 * magnitude2)
    }
}

#[async_trait]
impl InteractionIndex for InMemoryIndex {
    async fn upsert(&self, interaction: &Interaction, embedding: Option<Vec<f32>>) -> Result<()> {
        self.data
            .insert(interaction.id.clone(), (interaction.clone(), embedding));
        Ok(())
    }

    async fn recent(&self, user_id: &str, limit: usize) -> Result<Vec<Interaction>> {
        let mut matches: Vec<Interaction> = self
            .data
            .iter()
            .filter(|entry| entry.value().0.user_id.as_deref() == Some(user_id))
            .map(|entry| entry.value().0.clone())
            .collect();

        matches.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        matches.truncate(limit);
        Ok(matches)
    }

    async fn search(
        &self,
        embedding: Vec<f32>,
        limit: usize,
        user_id: Option<&str>,
    ) -> Result<Vec<ScoredInteraction>> {
        let mut scored: Vec<ScoredInteraction> = self
            .data
            .iter()
            .filter(|entry| match user_id {
                Some(user) => entry.value().0.user_id.as_deref() == Some(user),
                None => true,
            })
            .filter_map(|entry| {
                let (interaction, stored) = entry.value();
                // Rows stored without an embedding never match a search.
                stored.as_ref().map(|vector| ScoredInteraction {
                    interaction: interaction.clone(),
                    score: Self::cosine_similarity(&embedding, vector),
                })
            })
            .collect();

        // Sort by score descending
        scored.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
        scored.truncate(limit);
        Ok(scored)
    }

    async fn prune(&self, older_than: DateTime<Utc>) -> Result<u64> {
        let before = self.data.len();
        self.data
            .retain(|_, (interaction, _)| interaction.timestamp >= older_than);
        Ok(before.saturating_sub(self.data.len()) as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use switchboard_core::types::InputKind;

    fn aged(content: &str, user: &str, minutes_ago: i64) -> Interaction {
        let mut interaction = Interaction::new(InputKind::Text, content).with_user(user);
        interaction.timestamp = Utc::now() - Duration::minutes(minutes_ago);
        interaction
    }

    #[tokio::test]
    async fn search_ranks_by_cosine_similarity() {
        let index = InMemoryIndex::new();

        let apple = Interaction::new(InputKind::Text, "Apple");
        let banana = Interaction::new(InputKind::Text, "Banana");
        index.upsert(&apple, Some(vec![1.0, 0.0, 0.0])).await.unwrap();
        index.upsert(&banana, Some(vec![0.0, 1.0, 0.0])).await.unwrap();

        let results = index.search(vec![0.9, 0.1, 0.0], 1, None).await.unwrap();

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].interaction.content, "Apple");
        assert!(results[0].score > 0.9);
    }

    #[tokio::test]
    async fn search_scopes_to_the_given_user() {
        let index = InMemoryIndex::new();

        let mine = Interaction::new(InputKind::Text, "mine").with_user("u1");
        let theirs = Interaction::new(InputKind::Text, "theirs").with_user("u2");
        index.upsert(&mine, Some(vec![1.0, 0.0])).await.unwrap();
        index.upsert(&theirs, Some(vec![1.0, 0.0])).await.unwrap();

        let results = index.search(vec![1.0, 0.0], 10, Some("u1")).await.unwrap();

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].interaction.content, "mine");
    }

    #[tokio::test]
    async fn metadata_only_rows_never_match_a_search() {
        let index = InMemoryIndex::new();

        let bare = Interaction::new(InputKind::Text, "no vector");
        index.upsert(&bare, None).await.unwrap();

        let results = index.search(vec![1.0, 0.0], 10, None).await.unwrap();
        assert!(results.is_empty());
        assert_eq!(index.len(), 1);
    }

    #[tokio::test]
    async fn recent_returns_newest_first() {
        let index = InMemoryIndex::new();

        index.upsert(&aged("oldest", "u1", 30), None).await.unwrap();
        index.upsert(&aged("newest", "u1", 1), None).await.unwrap();
        index.upsert(&aged("middle", "u1", 10), None).await.unwrap();
        index.upsert(&aged("other user", "u2", 0), None).await.unwrap();

        let all = index.recent("u1", 10).await.unwrap();
        let contents: Vec<&str> = all.iter().map(|i| i.content.as_str()).collect();
        assert_eq!(contents, vec!["newest", "middle", "oldest"]);

        let limited = index.recent("u1", 2).await.unwrap();
        assert_eq!(limited.len(), 2);
        assert_eq!(limited[0].content, "newest");
    }

    #[tokio::test]
    async fn prune_removes_interactions_past_the_cutoff() {
        let index = InMemoryIndex::new();

        index.upsert(&aged("stale", "u1", 60), None).await.unwrap();
        index.upsert(&aged("fresh", "u1", 5), None).await.unwrap();

        let removed = index.prune(Utc::now() - Duration::minutes(30)).await.unwrap();

        assert_eq!(removed, 1);
        let remaining = index.recent("u1", 10).await.unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].content, "fresh");
    }

    #[tokio::test]
    async fn upsert_replaces_an_existing_row() {
        let index = InMemoryIndex::new();

        let first = Interaction::new(InputKind::Text, "draft").with_user("u1");
        let mut second = first.clone();
        second.content = "final".to_string();

        index.upsert(&first, None).await.unwrap();
        index.upsert(&second, None).await.unwrap();

        assert_eq!(index.len(), 1);
        let rows = index.recent("u1", 10).await.unwrap();
        assert_eq!(rows[0].content, "final");
    }
}
