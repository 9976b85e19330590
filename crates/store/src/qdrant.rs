//! Qdrant-backed interaction index.
//!
//! Production backend for the interaction history: one point per interaction,
//! payload fields mirroring the `Interaction` struct, and a `timestamp_unix`
//! integer field so retention pruning can run server-side.

use async_trait::async_trait;
use qdrant_client::qdrant::{
    Condition, CountPointsBuilder, CreateCollectionBuilder, DeletePointsBuilder, Distance, Filter,
    PointId, PointStruct, Range, ScrollPointsBuilder, SearchPointsBuilder, UpsertPointsBuilder,
    Value as QdrantValue, VectorParamsBuilder, VectorsConfig,
    vectors_config::Config as VectorsConfigEnum,
};
use qdrant_client::Qdrant;
use std::collections::HashMap;

use chrono::{DateTime, Utc};
use switchboard_core::{
    traits::InteractionIndex,
    types::{InputKind, Interaction, ScoredInteraction},
    Error, Result,
};

/// One scroll page when assembling recent history. Interactions beyond this
/// window are only reachable through similarity search.
const RECENT_SCAN_LIMIT: u32 = 256;

/// Configuration for the Qdrant connection.
#[derive(Debug, Clone)]
pub struct QdrantConfig {
    /// Qdrant server URL.
    pub url: String,
    /// Collection name.
    pub collection_name: String,
    /// Vector dimension (e.g., 1536 for OpenAI embeddings).
    pub vector_size: u64,
}

impl Default for QdrantConfig {
    fn default() -> Self {
        Self {
            url: "http://localhost:6334".to_string(),
            collection_name: "switchboard_interactions".to_string(),
            vector_size: 1536,
        }
    }
}

/// Qdrant-backed interaction index for production deployments.
pub struct QdrantIndex {
    client: Qdrant,
    collection_name: String,
    vector_size: u64,
}

impl QdrantIndex {
    /// Connect to Qdrant and ensure the collection exists.
    pub async fn new(url: &str, collection_name: &str, vector_size: u64) -> Result<Self> {
        let client = Qdrant::from_url(url)
            .build()
            .map_err(|e| Error::storage(format!("Failed to connect to Qdrant: {}", e)))?;

        let index = Self {
            client,
            collection_name: collection_name.to_string(),
            vector_size,
        };

        index.ensure_collection().await?;

        Ok(index)
    }

    /// Connect using a [`QdrantConfig`].
    pub async fn from_config(config: &QdrantConfig) -> Result<Self> {
        Self::new(&config.url, &config.collection_name, config.vector_size).await
    }

    /// Ensure the collection exists, creating it if necessary.
    async fn ensure_collection(&self) -> Result<()> {
        let collections = self
            .client
            .list_collections()
            .await
            .map_err(|e| Error::storage(format!("Failed to list collections: {}", e)))?;

        let exists = collections
            .collections
            .iter()
            .any(|c| c.name == self.collection_name);

        if !exists {
            tracing::info!(collection = %self.collection_name, "Creating Qdrant collection");

            let vectors_config = VectorsConfig {
                config: Some(VectorsConfigEnum::Params(
                    VectorParamsBuilder::new(self.vector_size, Distance::Cosine).build(),
                )),
            };

            self.client
                .create_collection(
                    CreateCollectionBuilder::new(&self.collection_name)
                        .vectors_config(vectors_config),
                )
                .await
                .map_err(|e| Error::storage(format!("Failed to create collection: {}", e)))?;
        }

        Ok(())
    }

    /// Convert an interaction into the Qdrant payload format.
    fn to_payload(interaction: &Interaction, has_embedding: bool) -> HashMap<String, QdrantValue> {
        let mut payload = HashMap::new();

        payload.insert("content".to_string(), string_value(&interaction.content));
        payload.insert("kind".to_string(), string_value(interaction.kind.as_str()));
        payload.insert(
            "timestamp".to_string(),
            string_value(&interaction.timestamp.to_rfc3339()),
        );
        payload.insert(
            "timestamp_unix".to_string(),
            integer_value(interaction.timestamp.timestamp()),
        );
        payload.insert(
            "has_embedding".to_string(),
            QdrantValue {
                kind: Some(qdrant_client::qdrant::value::Kind::BoolValue(has_embedding)),
            },
        );

        if let Some(user_id) = &interaction.user_id {
            payload.insert("user_id".to_string(), string_value(user_id));
        }
        if let Some(session_id) = &interaction.session_id {
            payload.insert("session_id".to_string(), string_value(session_id));
        }
        if let Some(intent) = &interaction.intent {
            payload.insert("intent".to_string(), string_value(intent));
        }
        if let Some(response) = &interaction.response {
            payload.insert("response".to_string(), string_value(response));
        }

        payload
    }

    /// Rebuild an interaction from a Qdrant payload.
    fn interaction_from_payload(id: String, payload: &HashMap<String, QdrantValue>) -> Interaction {
        let field = |key: &str| -> Option<String> {
            payload.get(key).and_then(|value| match &value.kind {
                Some(qdrant_client::qdrant::value::Kind::StringValue(s)) => Some(s.clone()),
                _ => None,
            })
        };

        let kind = match field("kind").as_deref() {
            Some("audio") => InputKind::Audio,
            _ => InputKind::Text,
        };

        let timestamp = field("timestamp")
            .and_then(|raw| DateTime::parse_from_rfc3339(&raw).ok())
            .map(|parsed| parsed.with_timezone(&Utc))
            .unwrap_or(DateTime::UNIX_EPOCH);

        Interaction {
            id,
            user_id: field("user_id"),
            session_id: field("session_id"),
            kind,
            content: field("content").unwrap_or_default(),
            intent: field("intent"),
            response: field("response"),
            timestamp,
        }
    }
}

fn string_value(s: &str) -> QdrantValue {
    QdrantValue {
        kind: Some(qdrant_client::qdrant::value::Kind::StringValue(s.to_string())),
    }
}

fn integer_value(n: i64) -> QdrantValue {
    QdrantValue {
        kind: Some(qdrant_client::qdrant::value::Kind::IntegerValue(n)),
    }
}

fn point_id_to_string(id: PointId) -> Option<String> {
    match id.point_id_options {
        Some(qdrant_client::qdrant::point_id::PointIdOptions::Uuid(uuid)) => Some(uuid),
        Some(qdrant_client::qdrant::point_id::PointIdOptions::Num(num)) => Some(num.to_string()),
        None => None,
    }
}

#[async_trait]
impl InteractionIndex for QdrantIndex {
    async fn upsert(&self, interaction: &Interaction, embedding: Option<Vec<f32>>) -> Result<()> {
        let has_embedding = embedding.is_some();
        // Metadata-only rows carry a zero vector; `has_embedding` keeps them
        // out of similarity results.
        let vector = embedding.unwrap_or_else(|| vec![0.0; self.vector_size as usize]);

        let point = PointStruct::new(
            interaction.id.clone(),
            vector,
            Self::to_payload(interaction, has_embedding),
        );

        self.client
            .upsert_points(UpsertPointsBuilder::new(&self.collection_name, vec![point]))
            .await
            .map_err(|e| Error::storage(format!("Failed to upsert interaction: {}", e)))?;

        tracing::debug!(id = %interaction.id, "Stored interaction in Qdrant");
        Ok(())
    }

    async fn recent(&self, user_id: &str, limit: usize) -> Result<Vec<Interaction>> {
        let filter = Filter::must([Condition::matches("user_id", user_id.to_string())]);

        let response = self
            .client
            .scroll(
                ScrollPointsBuilder::new(&self.collection_name)
                    .filter(filter)
                    .limit(RECENT_SCAN_LIMIT)
                    .with_payload(true),
            )
            .await
            .map_err(|e| Error::storage(format!("Failed to scroll interactions: {}", e)))?;

        let mut interactions: Vec<Interaction> = response
            .result
            .into_iter()
            .filter_map(|point| {
                let id = point_id_to_string(point.id?)?;
                Some(Self::interaction_from_payload(id, &point.payload))
            })
            .collect();

        interactions.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        interactions.truncate(limit);
        Ok(interactions)
    }

    async fn search(
        &self,
        embedding: Vec<f32>,
        limit: usize,
        user_id: Option<&str>,
    ) -> Result<Vec<ScoredInteraction>> {
        let mut conditions = vec![Condition::matches("has_embedding", true)];
        if let Some(user) = user_id {
            conditions.push(Condition::matches("user_id", user.to_string()));
        }

        let response = self
            .client
            .search_points(
                SearchPointsBuilder::new(&self.collection_name, embedding, limit as u64)
                    .filter(Filter::must(conditions))
                    .with_payload(true),
            )
            .await
            .map_err(|e| Error::storage(format!("Failed to search interactions: {}", e)))?;

        let results = response
            .result
            .into_iter()
            .filter_map(|point| {
                let id = point_id_to_string(point.id?)?;
                let interaction = Self::interaction_from_payload(id, &point.payload);
                Some(ScoredInteraction {
                    interaction,
                    score: point.score,
                })
            })
            .collect();

        Ok(results)
    }

    async fn prune(&self, older_than: DateTime<Utc>) -> Result<u64> {
        let filter = Filter::must([Condition::range(
            "timestamp_unix",
            Range {
                lt: Some(older_than.timestamp() as f64),
                ..Default::default()
            },
        )]);

        let count = self
            .client
            .count(
                CountPointsBuilder::new(&self.collection_name)
                    .filter(filter.clone())
                    .exact(true),
            )
            .await
            .map_err(|e| Error::storage(format!("Failed to count stale interactions: {}", e)))?
            .result
            .map(|r| r.count)
            .unwrap_or(0);

        if count == 0 {
            return Ok(0);
        }

        self.client
            .delete_points(DeletePointsBuilder::new(&self.collection_name).points(filter))
            .await
            .map_err(|e| Error::storage(format!("Failed to prune interactions: {}", e)))?;

        tracing::info!(
            removed = count,
            collection = %self.collection_name,
            "Pruned stale interactions"
        );
        Ok(count)
    }
}
