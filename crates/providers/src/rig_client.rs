//! Rig LLM client adapter.
//!
//! Wraps Rig's Agent for integration with our LlmClient trait. One client
//! serves both intent classification and handler-side generation, so the
//! system prompt is passed per call rather than baked into the config.

use async_trait::async_trait;

use switchboard_core::{Error, LlmClient, Result};

use rig::agent::AgentBuilder;
use rig::client::{CompletionClient, EmbeddingsClient, ProviderClient};
use rig::completion::{CompletionModel, Prompt};
use rig::providers::{anthropic, openai};

/// Provider type for Rig clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RigProvider {
    OpenAI,
    Anthropic,
}

/// Configuration for Rig client.
#[derive(Debug, Clone)]
pub struct RigConfig {
    /// Provider to use.
    pub provider: RigProvider,
    /// Model name.
    pub model: String,
    /// Embedding model name (always served by OpenAI).
    pub embedding_model: String,
    /// Temperature (0.0 - 1.0).
    pub temperature: Option<f32>,
    /// Max tokens.
    pub max_tokens: Option<u32>,
}

impl Default for RigConfig {
    fn default() -> Self {
        // Classification replies are small JSON objects, not prose.
        Self {
            provider: RigProvider::OpenAI,
            model: "gpt-4o-mini".to_string(),
            embedding_model: "text-embedding-3-small".to_string(),
            temperature: Some(0.1),
            max_tokens: Some(200),
        }
    }
}

impl RigConfig {
    /// Create config for OpenAI.
    pub fn openai(model: impl Into<String>) -> Self {
        Self {
            provider: RigProvider::OpenAI,
            model: model.into(),
            ..Default::default()
        }
    }

    /// Create config for Anthropic.
    pub fn anthropic(model: impl Into<String>) -> Self {
        Self {
            provider: RigProvider::Anthropic,
            model: model.into(),
            ..Default::default()
        }
    }

    /// Set embedding model.
    pub fn with_embedding_model(mut self, model: impl Into<String>) -> Self {
        self.embedding_model = model.into();
        self
    }

    /// Set temperature.
    pub fn with_temperature(mut self, temp: f32) -> Self {
        self.temperature = Some(temp);
        self
    }

    /// Set max tokens.
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }
}

fn require_env(key: &str) -> Result<()> {
    if std::env::var(key).is_err() {
        return Err(Error::provider(format!("{} not set", key)));
    }
    Ok(())
}

/// Rig-based LLM client.
///
/// Holds configuration only; the underlying provider client is constructed
/// from the environment per call, matching Rig's `from_env` lifecycle.
pub struct RigLlmClient {
    config: RigConfig,
}

impl RigLlmClient {
    /// Create a new Rig client with the given configuration.
    pub fn new(config: RigConfig) -> Self {
        Self { config }
    }

    /// Apply the configured sampling options and run one prompt. The same
    /// path serves both providers; only the builder's model type differs.
    async fn prompt_agent<M>(
        &self,
        mut builder: AgentBuilder<M>,
        system: &str,
        prompt: &str,
    ) -> Result<String>
    where
        M: CompletionModel,
    {
        if !system.is_empty() {
            builder = builder.preamble(system);
        }
        if let Some(temp) = self.config.temperature {
            builder = builder.temperature(f64::from(temp));
        }
        if let Some(max) = self.config.max_tokens {
            builder = builder.max_tokens(u64::from(max));
        }

        builder.build().prompt(prompt).await.map_err(|e| {
            Error::provider(format!("{:?} error: {}", self.config.provider, e))
        })
    }
}

#[async_trait]
impl LlmClient for RigLlmClient {
    async fn complete(&self, system: &str, prompt: &str) -> Result<String> {
        tracing::debug!(
            provider = ?self.config.provider,
            model = %self.config.model,
            prompt_len = prompt.len(),
            "Calling LLM"
        );

        match self.config.provider {
            RigProvider::OpenAI => {
                require_env("OPENAI_API_KEY")?;
                let client = openai::Client::from_env();
                self.prompt_agent(client.agent(&self.config.model), system, prompt)
                    .await
            }
            RigProvider::Anthropic => {
                require_env("ANTHROPIC_API_KEY")?;
                let client = anthropic::Client::from_env();
                self.prompt_agent(client.agent(&self.config.model), system, prompt)
                    .await
            }
        }
    }

    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        use rig::embeddings::EmbeddingsBuilder;

        require_env("OPENAI_API_KEY")
            .map_err(|_| Error::provider("OPENAI_API_KEY not set for embeddings"))?;

        let client = openai::Client::from_env();
        let embedding_model = client.embedding_model(&self.config.embedding_model);

        let result = EmbeddingsBuilder::new(embedding_model)
            .document(text)
            .map_err(|e| Error::provider(format!("Embedding builder error: {}", e)))?
            .build()
            .await
            .map_err(|e| Error::provider(format!("Embedding error: {}", e)))?;

        // Embeddings come back f64; the index stores f32.
        if let Some((_, one_or_many)) = result.into_iter().next() {
            if let Some(embedding) = one_or_many.into_iter().next() {
                return Ok(embedding.vec.into_iter().map(|x| x as f32).collect());
            }
        }

        Err(Error::provider("No embedding returned"))
    }
}

/// Create an LLM client for the given models based on available API keys.
pub fn create_default_client(model: &str, embedding_model: &str) -> Result<RigLlmClient> {
    if std::env::var("OPENAI_API_KEY").is_ok() {
        Ok(RigLlmClient::new(
            RigConfig::openai(model).with_embedding_model(embedding_model),
        ))
    } else if std::env::var("ANTHROPIC_API_KEY").is_ok() {
        Ok(RigLlmClient::new(
            RigConfig::anthropic(model).with_embedding_model(embedding_model),
        ))
    } else {
        Err(Error::provider(
            "No API key found. Set OPENAI_API_KEY or ANTHROPIC_API_KEY",
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_builder_applies_overrides() {
        let config = RigConfig::openai("gpt-4o")
            .with_embedding_model("text-embedding-3-large")
            .with_temperature(0.5);

        assert_eq!(config.provider, RigProvider::OpenAI);
        assert_eq!(config.model, "gpt-4o");
        assert_eq!(config.embedding_model, "text-embedding-3-large");
        assert_eq!(config.temperature, Some(0.5));
    }

    #[test]
    fn default_config_is_classifier_grade() {
        let config = RigConfig::default();

        assert_eq!(config.model, "gpt-4o-mini");
        assert_eq!(config.temperature, Some(0.1));
        assert_eq!(config.max_tokens, Some(200));
    }

    #[test]
    fn anthropic_config_keeps_the_provider() {
        let config = RigConfig::anthropic("claude-3-haiku-20240307").with_max_tokens(500);

        assert_eq!(config.provider, RigProvider::Anthropic);
        assert_eq!(config.max_tokens, Some(500));
    }

    #[test]
    fn missing_key_is_reported_by_name() {
        std::env::remove_var("SWITCHBOARD_PROBE_KEY");
        let err = require_env("SWITCHBOARD_PROBE_KEY").unwrap_err();
        assert!(err.to_string().contains("SWITCHBOARD_PROBE_KEY"));
    }
}
