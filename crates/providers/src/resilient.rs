//! Resilient provider wrappers.
//!
//! Each wrapper implements the same trait as the client it wraps and runs
//! every call through a [`ResilientCall`] envelope, so callers pick up
//! retry, breaker, timeout, and metrics without changing their code.

use std::sync::Arc;

use async_trait::async_trait;

use switchboard_core::{LlmClient, Result, SpeechSynthesizer, Transcriber};
use switchboard_resilience::{CallPolicy, ResilientCall, ResultCache};

/// LLM client wrapped in the resilience envelope.
///
/// Completion and embedding run under the same policy and thus share one
/// circuit breaker: the upstream is a single dependency regardless of
/// which endpoint a call hits.
pub struct ResilientLlmClient {
    inner: Arc<dyn LlmClient>,
    policy: CallPolicy,
    embed_cache: Option<ResultCache>,
}

impl ResilientLlmClient {
    pub fn new(inner: Arc<dyn LlmClient>, policy: CallPolicy) -> Self {
        Self {
            inner,
            policy,
            embed_cache: None,
        }
    }

    /// Cache embeddings. They are idempotent reads keyed by exact text,
    /// so a cache hit skips the envelope entirely.
    pub fn with_embed_cache(mut self, cache: ResultCache) -> Self {
        self.embed_cache = Some(cache);
        self
    }

    async fn embed_resilient(&self, text: &str) -> Result<Vec<f32>> {
        ResilientCall::new("llm_embed", &self.policy)
            .run(|| self.inner.embed(text))
            .await
    }
}

#[async_trait]
impl LlmClient for ResilientLlmClient {
    async fn complete(&self, system: &str, prompt: &str) -> Result<String> {
        ResilientCall::new("llm_complete", &self.policy)
            .run(|| self.inner.complete(system, prompt))
            .await
    }

    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        match &self.embed_cache {
            Some(cache) => {
                let encoded = cache
                    .get_or_compute("llm_embed", text, || async {
                        let vector = self.embed_resilient(text).await?;
                        serde_json::to_string(&vector).map_err(Into::into)
                    })
                    .await?;
                serde_json::from_str(&encoded).map_err(Into::into)
            }
            None => self.embed_resilient(text).await,
        }
    }
}

/// Transcriber wrapped in the resilience envelope.
pub struct ResilientTranscriber {
    inner: Arc<dyn Transcriber>,
    policy: CallPolicy,
}

impl ResilientTranscriber {
    pub fn new(inner: Arc<dyn Transcriber>, policy: CallPolicy) -> Self {
        Self { inner, policy }
    }
}

#[async_trait]
impl Transcriber for ResilientTranscriber {
    async fn transcribe(&self, audio: &[u8]) -> Result<String> {
        ResilientCall::new("transcribe_audio", &self.policy)
            .run(|| self.inner.transcribe(audio))
            .await
    }
}

/// Speech synthesizer wrapped in the resilience envelope.
pub struct ResilientSynthesizer {
    inner: Arc<dyn SpeechSynthesizer>,
    policy: CallPolicy,
}

impl ResilientSynthesizer {
    pub fn new(inner: Arc<dyn SpeechSynthesizer>, policy: CallPolicy) -> Self {
        Self { inner, policy }
    }
}

#[async_trait]
impl SpeechSynthesizer for ResilientSynthesizer {
    async fn synthesize(&self, text: &str) -> Result<Vec<u8>> {
        ResilientCall::new("synthesize_speech", &self.policy)
            .run(|| self.inner.synthesize(text))
            .await
    }
}
