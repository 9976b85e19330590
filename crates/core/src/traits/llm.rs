//! Model provider traits.

use async_trait::async_trait;

use crate::error::Result;

/// LLM client interface.
///
/// `system` is passed per call rather than baked into the client so the
/// classifier and the handlers can share one client (and one circuit
/// breaker) while using different preambles.
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Generate a completion for a system/user prompt pair.
    async fn complete(&self, system: &str, prompt: &str) -> Result<String>;

    /// Generate an embedding for text.
    async fn embed(&self, text: &str) -> Result<Vec<f32>>;
}
