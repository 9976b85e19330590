//! Speech provider traits.

use async_trait::async_trait;

use crate::error::Result;

/// Speech-to-text interface.
#[async_trait]
pub trait Transcriber: Send + Sync {
    /// Transcribe raw audio bytes to text.
    async fn transcribe(&self, audio: &[u8]) -> Result<String>;
}

/// Text-to-speech interface.
#[async_trait]
pub trait SpeechSynthesizer: Send + Sync {
    /// Render text to encoded audio bytes.
    async fn synthesize(&self, text: &str) -> Result<Vec<u8>>;
}
