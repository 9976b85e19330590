//! Text-to-speech over HTTP.
//!
//! Inverse of the transcription endpoint: JSON `{"text": ...}` in, raw
//! audio bytes out.

use std::time::Duration;

use async_trait::async_trait;
use secrecy::{ExposeSecret, Secret};

use switchboard_core::{Error, Result, SpeechSynthesizer};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// HTTP synthesis client.
pub struct HttpSynthesizer {
    client: reqwest::Client,
    base_url: String,
    api_key: Secret<String>,
}

impl HttpSynthesizer {
    pub fn new(base_url: impl Into<String>, api_key: Secret<String>) -> Self {
        let client = reqwest::Client::builder()
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());
        Self {
            client,
            base_url: base_url.into(),
            api_key,
        }
    }
}

#[async_trait]
impl SpeechSynthesizer for HttpSynthesizer {
    async fn synthesize(&self, text: &str) -> Result<Vec<u8>> {
        let url = format!("{}/v1/speech/synthesize", self.base_url);

        let response = self
            .client
            .post(&url)
            .bearer_auth(self.api_key.expose_secret())
            .json(&serde_json::json!({ "text": text }))
            .timeout(REQUEST_TIMEOUT)
            .send()
            .await
            .map_err(|e| Error::synthesis(format!("request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::synthesis(format!(
                "speech API error: {} - {}",
                status, body
            )));
        }

        let audio = response
            .bytes()
            .await
            .map_err(|e| Error::synthesis(format!("invalid response body: {}", e)))?;

        tracing::debug!(bytes = audio.len(), "synthesis complete");
        Ok(audio.to_vec())
    }
}
