//! Speech-to-text over HTTP.
//!
//! Speaks the hosted speech API's wire format: raw WAV bytes in,
//! `{"text": ...}` out.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use secrecy::{ExposeSecret, Secret};

use switchboard_core::{Error, Result, Transcriber};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(serde::Deserialize)]
struct TranscriptBody {
    #[serde(default)]
    text: String,
}

/// HTTP transcription client.
pub struct HttpTranscriber {
    client: reqwest::Client,
    base_url: String,
    api_key: Secret<String>,
}

impl HttpTranscriber {
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
impl Transcriber for HttpTranscriber {
    async fn transcribe(&self, audio: &[u8]) -> Result<String> {
        let url = format!("{}/v1/speech/transcribe", self.base_url);

        let response = self
            .client
            .post(&url)
            .bearer_auth(self.api_key.expose_secret())
            .header(CONTENT_TYPE, "audio/wav")
            .body(audio.to_vec())
            .timeout(REQUEST_TIMEOUT)
            .send()
            .await
            .map_err(|e| Error::transcription(format!("request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::transcription(format!(
                "speech API error: {} - {}",
                status, body
            )));
        }

        let body: TranscriptBody = response
            .json()
            .await
            .map_err(|e| Error::transcription(format!("invalid response body: {}", e)))?;

        tracing::debug!(
            preview = %body.text.chars().take(100).collect::<String>(),
            "transcription complete"
        );
        Ok(body.text)
    }
}
