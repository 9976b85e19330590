//! Audio payload decoding.

use base64::Engine;

use switchboard_core::{Error, Result};

/// Decode a base64 audio payload, accepting an optional
/// `data:audio/...;base64,` URL prefix.
///
/// Decoding runs on the blocking pool so large payloads stay off the async
/// path.
pub async fn decode_audio_payload(audio_data: &str) -> Result<Vec<u8>> {
    let payload = audio_data.to_string();

    tokio::task::spawn_blocking(move || {
        let encoded = match payload.split_once(";base64,") {
            Some((prefix, rest)) if prefix.starts_with("data:") => rest,
            _ => payload.as_str(),
        };

        base64::engine::general_purpose::STANDARD
            .decode(encoded.trim())
            .map_err(|e| Error::invalid_request(format!("Invalid base64 audio payload: {}", e)))
    })
    .await
    .map_err(|e| Error::internal(format!("Audio decode task failed: {}", e)))?
}
