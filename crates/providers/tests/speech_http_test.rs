//! Wire-level tests for the HTTP speech clients against a mock server.

use secrecy::Secret;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use switchboard_core::{Error, SpeechSynthesizer, Transcriber};
use switchboard_providers::{HttpSynthesizer, HttpTranscriber};

#[tokio::test]
async fn transcriber_posts_wav_and_reads_text() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/speech/transcribe"))
        .and(header("content-type", "audio/wav"))
        .and(header("authorization", "Bearer test-key"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({ "text": "book a room for tomorrow" })),
        )
        .mount(&server)
        .await;

    let transcriber = HttpTranscriber::new(server.uri(), Secret::new("test-key".to_string()));
    let transcript = transcriber.transcribe(b"RIFF fake wav bytes").await.unwrap();

    assert_eq!(transcript, "book a room for tomorrow");
}

#[tokio::test]
async fn transcriber_surfaces_upstream_errors() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/speech/transcribe"))
        .respond_with(ResponseTemplate::new(500).set_body_string("upstream broken"))
        .mount(&server)
        .await;

    let transcriber = HttpTranscriber::new(server.uri(), Secret::new("test-key".to_string()));
    let err = transcriber.transcribe(b"bytes").await.unwrap_err();

    match err {
        Error::Transcription(msg) => {
            assert!(msg.contains("500"));
            assert!(msg.contains("upstream broken"));
        }
        other => panic!("expected transcription error, got {:?}", other),
    }
}

#[tokio::test]
async fn synthesizer_posts_text_and_returns_audio() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/speech/synthesize"))
        .and(body_json(serde_json::json!({ "text": "your room is booked" })))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"RIFF audio".to_vec()))
        .mount(&server)
        .await;

    let synthesizer = HttpSynthesizer::new(server.uri(), Secret::new("test-key".to_string()));
    let audio = synthesizer.synthesize("your room is booked").await.unwrap();

    assert_eq!(audio, b"RIFF audio");
}

#[tokio::test]
async fn synthesizer_surfaces_upstream_errors() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/speech/synthesize"))
        .respond_with(ResponseTemplate::new(502).set_body_string("bad gateway"))
        .mount(&server)
        .await;

    let synthesizer = HttpSynthesizer::new(server.uri(), Secret::new("test-key".to_string()));
    let err = synthesizer.synthesize("anything").await.unwrap_err();

    assert!(matches!(err, Error::Synthesis(_)));
}
