//! Mock implementations of core traits for testing.
//!
//! This module provides scripted implementations of the provider, handler,
//! and store traits that can be used across the codebase for unit and
//! integration testing, and as offline stand-ins when no real provider is
//! configured.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Mutex;

use crate::{
    traits::{
        Handler, HandlerContext, InteractionIndex, KeyValueCache, LlmClient, SpeechSynthesizer,
        Transcriber,
    },
    types::{HandlerReply, Interaction, ScoredInteraction},
    Error, Result,
};

// =============================================================================
// Mock LLM Client
// =============================================================================

/// Scripted mock LLM that returns predefined responses.
pub struct MockLlm {
    responses: Mutex<Vec<String>>,
    call_count: Mutex<usize>,
    embed_count: Mutex<usize>,
    fail_first: usize,
    always_fail: bool,
}

impl MockLlm {
    /// Create a new mock LLM with a queue of responses, cycled in order.
    pub fn new(responses: Vec<String>) -> Self {
        Self {
            responses: Mutex::new(responses),
            call_count: Mutex::new(0),
            embed_count: Mutex::new(0),
            fail_first: 0,
            always_fail: false,
        }
    }

    /// Create a mock that always returns the same response.
    pub fn constant(response: &str) -> Self {
        Self::new(vec![response.to_string()])
    }

    /// Create a mock whose completions always fail.
    pub fn failing() -> Self {
        Self {
            responses: Mutex::new(Vec::new()),
            call_count: Mutex::new(0),
            embed_count: Mutex::new(0),
            fail_first: 0,
            always_fail: true,
        }
    }

    /// Create a mock that fails the first `n` completions, then succeeds.
    pub fn failing_first(n: usize, response: &str) -> Self {
        Self {
            responses: Mutex::new(vec![response.to_string()]),
            call_count: Mutex::new(0),
            embed_count: Mutex::new(0),
            fail_first: n,
            always_fail: false,
        }
    }

    /// Number of completion calls made to this mock.
    pub fn call_count(&self) -> usize {
        *self.call_count.lock().unwrap()
    }

    /// Number of embedding calls made to this mock.
    pub fn embed_count(&self) -> usize {
        *self.embed_count.lock().unwrap()
    }
}

#[async_trait]
impl LlmClient for MockLlm {
    async fn complete(&self, _system: &str, _prompt: &str) -> Result<String> {
        let mut count = self.call_count.lock().unwrap();
        *count += 1;

        if self.always_fail || *count <= self.fail_first {
            return Err(Error::provider("mock completion failure"));
        }

        let responses = self.responses.lock().unwrap();
        let idx = (*count - 1) % responses.len().max(1);
        Ok(responses.get(idx).cloned().unwrap_or_default())
    }

    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        *self.embed_count.lock().unwrap() += 1;
        if self.always_fail {
            return Err(Error::provider("mock embedding failure"));
        }
        // Deterministic, text-sensitive mock embedding
        let len = 128;
        let hash = text.bytes().fold(0u64, |acc, b| acc.wrapping_add(b as u64));
        let embedding: Vec<f32> = (0..len)
            .map(|i| ((hash.wrapping_add(i as u64)) % 1000) as f32 / 1000.0)
            .collect();
        Ok(embedding)
    }
}

// =============================================================================
// Mock Speech Providers
// =============================================================================

/// Mock transcriber that returns a fixed transcript.
pub struct MockTranscriber {
    transcript: String,
    should_fail: bool,
    call_count: Mutex<usize>,
}

impl MockTranscriber {
    /// Create a mock returning the given transcript for every call.
    pub fn new(transcript: &str) -> Self {
        Self {
            transcript: transcript.to_string(),
            should_fail: false,
            call_count: Mutex::new(0),
        }
    }

    /// Create a mock whose transcriptions always fail.
    pub fn failing() -> Self {
        Self {
            transcript: String::new(),
            should_fail: true,
            call_count: Mutex::new(0),
        }
    }

    /// Number of transcription calls made to this mock.
    pub fn call_count(&self) -> usize {
        *self.call_count.lock().unwrap()
    }
}

#[async_trait]
impl Transcriber for MockTranscriber {
    async fn transcribe(&self, _audio: &[u8]) -> Result<String> {
        *self.call_count.lock().unwrap() += 1;
        if self.should_fail {
            return Err(Error::transcription("mock transcription failure"));
        }
        Ok(self.transcript.clone())
    }
}

/// Mock synthesizer that returns fixed audio bytes.
pub struct MockSynthesizer {
    audio: Vec<u8>,
    should_fail: bool,
}

impl MockSynthesizer {
    /// Create a mock returning a short WAV-tagged byte sequence.
    pub fn new() -> Self {
        Self {
            audio: b"RIFF\x00\x00\x00\x00WAVE".to_vec(),
            should_fail: false,
        }
    }

    /// Create a mock whose synthesis always fails.
    pub fn failing() -> Self {
        Self {
            audio: Vec::new(),
            should_fail: true,
        }
    }
}

impl Default for MockSynthesizer {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SpeechSynthesizer for MockSynthesizer {
    async fn synthesize(&self, _text: &str) -> Result<Vec<u8>> {
        if self.should_fail {
            return Err(Error::synthesis("mock synthesis failure"));
        }
        Ok(self.audio.clone())
    }
}

// =============================================================================
// Mock Handlers
// =============================================================================

/// Mock handler that records the texts it was invoked with.
pub struct RecordingHandler {
    name: String,
    description: String,
    response: String,
    calls: Mutex<Vec<String>>,
}

impl RecordingHandler {
    pub fn new(name: &str, description: &str, response: &str) -> Self {
        Self {
            name: name.to_string(),
            description: description.to_string(),
            response: response.to_string(),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Texts passed to `execute`, in call order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl Handler for RecordingHandler {
    fn name(&self) -> &str {
        &self.name
    }

    fn describe(&self) -> String {
        self.description.clone()
    }

    async fn execute(&self, text: &str, _ctx: &HandlerContext) -> Result<HandlerReply> {
        self.calls.lock().unwrap().push(text.to_string());
        Ok(HandlerReply::ok(self.response.clone()))
    }
}

/// Mock handler whose execution always fails.
pub struct FailingHandler {
    name: String,
}

impl FailingHandler {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
        }
    }
}

#[async_trait]
impl Handler for FailingHandler {
    fn name(&self) -> &str {
        &self.name
    }

    fn describe(&self) -> String {
        "Always fails".to_string()
    }

    async fn execute(&self, _text: &str, _ctx: &HandlerContext) -> Result<HandlerReply> {
        Err(Error::handler_execution("mock handler failure"))
    }
}

// =============================================================================
// Mock Stores
// =============================================================================

/// Interaction index whose every operation fails, for degradation tests.
#[derive(Default)]
pub struct FailingIndex;

impl FailingIndex {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl InteractionIndex for FailingIndex {
    async fn upsert(&self, _interaction: &Interaction, _embedding: Option<Vec<f32>>) -> Result<()> {
        Err(Error::storage("mock store failure"))
    }

    async fn recent(&self, _user_id: &str, _limit: usize) -> Result<Vec<Interaction>> {
        Err(Error::storage("mock store failure"))
    }

    async fn search(
        &self,
        _embedding: Vec<f32>,
        _limit: usize,
        _user_id: Option<&str>,
    ) -> Result<Vec<ScoredInteraction>> {
        Err(Error::storage("mock store failure"))
    }

    async fn prune(&self, _older_than: DateTime<Utc>) -> Result<u64> {
        Err(Error::storage("mock store failure"))
    }
}

/// Key-value cache whose every operation fails, for degradation tests.
#[derive(Default)]
pub struct FailingCache;

impl FailingCache {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl KeyValueCache for FailingCache {
    async fn get(&self, _key: &str) -> Result<Option<String>> {
        Err(Error::cache("mock cache failure"))
    }

    async fn set_ex(&self, _key: &str, _value: &str, _ttl_secs: u64) -> Result<()> {
        Err(Error::cache("mock cache failure"))
    }

    async fn delete(&self, _key: &str) -> Result<()> {
        Err(Error::cache("mock cache failure"))
    }
}

// Exercised from the consuming crates' test suites.
