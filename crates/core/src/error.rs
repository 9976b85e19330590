//! Error types for Switchboard.

use thiserror::Error;

/// Result type alias using Switchboard's Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for Switchboard.
#[derive(Error, Debug)]
pub enum Error {
    // =========================================================================
    // Gateway Errors
    // =========================================================================
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    // =========================================================================
    // Provider Errors
    // =========================================================================
    #[error("Provider error: {0}")]
    Provider(String),

    #[error("Circuit breaker open for {0}")]
    BreakerOpen(String),

    #[error("Timeout: {0}")]
    Timeout(String),

    #[error("Transcription failed: {0}")]
    Transcription(String),

    #[error("Speech synthesis failed: {0}")]
    Synthesis(String),

    // =========================================================================
    // Classification & Routing Errors
    // =========================================================================
    #[error("Intent parse error: {0}")]
    Parse(String),

    #[error("Handler not found: {0}")]
    HandlerNotFound(String),

    #[error("Handler execution failed: {0}")]
    HandlerExecution(String),

    // =========================================================================
    // Store Errors
    // =========================================================================
    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Cache error: {0}")]
    Cache(String),

    // =========================================================================
    // Generic Errors
    // =========================================================================
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl Error {
    /// Create an invalid request error.
    pub fn invalid_request(msg: impl Into<String>) -> Self {
        Self::InvalidRequest(msg.into())
    }

    /// Create a provider error.
    pub fn provider(msg: impl Into<String>) -> Self {
        Self::Provider(msg.into())
    }

    /// Create a transcription error.
    pub fn transcription(msg: impl Into<String>) -> Self {
        Self::Transcription(msg.into())
    }

    /// Create a speech synthesis error.
    pub fn synthesis(msg: impl Into<String>) -> Self {
        Self::Synthesis(msg.into())
    }

    /// Create an intent parse error.
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse(msg.into())
    }

    /// Create a handler execution error.
    pub fn handler_execution(msg: impl Into<String>) -> Self {
        Self::HandlerExecution(msg.into())
    }

    /// Create a storage error.
    pub fn storage(msg: impl Into<String>) -> Self {
        Self::Storage(msg.into())
    }

    /// Create a cache error.
    pub fn cache(msg: impl Into<String>) -> Self {
        Self::Cache(msg.into())
    }

    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create an internal error.
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// True when the error is a fast-fail rejection from an open breaker.
    pub fn is_breaker_open(&self) -> bool {
        matches!(self, Self::BreakerOpen(_))
    }
}
