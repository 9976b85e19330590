use serde::{Deserialize, Serialize};
use serde_json::Value;

// =============================================================================
// Handler Reply Types
// =============================================================================

/// Normalized output of a handler invocation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HandlerReply {
    /// User-facing reply text.
    pub response: String,
    /// Whether the handler considers the turn handled.
    pub success: bool,
    /// Error detail when `success` is false.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Optional structured payload (booking details, lookups, ...).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl HandlerReply {
    /// Successful reply with text only.
    pub fn ok(response: impl Into<String>) -> Self {
        Self {
            response: response.into(),
            success: true,
            error: None,
            data: None,
        }
    }

    /// Successful reply carrying a structured payload.
    pub fn ok_with(response: impl Into<String>, data: Value) -> Self {
        Self {
            response: response.into(),
            success: true,
            error: None,
            data: Some(data),
        }
    }

    /// Failed reply that still gives the user something to read.
    pub fn failure(response: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            response: response.into(),
            success: false,
            error: Some(error.into()),
            data: None,
        }
    }
}
