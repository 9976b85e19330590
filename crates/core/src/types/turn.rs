use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{HandlerReply, InputKind, IntentResult};

// =============================================================================
// Turn Types
// =============================================================================

/// Input payload for one conversational turn.
///
/// Untagged: a body with `audio_data` is an audio turn, a body with
/// `text` is a text turn.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TurnInput {
    /// Base64-encoded audio, optionally prefixed with a `data:audio/...` URL.
    Audio { audio_data: String },
    /// Plain text.
    Text { text: String },
}

impl TurnInput {
    /// Channel the input arrived on.
    pub fn kind(&self) -> InputKind {
        match self {
            Self::Audio { .. } => InputKind::Audio,
            Self::Text { .. } => InputKind::Text,
        }
    }
}

/// A full turn request as accepted by the orchestrator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TurnRequest {
    /// Audio or text input.
    #[serde(flatten)]
    pub input: TurnInput,
    /// Requesting user, when known.
    #[serde(default)]
    pub user_id: Option<String>,
    /// Conversation session, when known.
    #[serde(default)]
    pub session_id: Option<String>,
    /// Conversation context forwarded to the classifier.
    #[serde(default)]
    pub context: Option<Value>,
}

impl TurnRequest {
    /// Text-only turn.
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            input: TurnInput::Text { text: text.into() },
            user_id: None,
            session_id: None,
            context: None,
        }
    }

    /// Audio turn from a base64 payload.
    pub fn audio(audio_data: impl Into<String>) -> Self {
        Self {
            input: TurnInput::Audio {
                audio_data: audio_data.into(),
            },
            user_id: None,
            session_id: None,
            context: None,
        }
    }

    /// Attach a user id.
    pub fn with_user(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = Some(user_id.into());
        self
    }

    /// Attach a session id.
    pub fn with_session(mut self, session_id: impl Into<String>) -> Self {
        self.session_id = Some(session_id.into());
        self
    }

    /// Attach classifier context.
    pub fn with_context(mut self, context: Value) -> Self {
        self.context = Some(context);
        self
    }
}

/// Result of a fully processed turn.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TurnOutcome {
    /// Id of the stored interaction record.
    pub interaction_id: String,
    /// Input channel the turn arrived on.
    pub kind: InputKind,
    /// Text the pipeline operated on (transcript for audio turns).
    pub transcript: String,
    /// Classification result.
    pub intent: IntentResult,
    /// Handler reply.
    pub reply: HandlerReply,
    /// Sector the turn was routed under.
    pub sector: String,
}
