use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// =============================================================================
// Interaction History Types
// =============================================================================

/// How a turn entered the system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputKind {
    /// Transcribed audio input.
    Audio,
    /// Plain text input.
    Text,
}

impl InputKind {
    /// Stable string form used in storage payloads and metrics labels.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Audio => "audio",
            Self::Text => "text",
        }
    }
}

/// One stored conversational turn.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Interaction {
    /// Unique interaction id.
    pub id: String,
    /// Owning user, when known.
    pub user_id: Option<String>,
    /// Conversation session, when known.
    pub session_id: Option<String>,
    /// Input channel.
    pub kind: InputKind,
    /// User-facing content (transcript for audio turns).
    pub content: String,
    /// Classified intent, when the turn went through classification.
    pub intent: Option<String>,
    /// Reply text produced for the turn.
    pub response: Option<String>,
    /// Creation time.
    pub timestamp: DateTime<Utc>,
}

impl Interaction {
    /// Create a new interaction with a fresh id and the current time.
    pub fn new(kind: InputKind, content: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            user_id: None,
            session_id: None,
            kind,
            content: content.into(),
            intent: None,
            response: None,
            timestamp: Utc::now(),
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

    /// Attach the classified intent.
    pub fn with_intent(mut self, intent: impl Into<String>) -> Self {
        self.intent = Some(intent.into());
        self
    }

    /// Attach the reply text.
    pub fn with_response(mut self, response: impl Into<String>) -> Self {
        self.response = Some(response.into());
        self
    }
}

/// An interaction paired with a similarity score from vector search.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoredInteraction {
    /// The matched interaction.
    pub interaction: Interaction,
    /// Similarity score, higher is closer.
    pub score: f32,
}
