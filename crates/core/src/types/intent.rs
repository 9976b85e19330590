use serde::{Deserialize, Serialize};
use serde_json::Value;

// =============================================================================
// Intent Classification Types
// =============================================================================

/// Intent name returned when classification fails outright.
pub const FALLBACK_INTENT: &str = "fallback";

/// Intent classification result.
///
/// Produced for every turn: even a failed classification yields a
/// [`FALLBACK_INTENT`] result rather than an error.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IntentResult {
    /// Classified intent name.
    pub intent: String,
    /// Classifier confidence in [0, 1].
    #[serde(default)]
    pub confidence: f64,
    /// Extracted entities, keyed by entity name.
    #[serde(default = "empty_object")]
    pub entities: Value,
    /// Free-form context carried alongside the classification.
    #[serde(default)]
    pub context: String,
}

fn empty_object() -> Value {
    Value::Object(serde_json::Map::new())
}

impl IntentResult {
    /// Create a result with the given intent and confidence.
    pub fn new(intent: impl Into<String>, confidence: f64) -> Self {
        Self {
            intent: intent.into(),
            confidence,
            entities: empty_object(),
            context: String::new(),
        }
        .clamped()
    }

    /// Zero-confidence fallback result recording why classification failed.
    pub fn fallback(context: impl Into<String>) -> Self {
        Self {
            intent: FALLBACK_INTENT.to_string(),
            confidence: 0.0,
            entities: empty_object(),
            context: context.into(),
        }
    }

    /// Clamp confidence into [0, 1] and guarantee a non-empty intent.
    pub fn clamped(mut self) -> Self {
        if !self.confidence.is_finite() {
            self.confidence = 0.0;
        }
        self.confidence = self.confidence.clamp(0.0, 1.0);
        if self.intent.trim().is_empty() {
            self.intent = FALLBACK_INTENT.to_string();
        }
        if !self.entities.is_object() {
            self.entities = empty_object();
        }
        self
    }
}
