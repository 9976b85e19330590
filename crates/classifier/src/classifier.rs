//! LLM-backed intent classification with graceful degradation.

use std::sync::Arc;

use serde_json::Value;

use switchboard_core::{IntentResult, LlmClient};
use switchboard_resilience::ResultCache;

use crate::extract::{extract_json_array, extract_json_object};
use crate::vocabulary::IntentVocabulary;

const FORMAT_INSTRUCTIONS: &str = "Respond with only a JSON object shaped as \
{\"intent\": \"<intent>\", \"confidence\": <0.0-1.0>, \"entities\": {}, \
\"context\": \"<short explanation>\"}.";

const SUGGESTION_SYSTEM_PROMPT: &str = "You are a helpful assistant that suggests intents.";

/// Tuning knobs for classification behavior.
#[derive(Debug, Clone)]
pub struct ClassifierConfig {
    /// Intent substituted when the model answers off-vocabulary.
    pub default_intent: String,
    /// Confidence assigned to off-vocabulary substitutions.
    pub degraded_confidence: f64,
    /// How many intents a suggestion request returns.
    pub suggestion_count: usize,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            default_intent: "general_inquiry".to_string(),
            degraded_confidence: 0.55,
            suggestion_count: 3,
        }
    }
}

/// Classifies free text into the closed intent vocabulary.
///
/// Wrap the LLM client in the resilience envelope before handing it over;
/// the classifier itself only decides how failures degrade.
pub struct IntentClassifier {
    llm: Arc<dyn LlmClient>,
    vocabulary: IntentVocabulary,
    config: ClassifierConfig,
    description_cache: Option<ResultCache>,
}

impl IntentClassifier {
    pub fn new(llm: Arc<dyn LlmClient>) -> Self {
        Self {
            llm,
            vocabulary: IntentVocabulary::builtin(),
            config: ClassifierConfig::default(),
            description_cache: None,
        }
    }

    pub fn with_vocabulary(mut self, vocabulary: IntentVocabulary) -> Self {
        self.vocabulary = vocabulary;
        self
    }

    pub fn with_config(mut self, config: ClassifierConfig) -> Self {
        self.config = config;
        self
    }

    /// Serve intent descriptions through a result cache (1h TTL in the
    /// default wiring).
    pub fn with_description_cache(mut self, cache: ResultCache) -> Self {
        self.description_cache = Some(cache);
        self
    }

    fn system_prompt(&self) -> String {
        format!(
            "You are an intent classifier for hotel and hospital services plus general intents.\n\
             Return a valid JSON matching the given schema with fields intent, confidence, entities, context.\n\
             Allowed intents include: {}.",
            self.vocabulary.prompt_list()
        )
    }

    /// Determine user intent for one piece of text.
    ///
    /// Never errors. Upstream failures and unparseable responses come back
    /// as the reserved fallback intent at zero confidence; an intent
    /// outside the vocabulary degrades to the configured default intent
    /// at mid confidence.
    pub async fn classify(&self, text: &str, context: Option<&Value>) -> IntentResult {
        tracing::info!(
            preview = %text.chars().take(100).collect::<String>(),
            "determining intent"
        );

        let context_json = context
            .map(Value::to_string)
            .unwrap_or_else(|| "{}".to_string());
        let prompt = format!(
            "Text: {}\nOptional context: {}\n{}",
            text, context_json, FORMAT_INSTRUCTIONS
        );

        let response = match self.llm.complete(&self.system_prompt(), &prompt).await {
            Ok(response) => response,
            Err(e) => {
                tracing::error!(error = %e, "intent classification call failed");
                return IntentResult::fallback(format!("Error: {}", e));
            }
        };

        let parsed = match extract_json_object(&response) {
            Some(value) => value,
            None => {
                tracing::error!(
                    preview = %response.chars().take(100).collect::<String>(),
                    "no JSON object in classifier response"
                );
                return IntentResult::fallback("Error: response contained no JSON object");
            }
        };

        let mut result = match serde_json::from_value::<IntentResult>(parsed) {
            Ok(result) => result.clamped(),
            Err(e) => {
                tracing::error!(error = %e, "classifier response did not match the intent schema");
                return IntentResult::fallback(format!("Error: {}", e));
            }
        };

        if !self.vocabulary.contains(&result.intent) {
            tracing::warn!(
                intent = %result.intent,
                default = %self.config.default_intent,
                "off-vocabulary intent, substituting default"
            );
            result.context = format!("Degraded from unrecognized intent '{}'", result.intent);
            result.intent = self.config.default_intent.clone();
            result.confidence = self.config.degraded_confidence;
        }

        tracing::info!(
            intent = %result.intent,
            confidence = result.confidence,
            "intent determined"
        );
        result
    }

    /// Suggest the most likely intents for ambiguous input.
    ///
    /// Returns `["unknown"]` when the model is unreachable or answers with
    /// something other than a JSON array.
    pub async fn suggest(&self, text: &str) -> Vec<String> {
        let prompt = format!(
            "Given the user input: \"{}\"\n\n\
             Suggest the top {} most likely intents from the list:\n{}\n\n\
             Respond with a JSON array of intent names.",
            text,
            self.config.suggestion_count,
            self.grouped_json()
        );

        let response = match self.llm.complete(SUGGESTION_SYSTEM_PROMPT, &prompt).await {
            Ok(response) => response,
            Err(e) => {
                tracing::error!(error = %e, "intent suggestion call failed");
                return vec!["unknown".to_string()];
            }
        };

        let suggestions = extract_json_array(&response)
            .and_then(|value| serde_json::from_value::<Vec<String>>(value).ok());

        match suggestions {
            Some(mut intents) => {
                intents.truncate(self.config.suggestion_count);
                tracing::info!(suggestions = ?intents, "intent suggestions");
                intents
            }
            None => {
                tracing::error!("intent suggestion response was not a JSON array");
                vec!["unknown".to_string()]
            }
        }
    }

    /// Whether an intent is part of the configured vocabulary.
    pub fn validate(&self, intent: &str) -> bool {
        let is_valid = self.vocabulary.contains(intent);
        tracing::debug!(intent = %intent, is_valid, "intent validation");
        is_valid
    }

    /// Human-readable description of an intent, cached when a description
    /// cache is configured.
    pub async fn describe_intent(&self, intent: &str) -> String {
        match &self.description_cache {
            Some(cache) => cache
                .get_or_compute("describe_intent", intent, || async {
                    Ok(IntentVocabulary::describe(intent).to_string())
                })
                .await
                .unwrap_or_else(|_| IntentVocabulary::describe(intent).to_string()),
            None => IntentVocabulary::describe(intent).to_string(),
        }
    }

    fn grouped_json(&self) -> String {
        let mut map = serde_json::Map::new();
        for (domain, intents) in self.vocabulary.groups() {
            map.insert(domain.clone(), serde_json::json!(intents));
        }
        serde_json::to_string_pretty(&Value::Object(map)).unwrap_or_default()
    }
}
