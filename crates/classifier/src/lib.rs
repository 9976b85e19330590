//! Intent classification over an LLM client.
//!
//! Free text in, a structured IntentResult out, with tolerant parsing of
//! whatever shape the model returns and graceful degradation when the
//! upstream is down. Classification never errors: the worst outcome is
//! the reserved fallback intent at zero confidence.

pub mod classifier;
pub mod extract;
pub mod vocabulary;

pub use classifier::{ClassifierConfig, IntentClassifier};
pub use extract::{extract_json_array, extract_json_object};
pub use vocabulary::IntentVocabulary;
