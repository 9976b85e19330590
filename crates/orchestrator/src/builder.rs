//! Builder for the turn pipeline.

use std::sync::Arc;

use switchboard_classifier::{ClassifierConfig, IntentClassifier, IntentVocabulary};
use switchboard_core::{
    traits::{InteractionIndex, LlmClient, SpeechSynthesizer, Transcriber},
    types::SectorProfile,
    Error, Result,
};
use switchboard_resilience::ResultCache;
use switchboard_routing::{Dispatcher, RouteSet};
use switchboard_store::{InMemoryIndex, InteractionLog, RetentionPolicy};

use crate::pipeline::Orchestrator;

/// Builder for constructing an [`Orchestrator`].
///
/// The LLM client is the only mandatory dependency; everything else has a
/// working default (generic sector, built-in vocabulary, in-memory index,
/// no speech providers).
pub struct OrchestratorBuilder {
    llm: Option<Arc<dyn LlmClient>>,
    handler_llm: Option<Arc<dyn LlmClient>>,
    embedder: Option<Arc<dyn LlmClient>>,
    transcriber: Option<Arc<dyn Transcriber>>,
    synthesizer: Option<Arc<dyn SpeechSynthesizer>>,
    index: Option<Arc<dyn InteractionIndex>>,
    profile: SectorProfile,
    vocabulary: Option<IntentVocabulary>,
    classifier_config: Option<ClassifierConfig>,
    description_cache: Option<ResultCache>,
    retention: Option<RetentionPolicy>,
}

impl OrchestratorBuilder {
    /// Create a new builder with default configuration.
    pub fn new() -> Self {
        Self {
            llm: None,
            handler_llm: None,
            embedder: None,
            transcriber: None,
            synthesizer: None,
            index: None,
            profile: SectorProfile::default(),
            vocabulary: None,
            classifier_config: None,
            description_cache: None,
            retention: None,
        }
    }

    /// Set the LLM client used for classification and embeddings.
    pub fn with_llm(mut self, llm: Arc<dyn LlmClient>) -> Self {
        self.llm = Some(llm);
        self
    }

    /// Set a separate LLM client for handler execution.
    ///
    /// Defaults to the classification client. Wiring a separately wrapped
    /// client here gives handlers their own breaker tier.
    pub fn with_handler_llm(mut self, llm: Arc<dyn LlmClient>) -> Self {
        self.handler_llm = Some(llm);
        self
    }

    /// Set the client used to embed interactions for similarity search.
    /// Defaults to the classification client.
    pub fn with_embedder(mut self, embedder: Arc<dyn LlmClient>) -> Self {
        self.embedder = Some(embedder);
        self
    }

    /// Set the transcription provider. Without one, audio turns are rejected.
    pub fn with_transcriber(mut self, transcriber: Arc<dyn Transcriber>) -> Self {
        self.transcriber = Some(transcriber);
        self
    }

    /// Set the speech synthesis provider.
    pub fn with_synthesizer(mut self, synthesizer: Arc<dyn SpeechSynthesizer>) -> Self {
        self.synthesizer = Some(synthesizer);
        self
    }

    /// Set the interaction index backend.
    pub fn with_index(mut self, index: Arc<dyn InteractionIndex>) -> Self {
        self.index = Some(index);
        self
    }

    /// Set the sector profile routing is built from.
    pub fn with_profile(mut self, profile: SectorProfile) -> Self {
        self.profile = profile;
        self
    }

    /// Override the intent vocabulary.
    pub fn with_vocabulary(mut self, vocabulary: IntentVocabulary) -> Self {
        self.vocabulary = Some(vocabulary);
        self
    }

    /// Override classifier thresholds.
    pub fn with_classifier_config(mut self, config: ClassifierConfig) -> Self {
        self.classifier_config = Some(config);
        self
    }

    /// Cache intent descriptions through a shared result cache.
    pub fn with_description_cache(mut self, cache: ResultCache) -> Self {
        self.description_cache = Some(cache);
        self
    }

    /// Override the interaction retention window.
    pub fn with_retention(mut self, retention: RetentionPolicy) -> Self {
        self.retention = Some(retention);
        self
    }

    /// Build the orchestrator.
    pub fn build(self) -> Result<Orchestrator> {
        let llm = self
            .llm
            .ok_or_else(|| Error::config("LLM client not configured"))?;
        let handler_llm = self.handler_llm.unwrap_or_else(|| llm.clone());
        let embedder = self.embedder.unwrap_or_else(|| llm.clone());

        let mut classifier = IntentClassifier::new(llm);
        if let Some(vocabulary) = self.vocabulary {
            classifier = classifier.with_vocabulary(vocabulary);
        }
        if let Some(config) = self.classifier_config {
            classifier = classifier.with_config(config);
        }
        if let Some(cache) = self.description_cache {
            classifier = classifier.with_description_cache(cache);
        }

        let index = self
            .index
            .unwrap_or_else(|| Arc::new(InMemoryIndex::new()));
        let mut log = InteractionLog::new(index).with_embedder(embedder);
        if let Some(retention) = self.retention {
            log = log.with_retention(retention);
        }

        let dispatcher = Dispatcher::new(RouteSet::from_sector(&self.profile, handler_llm.clone()));

        Ok(Orchestrator {
            classifier,
            dispatcher,
            log,
            transcriber: self.transcriber,
            synthesizer: self.synthesizer,
            handler_llm,
        })
    }
}

impl Default for OrchestratorBuilder {
    fn default() -> Self {
        Self::new()
    }
}
