//! The per-turn pipeline.

use std::sync::Arc;

use serde_json::Value;

use switchboard_classifier::IntentClassifier;
use switchboard_core::{
    traits::{HandlerContext, LlmClient, SpeechSynthesizer, Transcriber},
    types::{
        HandlerReply, Interaction, IntentResult, ScoredInteraction, SectorProfile, TurnInput,
        TurnOutcome, TurnRequest,
    },
    Error, Result,
};
use switchboard_observe::metrics::track_turn;
use switchboard_routing::{Dispatcher, RouteSet};
use switchboard_store::InteractionLog;

use crate::audio::decode_audio_payload;

/// The turn pipeline. Built via [`crate::OrchestratorBuilder`].
pub struct Orchestrator {
    pub(crate) classifier: IntentClassifier,
    pub(crate) dispatcher: Dispatcher,
    pub(crate) log: InteractionLog,
    pub(crate) transcriber: Option<Arc<dyn Transcriber>>,
    pub(crate) synthesizer: Option<Arc<dyn SpeechSynthesizer>>,
    /// Kept so `reconfigure` can rebuild the handler set.
    pub(crate) handler_llm: Arc<dyn LlmClient>,
}

impl Orchestrator {
    /// Create a new builder.
    pub fn builder() -> crate::builder::OrchestratorBuilder {
        crate::builder::OrchestratorBuilder::new()
    }

    /// Run one conversational turn.
    ///
    /// Classification and dispatch degrade rather than fail, so the only
    /// error paths out of here are audio decode and transcription faults,
    /// which have no usable fallback.
    #[tracing::instrument(skip(self, request), fields(kind = request.input.kind().as_str()))]
    pub async fn run_turn(&self, request: TurnRequest) -> Result<TurnOutcome> {
        let kind = request.input.kind();
        let text = self.resolve_text(&request.input).await?;

        let intent = self.classifier.classify(&text, request.context.as_ref()).await;

        let sector = self.dispatcher.sector().await;
        let ctx = HandlerContext {
            sector: sector.clone(),
            user_id: request.user_id.clone(),
            session_id: request.session_id.clone(),
            intent: Some(intent.clone()),
        };
        let reply = self.dispatcher.dispatch(&intent.intent, &text, &ctx).await;

        let interaction_id = self
            .log
            .store_interaction(
                request.user_id.as_deref(),
                request.session_id.as_deref(),
                kind,
                &text,
                Some(&intent.intent),
                Some(&reply.response),
            )
            .await;

        let outcome = if reply.success { "success" } else { "degraded" };
        track_turn(&sector, kind.as_str(), outcome);

        tracing::info!(
            interaction_id = %interaction_id,
            intent = %intent.intent,
            confidence = intent.confidence,
            success = reply.success,
            "Turn complete"
        );

        Ok(TurnOutcome {
            interaction_id,
            kind,
            transcript: text,
            intent,
            reply,
            sector,
        })
    }

    async fn resolve_text(&self, input: &TurnInput) -> Result<String> {
        match input {
            TurnInput::Text { text } => Ok(text.clone()),
            TurnInput::Audio { audio_data } => {
                let transcriber = self
                    .transcriber
                    .as_ref()
                    .ok_or_else(|| Error::transcription("No transcriber configured"))?;

                let audio = decode_audio_payload(audio_data).await?;
                let transcript = transcriber.transcribe(&audio).await?;

                tracing::info!(
                    bytes = audio.len(),
                    transcript_len = transcript.len(),
                    "Transcribed audio turn"
                );
                Ok(transcript)
            }
        }
    }

    /// Classify text without dispatching.
    pub async fn classify(&self, text: &str, context: Option<&Value>) -> IntentResult {
        self.classifier.classify(text, context).await
    }

    /// Suggest likely intents for ambiguous text.
    pub async fn suggest(&self, text: &str) -> Vec<String> {
        self.classifier.suggest(text).await
    }

    /// Describe a vocabulary intent.
    pub async fn describe_intent(&self, intent: &str) -> String {
        self.classifier.describe_intent(intent).await
    }

    /// Dispatch an already-classified intent to its handler.
    pub async fn dispatch(
        &self,
        intent: &str,
        text: &str,
        user_id: Option<&str>,
        session_id: Option<&str>,
    ) -> HandlerReply {
        let ctx = HandlerContext {
            sector: self.dispatcher.sector().await,
            user_id: user_id.map(str::to_string),
            session_id: session_id.map(str::to_string),
            intent: None,
        };
        self.dispatcher.dispatch(intent, text, &ctx).await
    }

    /// Synthesize a spoken version of a reply.
    ///
    /// Errors when no synthesizer is configured or synthesis fails; callers
    /// decide whether to degrade to text-only.
    pub async fn speak(&self, text: &str) -> Result<Vec<u8>> {
        match &self.synthesizer {
            Some(synthesizer) => synthesizer.synthesize(text).await,
            None => Err(Error::synthesis("No speech synthesizer configured")),
        }
    }

    /// Whether an audio transcriber is wired in.
    pub fn has_transcriber(&self) -> bool {
        self.transcriber.is_some()
    }

    /// Whether a speech synthesizer is wired in.
    pub fn has_synthesizer(&self) -> bool {
        self.synthesizer.is_some()
    }

    /// Atomically swap the routing table and handler set for a new sector.
    pub async fn reconfigure(&self, profile: SectorProfile) {
        let routes = RouteSet::from_sector(&profile, self.handler_llm.clone());
        self.dispatcher.swap(routes).await;
    }

    /// Sector the pipeline currently routes under.
    pub async fn sector(&self) -> String {
        self.dispatcher.sector().await
    }

    /// Registered handler names, sorted.
    pub async fn list_handlers(&self) -> Vec<String> {
        self.dispatcher.list_handlers().await
    }

    /// Describe a registered handler.
    pub async fn describe_handler(&self, name: &str) -> String {
        self.dispatcher.describe_handler(name).await
    }

    /// Newest stored interactions for a user.
    pub async fn recent_memory(&self, user_id: &str, limit: usize) -> Vec<Interaction> {
        self.log.recent(user_id, limit).await
    }

    /// Similarity search over stored interactions.
    pub async fn search_memory(
        &self,
        query: &str,
        user_id: Option<&str>,
        limit: usize,
    ) -> Vec<ScoredInteraction> {
        self.log.search_similar(query, user_id, limit).await
    }

    /// Prune interactions past the retention window. Returns the removed count.
    pub async fn prune_memory(&self) -> Result<u64> {
        self.log.prune().await
    }
}
