//! Axum-based HTTP server over the turn pipeline.

use std::sync::Arc;

use axum::{
    extract::{Json, Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use base64::Engine;
use metrics_exporter_prometheus::PrometheusHandle;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use switchboard_core::types::{
    Interaction, IntentResult, ScoredInteraction, SectorProfile, TurnInput, TurnRequest,
};
use switchboard_core::{Error, Result};
use switchboard_orchestrator::Orchestrator;

/// Rows returned by memory endpoints when the caller gives no limit.
const DEFAULT_MEMORY_LIMIT: usize = 10;

/// Gateway configuration.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Host to bind to.
    pub host: String,
    /// Port to bind to.
    pub port: u16,
    /// Enable CORS.
    pub enable_cors: bool,
    /// Enable request tracing.
    pub enable_tracing: bool,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            enable_cors: true,
            enable_tracing: true,
        }
    }
}

/// Shared application state.
pub struct AppState {
    /// The turn pipeline and everything wired behind it.
    pub orchestrator: Arc<Orchestrator>,
}

/// Gateway server.
pub struct GatewayServer {
    config: GatewayConfig,
    state: Arc<AppState>,
    metrics_handle: Option<PrometheusHandle>,
}

impl GatewayServer {
    /// Create a new gateway server over an orchestrator.
    pub fn new(config: GatewayConfig, orchestrator: Arc<Orchestrator>) -> Self {
        Self {
            config,
            state: Arc::new(AppState { orchestrator }),
            metrics_handle: None,
        }
    }

    /// Serve Prometheus metrics at `/metrics`.
    pub fn with_metrics(mut self, handle: PrometheusHandle) -> Self {
        self.metrics_handle = Some(handle);
        self
    }

    /// Build the Axum router.
    pub fn build_router(&self) -> Router {
        let mut router = Router::new()
            .route("/health", get(health_handler))
            .route("/v1/turn", post(turn_handler))
            .route("/v1/intent", post(intent_handler))
            .route("/v1/dispatch", post(dispatch_handler))
            .route("/v1/handlers", get(handlers_handler))
            .route("/v1/handlers/:name", get(handler_detail_handler))
            .route("/v1/sector", get(sector_handler).post(reconfigure_handler))
            .route("/v1/memory/search", post(memory_search_handler))
            .route("/v1/memory/prune", post(memory_prune_handler))
            .route("/v1/memory/:user_id", get(memory_handler))
            .route("/v1/speak", post(speak_handler))
            .with_state(self.state.clone());

        if let Some(handle) = &self.metrics_handle {
            let handle = handle.clone();
            router = router.route("/metrics", get(move || async move { handle.render() }));
        }

        if self.config.enable_cors {
            router = router.layer(CorsLayer::new().allow_origin(Any).allow_methods(Any));
        }

        if self.config.enable_tracing {
            router = router.layer(TraceLayer::new_for_http());
        }

        router
    }

    /// Run the server.
    pub async fn run(self) -> Result<()> {
        let addr = format!("{}:{}", self.config.host, self.config.port);
        let listener = tokio::net::TcpListener::bind(&addr)
            .await
            .map_err(|e| Error::config(format!("Failed to bind {}: {}", addr, e)))?;

        tracing::info!(addr = %addr, "Gateway server starting");

        axum::serve(listener, self.build_router())
            .await
            .map_err(|e| Error::internal(format!("Server error: {}", e)))?;

        Ok(())
    }
}

// =============================================================================
// Request/Response Types
// =============================================================================

/// Health response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Status.
    pub status: String,
    /// Version.
    pub version: String,
    /// Sector the pipeline currently routes under.
    pub sector: String,
    /// Whether audio input is available.
    pub transcription: bool,
    /// Whether audio output is available.
    pub synthesis: bool,
}

/// Error response.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Stable machine-readable code.
    pub code: String,
    /// Human-readable message.
    pub message: String,
}

/// Intent classification request.
#[derive(Debug, Deserialize)]
pub struct IntentRequest {
    /// Text to classify.
    pub text: String,
    /// Optional conversation context forwarded to the classifier.
    #[serde(default)]
    pub context: Option<Value>,
}

/// Intent classification response.
#[derive(Debug, Serialize)]
pub struct IntentResponse {
    /// Classification result.
    #[serde(flatten)]
    pub result: IntentResult,
    /// Catalog description of the classified intent.
    pub description: String,
}

/// Direct dispatch request, bypassing classification.
#[derive(Debug, Deserialize)]
pub struct DispatchRequest {
    /// Intent to route.
    pub intent: String,
    /// Original request text.
    pub text: String,
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub session_id: Option<String>,
}

/// Handler list response.
#[derive(Debug, Serialize)]
pub struct HandlersResponse {
    /// Sector the handlers belong to.
    pub sector: String,
    /// Registered handler names, sorted.
    pub handlers: Vec<String>,
}

/// Single handler description.
#[derive(Debug, Serialize)]
pub struct HandlerDetail {
    /// Handler name.
    pub name: String,
    /// What the handler does.
    pub description: String,
}

/// Sector reconfiguration request: a catalog name or a full inline profile.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum SectorUpdate {
    /// One of the built-in profiles, by name.
    Named { name: String },
    /// A complete custom profile.
    Inline(SectorProfile),
}

/// Current sector summary.
#[derive(Debug, Serialize)]
pub struct SectorResponse {
    /// Active sector name.
    pub sector: String,
    /// Tools the sector exposes.
    pub tools: Vec<String>,
}

/// Query parameters for the recent-memory endpoint.
#[derive(Debug, Deserialize)]
pub struct MemoryQuery {
    #[serde(default)]
    pub limit: Option<usize>,
}

/// Recent interactions for one user.
#[derive(Debug, Serialize)]
pub struct MemoryResponse {
    /// User the rows belong to.
    pub user_id: String,
    /// Newest interactions first.
    pub interactions: Vec<Interaction>,
}

/// Similarity search request.
#[derive(Debug, Deserialize)]
pub struct SearchRequest {
    /// Free-text query.
    pub query: String,
    /// Restrict results to one user.
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub limit: Option<usize>,
}

/// Similarity search response.
#[derive(Debug, Serialize)]
pub struct SearchResponse {
    /// Ranked matches, best first.
    pub results: Vec<ScoredInteraction>,
}

/// Retention prune response.
#[derive(Debug, Serialize)]
pub struct PruneResponse {
    /// Interactions removed.
    pub removed: u64,
}

/// Speech synthesis request.
#[derive(Debug, Deserialize)]
pub struct SpeakRequest {
    /// Text to speak.
    pub text: String,
}

/// Speech synthesis response.
///
/// `audio` is absent when synthesis degraded to text-only.
#[derive(Debug, Serialize)]
pub struct SpeakResponse {
    /// The spoken text.
    pub text: String,
    /// Base64-encoded audio bytes.
    pub audio: Option<String>,
    /// False when the synthesizer was unavailable or failed.
    pub synthesized: bool,
}

// =============================================================================
// Handlers
// =============================================================================

/// Status code for a pipeline error surfaced over HTTP.
fn error_status(error: &Error) -> StatusCode {
    match error {
        Error::InvalidRequest(_) => StatusCode::BAD_REQUEST,
        Error::HandlerNotFound(_) => StatusCode::NOT_FOUND,
        Error::Transcription(_) => StatusCode::BAD_GATEWAY,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn error_code(error: &Error) -> &'static str {
    match error {
        Error::InvalidRequest(_) => "invalid_request",
        Error::HandlerNotFound(_) => "handler_not_found",
        Error::Transcription(_) => "transcription_failed",
        Error::Synthesis(_) => "synthesis_failed",
        Error::Storage(_) => "storage_error",
        _ => "internal_error",
    }
}

fn error_response(error: &Error) -> Response {
    (
        error_status(error),
        Json(ErrorResponse {
            code: error_code(error).to_string(),
            message: error.to_string(),
        }),
    )
        .into_response()
}

fn turn_input_is_empty(input: &TurnInput) -> bool {
    match input {
        TurnInput::Text { text } => text.trim().is_empty(),
        TurnInput::Audio { audio_data } => audio_data.trim().is_empty(),
    }
}

/// Health check: liveness plus a component readiness summary.
async fn health_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        sector: state.orchestrator.sector().await,
        transcription: state.orchestrator.has_transcriber(),
        synthesis: state.orchestrator.has_synthesizer(),
    })
}

/// Run one full turn. Degraded turns are 200s with flags in the body;
/// only transcription failures and invalid payloads produce error statuses.
async fn turn_handler(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<TurnRequest>,
) -> Response {
    if turn_input_is_empty(&payload.input) {
        return error_response(&Error::invalid_request("Empty turn input"));
    }

    match state.orchestrator.run_turn(payload).await {
        Ok(outcome) => (StatusCode::OK, Json(outcome)).into_response(),
        Err(e) => {
            tracing::warn!(error = %e, "Turn failed");
            error_response(&e)
        }
    }
}

/// Classify without dispatching. Classification never errors, so this is
/// always a 200 once the body validates.
async fn intent_handler(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<IntentRequest>,
) -> Response {
    if payload.text.trim().is_empty() {
        return error_response(&Error::invalid_request("Empty text"));
    }

    let result = state
        .orchestrator
        .classify(&payload.text, payload.context.as_ref())
        .await;
    let description = state.orchestrator.describe_intent(&result.intent).await;

    Json(IntentResponse {
        result,
        description,
    })
    .into_response()
}

/// Route a pre-classified intent straight to its handler. Handler failure
/// comes back inside the reply envelope, not as an error status.
async fn dispatch_handler(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<DispatchRequest>,
) -> Response {
    if payload.text.trim().is_empty() {
        return error_response(&Error::invalid_request("Empty text"));
    }

    let reply = state
        .orchestrator
        .dispatch(
            &payload.intent,
            &payload.text,
            payload.user_id.as_deref(),
            payload.session_id.as_deref(),
        )
        .await;

    Json(reply).into_response()
}

async fn handlers_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(HandlersResponse {
        sector: state.orchestrator.sector().await,
        handlers: state.orchestrator.list_handlers().await,
    })
}

async fn handler_detail_handler(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
) -> Response {
    if !state.orchestrator.list_handlers().await.contains(&name) {
        return error_response(&Error::HandlerNotFound(name));
    }

    let description = state.orchestrator.describe_handler(&name).await;
    Json(HandlerDetail { name, description }).into_response()
}

async fn sector_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(SectorResponse {
        sector: state.orchestrator.sector().await,
        tools: state.orchestrator.list_handlers().await,
    })
}

/// Swap the routing table and handler set, atomically, for a catalog
/// profile or a fully inline one.
async fn reconfigure_handler(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<SectorUpdate>,
) -> Response {
    let profile = match payload {
        SectorUpdate::Named { name } => match SectorProfile::by_name(&name) {
            Some(profile) => profile,
            None => {
                return error_response(&Error::invalid_request(format!(
                    "Unknown sector: {}",
                    name
                )))
            }
        },
        SectorUpdate::Inline(profile) => profile,
    };

    tracing::info!(sector = %profile.sector, "Reconfiguring sector");
    state.orchestrator.reconfigure(profile).await;

    Json(SectorResponse {
        sector: state.orchestrator.sector().await,
        tools: state.orchestrator.list_handlers().await,
    })
    .into_response()
}

async fn memory_handler(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
    Query(query): Query<MemoryQuery>,
) -> impl IntoResponse {
    let limit = query.limit.unwrap_or(DEFAULT_MEMORY_LIMIT);
    let interactions = state.orchestrator.recent_memory(&user_id, limit).await;
    Json(MemoryResponse {
        user_id,
        interactions,
    })
}

async fn memory_search_handler(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<SearchRequest>,
) -> Response {
    if payload.query.trim().is_empty() {
        return error_response(&Error::invalid_request("Empty query"));
    }

    let results = state
        .orchestrator
        .search_memory(
            &payload.query,
            payload.user_id.as_deref(),
            payload.limit.unwrap_or(DEFAULT_MEMORY_LIMIT),
        )
        .await;

    Json(SearchResponse { results }).into_response()
}

async fn memory_prune_handler(State(state): State<Arc<AppState>>) -> Response {
    match state.orchestrator.prune_memory().await {
        Ok(removed) => {
            tracing::info!(removed, "Pruned interaction history");
            Json(PruneResponse { removed }).into_response()
        }
        Err(e) => {
            tracing::warn!(error = %e, "Prune failed");
            error_response(&e)
        }
    }
}

/// Synthesize speech for a reply. Synthesis failure degrades to a
/// text-only envelope rather than an error status.
async fn speak_handler(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<SpeakRequest>,
) -> Response {
    if payload.text.trim().is_empty() {
        return error_response(&Error::invalid_request("Empty text"));
    }

    match state.orchestrator.speak(&payload.text).await {
        Ok(audio) => Json(SpeakResponse {
            text: payload.text,
            audio: Some(base64::engine::general_purpose::STANDARD.encode(audio)),
            synthesized: true,
        })
        .into_response(),
        Err(e) => {
            tracing::warn!(error = %e, "Synthesis unavailable, degrading to text-only");
            Json(SpeakResponse {
                text: payload.text,
                audio: None,
                synthesized: false,
            })
            .into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_statuses_map_by_failure_domain() {
        assert_eq!(
            error_status(&Error::invalid_request("bad")),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            error_status(&Error::HandlerNotFound("x".to_string())),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            error_status(&Error::transcription("down")),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            error_status(&Error::storage("down")),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn blank_inputs_count_as_empty() {
        assert!(turn_input_is_empty(&TurnInput::Text {
            text: "   ".to_string()
        }));
        assert!(!turn_input_is_empty(&TurnInput::Audio {
            audio_data: "UklGRg==".to_string()
        }));
    }
}
