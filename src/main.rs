#![deny(unused)]
//! Switchboard - voice and text turn orchestration service.
//!
//! Wires configured providers, stores, and resilience policies into the
//! turn pipeline and serves it over HTTP.

use std::sync::Arc;

use tokio::time::Duration;

use switchboard_core::config::AppConfig;
use switchboard_core::mocks::MockLlm;
use switchboard_core::types::SectorProfile;
use switchboard_core::{InteractionIndex, KeyValueCache, LlmClient, SpeechSynthesizer, Transcriber};
use switchboard_gateway::{GatewayConfig, GatewayServer};
use switchboard_observe::{configure_tracing, setup_metrics_recorder};
use switchboard_orchestrator::Orchestrator;
use switchboard_providers::{
    create_default_client, HttpSynthesizer, HttpTranscriber, ResilientLlmClient,
    ResilientSynthesizer, ResilientTranscriber, RigConfig, RigLlmClient,
};
use switchboard_resilience::{BreakerConfig, CallPolicy, CircuitBreaker, ResultCache, RetryPolicy};
use switchboard_store::{
    InMemoryIndex, MemoryKv, QdrantConfig, QdrantIndex, RedisKv, RetentionPolicy,
};

/// Reply served by the offline mock provider.
const OFFLINE_REPLY: &str = "Switchboard is running in offline mode.";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    configure_tracing()?;

    let mut config = AppConfig::load().unwrap_or_else(|e| {
        tracing::warn!(error = %e, "Config load failed, using built-in defaults");
        AppConfig::default()
    });

    tracing::info!("Starting Switchboard v{}", env!("CARGO_PKG_VERSION"));

    let metrics_handle = setup_metrics_recorder()?;

    // =========================================================================
    // Resilience policies
    // =========================================================================
    let retry = RetryPolicy::new(
        config.resilience.max_attempts,
        Duration::from_millis(config.resilience.retry_delay_ms),
    );
    let attempt_timeout = Duration::from_secs(config.resilience.call_timeout_secs);
    let cache_ttl = config.resilience.cache_ttl_secs;
    let breaker_config = BreakerConfig {
        failure_threshold: config.resilience.failure_threshold,
        recovery_timeout: Duration::from_secs(config.resilience.recovery_timeout_secs),
    };
    let policy_for = |name: &str, breaker: BreakerConfig| {
        CallPolicy::new(
            retry.clone(),
            Arc::new(CircuitBreaker::new(name, breaker)),
            attempt_timeout,
        )
    };

    // =========================================================================
    // Providers
    // =========================================================================
    let mut provider_label = config.providers.llm_provider.clone();
    let inner_llm: Arc<dyn LlmClient> = match config.providers.llm_provider.as_str() {
        "openai" => Arc::new(RigLlmClient::new(
            RigConfig::openai(config.providers.llm_model.as_str())
                .with_embedding_model(config.providers.embedding_model.as_str()),
        )),
        "anthropic" => Arc::new(RigLlmClient::new(
            RigConfig::anthropic(config.providers.llm_model.as_str())
                .with_embedding_model(config.providers.embedding_model.as_str()),
        )),
        "mock" => {
            tracing::info!("Using the offline mock LLM provider");
            Arc::new(MockLlm::constant(OFFLINE_REPLY))
        }
        other => match create_default_client(
            &config.providers.llm_model,
            &config.providers.embedding_model,
        ) {
            Ok(client) => {
                tracing::info!(
                    provider = %other,
                    "Unknown LLM provider name, selected by API key from the environment"
                );
                Arc::new(client)
            }
            Err(e) => {
                tracing::warn!(provider = %other, error = %e, "No usable LLM provider, falling back to mock");
                provider_label = "mock".to_string();
                Arc::new(MockLlm::constant(OFFLINE_REPLY))
            }
        },
    };

    let transcriber: Option<Arc<dyn Transcriber>> =
        match config.providers.transcription_api_key.take() {
            Some(api_key) => {
                tracing::info!(url = %config.providers.transcription_url, "Audio transcription enabled");
                Some(Arc::new(ResilientTranscriber::new(
                    Arc::new(HttpTranscriber::new(
                        config.providers.transcription_url.clone(),
                        api_key,
                    )),
                    policy_for("transcription", breaker_config),
                )))
            }
            None => {
                tracing::info!("No transcription API key set, audio input disabled");
                None
            }
        };

    let synthesizer: Option<Arc<dyn SpeechSynthesizer>> =
        match config.providers.synthesis_api_key.take() {
            Some(api_key) => {
                tracing::info!(url = %config.providers.synthesis_url, "Speech synthesis enabled");
                Some(Arc::new(ResilientSynthesizer::new(
                    Arc::new(HttpSynthesizer::new(
                        config.providers.synthesis_url.clone(),
                        api_key,
                    )),
                    policy_for("synthesis", breaker_config),
                )))
            }
            None => {
                tracing::info!("No synthesis API key set, audio output disabled");
                None
            }
        };

    // =========================================================================
    // Stores
    // =========================================================================
    let kv: Arc<dyn KeyValueCache> = match &config.store.redis_url {
        Some(url) => match RedisKv::new(url) {
            Ok(kv) => {
                tracing::info!(url = %url, "Using Redis for caching");
                Arc::new(kv)
            }
            Err(e) => {
                tracing::warn!(error = %e, "Redis unavailable, using the in-memory cache");
                Arc::new(MemoryKv::new())
            }
        },
        None => {
            tracing::info!("Using the in-memory cache");
            Arc::new(MemoryKv::new())
        }
    };

    let index: Arc<dyn InteractionIndex> = match &config.store.qdrant_url {
        Some(url) => {
            let qdrant = QdrantConfig {
                url: url.clone(),
                collection_name: config.store.collection.clone(),
                ..QdrantConfig::default()
            };
            match QdrantIndex::from_config(&qdrant).await {
                Ok(index) => {
                    tracing::info!(
                        url = %url,
                        collection = %qdrant.collection_name,
                        "Using Qdrant for interaction history"
                    );
                    Arc::new(index)
                }
                Err(e) => {
                    tracing::warn!(error = %e, "Qdrant unavailable, using the in-memory index");
                    Arc::new(InMemoryIndex::new())
                }
            }
        }
        None => {
            tracing::info!("Using the in-memory interaction index");
            Arc::new(InMemoryIndex::new())
        }
    };

    // =========================================================================
    // Turn pipeline
    // =========================================================================
    let classifier_llm: Arc<dyn LlmClient> = Arc::new(
        ResilientLlmClient::new(inner_llm.clone(), policy_for("llm", breaker_config))
            .with_embed_cache(ResultCache::new(kv.clone(), "embed", cache_ttl)),
    );
    // Handlers run on their own, tighter breaker tier.
    let handler_llm: Arc<dyn LlmClient> = Arc::new(ResilientLlmClient::new(
        inner_llm,
        policy_for("handler_llm", BreakerConfig::tight()),
    ));

    let profile = SectorProfile::by_name(&config.sector.name).unwrap_or_else(|| {
        tracing::warn!(sector = %config.sector.name, "Unknown sector, using the generic profile");
        SectorProfile::generic()
    });
    let sector_label = profile.sector.clone();

    let mut builder = Orchestrator::builder()
        .with_llm(classifier_llm)
        .with_handler_llm(handler_llm)
        .with_index(index)
        .with_profile(profile)
        .with_description_cache(ResultCache::new(kv, "describe", cache_ttl))
        .with_retention(RetentionPolicy::new(config.store.retention_days));
    if let Some(transcriber) = transcriber {
        builder = builder.with_transcriber(transcriber);
    }
    if let Some(synthesizer) = synthesizer {
        builder = builder.with_synthesizer(synthesizer);
    }
    let orchestrator = Arc::new(builder.build()?);

    tracing::info!(
        sector = %sector_label,
        provider = %provider_label,
        "Turn pipeline initialized"
    );

    // =========================================================================
    // Gateway
    // =========================================================================
    let gateway_config = GatewayConfig {
        host: config.server.host.clone(),
        port: config.server.port,
        enable_cors: config.server.enable_cors,
        enable_tracing: config.server.enable_tracing,
    };

    let server = GatewayServer::new(gateway_config, orchestrator).with_metrics(metrics_handle);

    let border = "═".repeat(62);
    println!();
    println!("╔{}╗", border);
    println!("║  {:<60}║", format!("Switchboard v{}", env!("CARGO_PKG_VERSION")));
    println!("╠{}╣", border);
    println!("║  {:<60}║", format!("Sector: {}", sector_label));
    println!("║  {:<60}║", format!("LLM provider: {}", provider_label));
    println!("╠{}╣", border);
    println!("║  {:<60}║", "Endpoints:");
    println!("║  {:<60}║", "  GET  /health           Liveness and readiness");
    println!("║  {:<60}║", "  GET  /metrics          Prometheus metrics");
    println!("║  {:<60}║", "  POST /v1/turn          Run one conversational turn");
    println!("║  {:<60}║", "  POST /v1/intent        Classify intent only");
    println!("║  {:<60}║", "  POST /v1/dispatch      Dispatch a classified intent");
    println!("║  {:<60}║", "  GET  /v1/sector        Active sector and tools");
    println!("╠{}╣", border);
    println!(
        "║  {:<60}║",
        format!(
            "Listening on http://{}:{}",
            config.server.host, config.server.port
        )
    );
    println!("╚{}╝", border);
    println!();

    server.run().await?;

    Ok(())
}
