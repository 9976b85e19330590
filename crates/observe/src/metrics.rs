//! Metrics implementation using Prometheus.

use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use switchboard_core::{Error, Result};

/// Initialize Prometheus recorder and return the handle.
pub fn setup_metrics_recorder() -> Result<PrometheusHandle> {
    let builder = PrometheusBuilder::new();

    let handle = builder
        .install_recorder()
        .map_err(|e| Error::internal(format!("Failed to install Prometheus recorder: {}", e)))?;

    tracing::info!("Prometheus metrics recorder initialized");
    Ok(handle)
}

/// Track one resilient call: outcome counter plus overall duration.
///
/// The duration spans the whole call including retries and delays, so it
/// reflects what the caller actually waited.
pub fn track_call(operation: &str, outcome: &str, latency_sec: f64) {
    metrics::counter!(
        "resilient_call_total",
        "operation" => operation.to_string(),
        "outcome" => outcome.to_string()
    )
    .increment(1);

    metrics::histogram!(
        "resilient_call_duration_seconds",
        "operation" => operation.to_string()
    )
    .record(latency_sec);
}

/// Track one admitted attempt inside a resilient call.
pub fn track_attempt(operation: &str) {
    metrics::counter!("resilient_call_attempts_total", "operation" => operation.to_string())
        .increment(1);
}

/// Track a result-cache lookup.
pub fn track_cache(operation: &str, outcome: &str) {
    metrics::counter!(
        "cache_result_total",
        "operation" => operation.to_string(),
        "outcome" => outcome.to_string()
    )
    .increment(1);
}

/// Track one dispatched intent.
pub fn track_dispatch(tool: &str, outcome: &str) {
    metrics::counter!(
        "dispatch_total",
        "tool" => tool.to_string(),
        "outcome" => outcome.to_string()
    )
    .increment(1);
}

/// Track one completed turn.
pub fn track_turn(sector: &str, kind: &str, outcome: &str) {
    metrics::counter!(
        "turns_total",
        "sector" => sector.to_string(),
        "kind" => kind.to_string(),
        "outcome" => outcome.to_string()
    )
    .increment(1);
}
