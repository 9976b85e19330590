//! Observability for Switchboard: Prometheus metrics and tracing setup.

pub mod metrics;
pub mod tracing_layer;

pub use metrics::setup_metrics_recorder;
pub use tracing_layer::configure_tracing;
