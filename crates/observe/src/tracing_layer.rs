//! Tracing configuration.

use switchboard_core::Result;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Configure stdout logging with env-based filtering.
///
/// `SWITCHBOARD_JSON_LOGS=1` switches the format to line-delimited JSON
/// for log collectors.
pub fn configure_tracing() -> Result<()> {
    let env_filter = tracing_subscriber::EnvFilter::new(
        std::env::var("RUST_LOG").unwrap_or_else(|_| "info,switchboard=debug".into()),
    );

    let registry = tracing_subscriber::registry().with(env_filter);

    if std::env::var("SWITCHBOARD_JSON_LOGS").is_ok() {
        registry
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }

    Ok(())
}
