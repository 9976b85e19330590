use config::{Config, ConfigError, Environment, File};
use secrecy::Secret;
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub providers: ProvidersConfig,
    pub resilience: ResilienceConfig,
    pub sector: SectorConfig,
    pub store: StoreConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub enable_cors: bool,
    pub enable_tracing: bool,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ProvidersConfig {
    /// LLM backend: "openai", "anthropic", or "mock".
    pub llm_provider: String,
    pub llm_model: String,
    pub embedding_model: String,
    pub transcription_url: String,
    pub transcription_api_key: Option<Secret<String>>,
    pub synthesis_url: String,
    pub synthesis_api_key: Option<Secret<String>>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ResilienceConfig {
    pub max_attempts: u32,
    pub retry_delay_ms: u64,
    pub failure_threshold: u32,
    pub recovery_timeout_secs: u64,
    pub call_timeout_secs: u64,
    pub cache_ttl_secs: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SectorConfig {
    pub name: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct StoreConfig {
    pub redis_url: Option<String>,
    pub qdrant_url: Option<String>,
    pub collection: String,
    pub retention_days: u32,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        let env = std::env::var("SWITCHBOARD_ENV").unwrap_or_else(|_| "development".into());

        let s = Config::builder()
            .add_source(File::with_name("config/default"))
            .add_source(File::with_name(&format!("config/{}", env)).required(false))
            .add_source(File::with_name("config/local").required(false))
            // Map SWITCHBOARD__SERVER__PORT=3000 to server.port
            .add_source(Environment::with_prefix("SWITCHBOARD").separator("__"))
            .build()?;

        s.try_deserialize()
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: "0.0.0.0".into(),
                port: 3000,
                enable_cors: true,
                enable_tracing: true,
            },
            providers: ProvidersConfig {
                llm_provider: "mock".into(),
                llm_model: "gpt-4o-mini".into(),
                embedding_model: "text-embedding-3-small".into(),
                transcription_url: "https://api.sarvam.ai".into(),
                transcription_api_key: None,
                synthesis_url: "https://api.sarvam.ai".into(),
                synthesis_api_key: None,
            },
            resilience: ResilienceConfig {
                max_attempts: 3,
                retry_delay_ms: 2000,
                failure_threshold: 5,
                recovery_timeout_secs: 60,
                call_timeout_secs: 30,
                cache_ttl_secs: 3600,
            },
            sector: SectorConfig {
                name: "generic".into(),
            },
            store: StoreConfig {
                redis_url: None,
                qdrant_url: None,
                collection: "switchboard_interactions".into(),
                retention_days: 30,
            },
        }
    }
}
