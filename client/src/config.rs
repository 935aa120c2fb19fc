//! Configuration management for the IMS client
//!
//! Supports hierarchical configuration loading:
//! 1. Default values in code
//! 2. Configuration files (config/development.toml, config/production.toml)
//! 3. Environment variable overrides with IMS_ prefix

use std::path::PathBuf;
use std::time::Duration;

use config::{ConfigError, Environment, File};
use serde::Deserialize;

/// Path under the API host for v1 endpoints
pub const API_V1: &str = "/v1";

/// Main client configuration
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Current environment (development, production)
    pub environment: String,

    /// Backend API location
    pub api: ApiConfig,

    /// Persisted session
    pub session: SessionConfig,

    /// Read query behaviour
    pub query: QueryConfig,

    /// Toast behaviour
    pub notifications: NotificationConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ApiConfig {
    /// API host, e.g. `http://localhost:8000/api`
    pub host: String,

    /// Backend domain serving non-API routes (printables, storage links)
    #[serde(default)]
    pub domain: String,

    /// Request timeout; transport defaults apply when unset
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SessionConfig {
    /// File holding the persisted auth token
    pub path: PathBuf,
}

#[derive(Debug, Deserialize, Clone)]
pub struct QueryConfig {
    /// Retries for failed read queries (401/403 are never retried)
    pub max_retries: u32,

    /// Base delay of the exponential backoff between retries
    pub retry_base_ms: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct NotificationConfig {
    /// Window in which at most one "Unauthorized" toast is shown
    pub unauthorized_cooldown_ms: u64,
}

impl Config {
    /// Load configuration from files and environment variables
    pub fn load() -> Result<Self, ConfigError> {
        let environment = std::env::var("IMS_ENVIRONMENT").unwrap_or_else(|_| "development".into());

        let config = config::Config::builder()
            // Start with default values
            .set_default("environment", environment.clone())?
            .set_default("api.host", "http://127.0.0.1:8000/api")?
            .set_default("api.domain", "http://127.0.0.1:8000")?
            .set_default("session.path", ".ims/auth.json")?
            .set_default("query.max_retries", 3)?
            .set_default("query.retry_base_ms", 1000)?
            .set_default("notifications.unauthorized_cooldown_ms", 5000)?
            // Load environment-specific config file
            .add_source(File::with_name(&format!("config/{}", environment)).required(false))
            // Override with environment variables (IMS_ prefix)
            .add_source(
                Environment::with_prefix("IMS")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }

    /// Configuration pointing at `host`, with defaults for everything else
    pub fn for_host(host: impl Into<String>) -> Self {
        Self {
            environment: "development".to_string(),
            api: ApiConfig {
                host: host.into(),
                domain: String::new(),
                timeout_secs: None,
            },
            session: SessionConfig {
                path: PathBuf::from(".ims/auth.json"),
            },
            query: QueryConfig::default(),
            notifications: NotificationConfig::default(),
        }
    }
}

impl ApiConfig {
    /// Host without a trailing slash
    pub fn host(&self) -> &str {
        self.host.trim_end_matches('/')
    }

    /// Domain without a trailing slash
    pub fn domain(&self) -> &str {
        self.domain.trim_end_matches('/')
    }

    /// Base URL for versioned endpoints
    pub fn v1_base(&self) -> String {
        format!("{}{}", self.host(), API_V1)
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            retry_base_ms: 1000,
        }
    }
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            unauthorized_cooldown_ms: 5000,
        }
    }
}
