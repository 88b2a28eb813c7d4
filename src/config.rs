//! Application configuration loaded from environment variables.
//!
//! Everything is read once at startup; the rest of the crate takes the
//! values by reference and never touches the environment again.

use std::env;

/// Default location of the static grid dataset.
pub const DEFAULT_DATASET_PATH: &str = "data/datumvertikal.geojson";

/// Default liveness-check interval for the credential expiry monitor.
pub const DEFAULT_EXPIRY_CHECK_SECS: u64 = 60;

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the backend API (no trailing slash).
    pub api_base_url: String,
    /// Path or URL of the static grid dataset.
    pub dataset_path: String,
    /// Optional path of the persisted session file (the browser
    /// localStorage analog). `None` keeps the session in memory only.
    pub session_file: Option<String>,
    /// Interval of the periodic credential liveness check, in seconds.
    pub expiry_check_secs: u64,
}

impl Default for Config {
    /// Default config for testing only.
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:3000".to_string(),
            dataset_path: DEFAULT_DATASET_PATH.to_string(),
            session_file: None,
            expiry_check_secs: DEFAULT_EXPIRY_CHECK_SECS,
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        Ok(Self {
            api_base_url: env::var("OSDATUM_API_URL")
                .map(|v| v.trim_end_matches('/').to_string())
                .map_err(|_| ConfigError::Missing("OSDATUM_API_URL"))?,
            dataset_path: env::var("OSDATUM_DATASET_PATH")
                .unwrap_or_else(|_| DEFAULT_DATASET_PATH.to_string()),
            session_file: env::var("OSDATUM_SESSION_FILE").ok(),
            expiry_check_secs: env::var("OSDATUM_EXPIRY_CHECK_SECS")
                .unwrap_or_else(|_| DEFAULT_EXPIRY_CHECK_SECS.to_string())
                .parse()
                .unwrap_or(DEFAULT_EXPIRY_CHECK_SECS),
        })
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),
}
