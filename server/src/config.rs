//! Configuration management for the server.

use std::env;
use std::path::PathBuf;

/// Default location of the persisted state document.
const DEFAULT_DATA_FILE: &str = "data/state.json";

/// Default request body limit. Recipes embed their images, so this is
/// well above axum's 2 MiB default.
const DEFAULT_MAX_BODY_BYTES: usize = 25 * 1024 * 1024;

/// Server configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server host address
    pub host: String,
    /// Server port
    pub port: u16,
    /// Path of the JSON file holding canonical state
    pub data_file: PathBuf,
    /// Maximum accepted request body size in bytes
    pub max_body_bytes: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            data_file: PathBuf::from(DEFAULT_DATA_FILE),
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let host = lookup("HOST").unwrap_or(defaults.host);

        let port = match lookup("PORT") {
            Some(port) => port.parse().map_err(|_| ConfigError::InvalidPort(port))?,
            None => defaults.port,
        };

        let data_file = lookup("DATA_FILE")
            .filter(|path| !path.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or(defaults.data_file);

        let max_body_bytes = match lookup("MAX_BODY_BYTES") {
            Some(limit) => limit
                .parse()
                .map_err(|_| ConfigError::InvalidBodyLimit(limit))?,
            None => defaults.max_body_bytes,
        };

        Ok(Self {
            host,
            port,
            data_file,
            max_body_bytes,
        })
    }

    /// Address to bind, as `host:port`.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid PORT value: {0}")]
    InvalidPort(String),

    #[error("Invalid MAX_BODY_BYTES value: {0}")]
    InvalidBodyLimit(String),
}
