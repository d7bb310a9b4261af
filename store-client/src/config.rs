//! Configuration loading for the back-office store.
//!
//! Configuration is loaded from a TOML file (default: `backoffice.toml`).
//! Every field has a default, so an empty file is a valid configuration.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use store_core::ResponseOrdering;
use store_types::DEFAULT_PAGE_SIZE;

/// Root configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StoreConfig {
    /// Backend API configuration.
    #[serde(default)]
    pub api: ApiConfig,
    /// Store behavior configuration.
    #[serde(default)]
    pub store: StoreSection,
}

/// Backend API configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    /// GraphQL endpoint (default: http://localhost:8080/graphql).
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    /// Per-request timeout in seconds (default: 30).
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Bearer token sent with every request (optional).
    #[serde(default)]
    pub bearer_token: Option<String>,
}

/// Store behavior configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct StoreSection {
    /// What to do with out-of-order completions (default: latest-wins).
    #[serde(default)]
    pub response_ordering: ResponseOrdering,
    /// Page size of the initial query (default: 10).
    #[serde(default = "default_page_size")]
    pub page_size: u32,
}

// Default value functions
fn default_endpoint() -> String {
    "http://localhost:8080/graphql".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_page_size() -> u32 {
    DEFAULT_PAGE_SIZE
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            timeout_secs: default_timeout_secs(),
            bearer_token: None,
        }
    }
}

impl Default for StoreSection {
    fn default() -> Self {
        Self {
            response_ordering: ResponseOrdering::default(),
            page_size: default_page_size(),
        }
    }
}

impl ApiConfig {
    /// Request timeout.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl StoreConfig {
    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?;

        toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            source: e,
        })
    }
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read configuration file.
    #[error("failed to read config file {path}: {source}")]
    ReadError {
        /// Path to the configuration file.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },
    /// Failed to parse configuration file.
    #[error("failed to parse config file {path}: {source}")]
    ParseError {
        /// Path to the configuration file.
        path: PathBuf,
        /// Underlying TOML parse error.
        source: toml::de::Error,
    },
}
