//! Configuration loading for the backoffice CLI.

use anyhow::{Context, Result};
use std::path::Path;
use store_client::StoreConfig;

/// Config file picked up from the working directory when `--config` is absent.
pub const DEFAULT_CONFIG_FILE: &str = "backoffice.toml";

/// Command-line values that take precedence over the config file.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    /// GraphQL endpoint.
    pub endpoint: Option<String>,
    /// Bearer token.
    pub token: Option<String>,
}

/// Load the configuration and apply command-line overrides.
///
/// An explicit `path` must exist. Without one, `backoffice.toml` in `dir` is
/// used when present, and built-in defaults otherwise.
pub fn load(path: Option<&Path>, dir: &Path, overrides: &Overrides) -> Result<StoreConfig> {
    let mut config = match path {
        Some(path) => StoreConfig::from_file(path)
            .with_context(|| format!("Failed to load configuration from {}", path.display()))?,
        None => {
            let default = dir.join(DEFAULT_CONFIG_FILE);
            if default.exists() {
                StoreConfig::from_file(&default).context("Invalid backoffice.toml")?
            } else {
                StoreConfig::default()
            }
        }
    };

    if let Some(endpoint) = &overrides.endpoint {
        config.api.endpoint = endpoint.clone();
    }
    if let Some(token) = &overrides.token {
        config.api.bearer_token = Some(token.clone());
    }

    Ok(config)
}
