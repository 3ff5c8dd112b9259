//! Configuration loading and parsing

use anyhow::{Context, Result};
use gaunit_core::{EndpointConfig, MatchMode};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Application configuration (loaded from a TOML file)
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AppConfig {
    #[serde(default)]
    pub endpoint: EndpointConfig,
    #[serde(default)]
    pub check: CheckConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CheckConfig {
    /// Require actual events to follow tracking plan order
    #[serde(default = "default_ordered")]
    pub ordered: bool,
}

fn default_ordered() -> bool {
    true
}

impl Default for CheckConfig {
    fn default() -> Self {
        Self {
            ordered: default_ordered(),
        }
    }
}

impl AppConfig {
    /// Matching mode, with `--unordered` taking precedence over the file
    pub fn match_mode(&self, force_unordered: bool) -> MatchMode {
        MatchMode::from_ordered(self.check.ordered && !force_unordered)
    }
}

/// Load configuration from a TOML file
pub fn load_config(path: &Path) -> Result<AppConfig> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {:?}", path))?;

    let config: AppConfig = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {:?}", path))?;

    Ok(config)
}
