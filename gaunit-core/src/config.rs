//! Tracking endpoint configuration
//!
//! Decides which captured requests are analytics hits. A request is kept when
//! its URL targets the configured base URL under one of the accepted path
//! prefixes.

use serde::{Deserialize, Serialize};

/// Default analytics collection host
pub const DEFAULT_BASE_URL: &str = "https://www.google-analytics.com";

/// Default accepted collection paths (Universal Analytics, legacy `j/`, GA4)
pub const DEFAULT_PATH_PREFIXES: [&str; 3] = ["/collect", "/j/collect", "/g/collect"];

/// Configuration of the tracking endpoint matcher
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EndpointConfig {
    /// Base transport URL (scheme and host)
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Accepted path prefixes appended to the base URL.
    /// An empty list accepts any URL containing the base URL.
    #[serde(default = "default_path_prefixes")]
    pub path_prefixes: Vec<String>,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_path_prefixes() -> Vec<String> {
    DEFAULT_PATH_PREFIXES.iter().map(|p| p.to_string()).collect()
}

impl Default for EndpointConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            path_prefixes: default_path_prefixes(),
        }
    }
}

impl EndpointConfig {
    /// Create a configuration targeting the default collection host
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method: set the base URL
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Builder method: replace the accepted path prefixes
    pub fn with_path_prefixes<I, S>(mut self, prefixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.path_prefixes = prefixes.into_iter().map(Into::into).collect();
        self
    }

    /// Builder method: accept one more path prefix
    pub fn add_path_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.path_prefixes.push(prefix.into());
        self
    }

    /// Full endpoint strings a hit URL may contain
    pub fn endpoints(&self) -> Vec<String> {
        let base = self.base_url.trim_end_matches('/');
        if self.path_prefixes.is_empty() {
            return vec![base.to_string()];
        }
        self.path_prefixes
            .iter()
            .map(|prefix| format!("{}/{}", base, prefix.trim_start_matches('/')))
            .collect()
    }

    /// Check if a request URL targets the tracking endpoint
    pub fn matches(&self, url: &str) -> bool {
        self.endpoints().iter().any(|endpoint| url.contains(endpoint.as_str()))
    }
}
