// Configuration structs

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};

/// Top-level service configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// HTTP server settings
    #[serde(default)]
    pub server: ServerConfig,

    /// Model provider entries in priority order; the first entry is active
    #[serde(default)]
    pub providers: Vec<ProviderEntry>,

    /// Ingestion service passthrough settings
    #[serde(default)]
    pub ingest: IngestConfig,

    /// Orchestration graph tuning
    #[serde(default)]
    pub graph: GraphSettings,

    /// Provider retry tuning
    #[serde(default)]
    pub retry: RetrySettings,
}

impl Config {
    /// Build a config from provider entries with all other sections default.
    pub fn with_providers(providers: Vec<ProviderEntry>) -> Self {
        Self {
            providers,
            ..Self::default()
        }
    }

    /// Reject configs that cannot possibly serve a request.
    pub fn validate(&self) -> Result<()> {
        if self.providers.is_empty() {
            bail!("No providers configured");
        }
        for entry in &self.providers {
            if entry.api_key().trim().is_empty() {
                bail!("Provider '{}' has an empty api_key", entry.provider_name());
            }
        }
        if self.graph.max_rounds == 0 {
            bail!("graph.max_rounds must be at least 1");
        }
        if self.retry.max_retries == 0 {
            bail!("retry.max_retries must be at least 1");
        }
        Ok(())
    }
}

/// A single model provider entry
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "provider", rename_all = "lowercase")]
pub enum ProviderEntry {
    Gemini {
        api_key: String,
        #[serde(default)]
        model: Option<String>,
    },
    Claude {
        api_key: String,
        #[serde(default)]
        model: Option<String>,
    },
}

impl ProviderEntry {
    pub fn provider_name(&self) -> &'static str {
        match self {
            ProviderEntry::Gemini { .. } => "gemini",
            ProviderEntry::Claude { .. } => "claude",
        }
    }

    pub fn api_key(&self) -> &str {
        match self {
            ProviderEntry::Gemini { api_key, .. } => api_key,
            ProviderEntry::Claude { api_key, .. } => api_key,
        }
    }
}

/// HTTP server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Bind address (e.g., "127.0.0.1:8000")
    #[serde(default = "default_bind_address")]
    pub bind_address: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
        }
    }
}

fn default_bind_address() -> String {
    "127.0.0.1:8000".to_string()
}

/// Ingestion service passthrough configuration
#[derive(Debug, Clone, Deserialize)]
pub struct IngestConfig {
    /// Base URL of the external ingestion service
    #[serde(default = "default_ingest_base_url")]
    pub base_url: String,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            base_url: default_ingest_base_url(),
        }
    }
}

fn default_ingest_base_url() -> String {
    "http://127.0.0.1:5000".to_string()
}

/// Orchestration graph tuning, mapped onto `graph::GraphConfig`
#[derive(Debug, Clone, Deserialize)]
pub struct GraphSettings {
    /// Reflect/refine rounds before the hard stop
    #[serde(default = "default_max_rounds")]
    pub max_rounds: u32,

    /// Token cap for each provider call
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
}

impl Default for GraphSettings {
    fn default() -> Self {
        Self {
            max_rounds: default_max_rounds(),
            max_tokens: default_max_tokens(),
        }
    }
}

fn default_max_rounds() -> u32 {
    1
}

fn default_max_tokens() -> u32 {
    4096
}

/// Provider retry tuning, mapped onto `providers::RetryPolicy`
#[derive(Debug, Clone, Deserialize)]
pub struct RetrySettings {
    /// Total attempts per provider call, including the first one
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Delay before the first retry; doubles on each subsequent attempt
    #[serde(default = "default_retry_base_delay_ms")]
    pub base_delay_ms: u64,
}

impl Default for RetrySettings {
    fn default() -> Self {
        Self {
            max_retries: default_max_retries(),
            base_delay_ms: default_retry_base_delay_ms(),
        }
    }
}

fn default_max_retries() -> u32 {
    3
}

fn default_retry_base_delay_ms() -> u64 {
    1000
}

impl From<&RetrySettings> for crate::providers::RetryPolicy {
    fn from(settings: &RetrySettings) -> Self {
        Self {
            max_retries: settings.max_retries,
            base_delay_ms: settings.base_delay_ms,
        }
    }
}

impl From<&GraphSettings> for crate::graph::GraphConfig {
    fn from(settings: &GraphSettings) -> Self {
        Self {
            max_rounds: settings.max_rounds,
            max_tokens: settings.max_tokens,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.server.bind_address, "127.0.0.1:8000");
        assert_eq!(config.graph.max_rounds, 1);
        assert_eq!(config.graph.max_tokens, 4096);
        assert_eq!(config.retry.max_retries, 3);
        assert_eq!(config.retry.base_delay_ms, 1000);
        assert!(config.providers.is_empty());
    }

    #[test]
    fn test_parse_full_toml() {
        let toml_str = r#"
[server]
bind_address = "0.0.0.0:9000"

[[providers]]
provider = "gemini"
api_key = "g-key"
model = "gemini-1.5-flash"

[[providers]]
provider = "claude"
api_key = "c-key"

[ingest]
base_url = "http://ingest.internal:5000"

[graph]
max_rounds = 2
max_tokens = 2048

[retry]
max_retries = 5
base_delay_ms = 250
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.server.bind_address, "0.0.0.0:9000");
        assert_eq!(config.providers.len(), 2);
        assert_eq!(config.providers[0].provider_name(), "gemini");
        assert_eq!(config.ingest.base_url, "http://ingest.internal:5000");
        assert_eq!(config.graph.max_rounds, 2);
        assert_eq!(config.retry.max_retries, 5);
        assert_eq!(config.retry.base_delay_ms, 250);
        config.validate().unwrap();
    }

    #[test]
    fn test_parse_minimal_toml() {
        let toml_str = r#"
[[providers]]
provider = "gemini"
api_key = "g-key"
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.providers.len(), 1);
        assert_eq!(config.graph.max_rounds, 1);
        config.validate().unwrap();
    }

    #[test]
    fn test_validate_rejects_empty_providers() {
        assert!(Config::default().validate().is_err());
    }

    #[test]
    fn test_validate_rejects_blank_api_key() {
        let config = Config::with_providers(vec![ProviderEntry::Gemini {
            api_key: "  ".to_string(),
            model: None,
        }]);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_zero_rounds() {
        let mut config = Config::with_providers(vec![ProviderEntry::Gemini {
            api_key: "key".to_string(),
            model: None,
        }]);
        config.graph.max_rounds = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_zero_retries() {
        let mut config = Config::with_providers(vec![ProviderEntry::Gemini {
            api_key: "key".to_string(),
            model: None,
        }]);
        config.retry.max_retries = 0;
        assert!(config.validate().is_err());
    }
}
