// Configuration loader
// Loads from an explicit path, ~/.repotalk/config.toml, or environment

use anyhow::{bail, Context, Result};
use std::fs;
use std::path::Path;

use super::settings::{Config, ProviderEntry};

/// Load configuration.
///
/// Resolution order: an explicitly given path (must exist), then
/// `~/.repotalk/config.toml`, then a provider built from `GOOGLE_API_KEY`
/// or `ANTHROPIC_API_KEY` environment variables.
pub fn load_config(path: Option<&Path>) -> Result<Config> {
    if let Some(path) = path {
        let config = load_from_file(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?;
        return Ok(config);
    }

    if let Some(home) = dirs::home_dir() {
        let default_path = home.join(".repotalk/config.toml");
        if default_path.exists() {
            let config = load_from_file(&default_path)
                .with_context(|| format!("Failed to load config from {}", default_path.display()))?;
            return Ok(config);
        }
    }

    if let Some(config) = config_from_env()? {
        return Ok(config);
    }

    bail!(
        "No configuration found. Create ~/.repotalk/config.toml with a [[providers]] \
         entry, pass --config, or set GOOGLE_API_KEY / ANTHROPIC_API_KEY."
    );
}

fn load_from_file(path: &Path) -> Result<Config> {
    let contents = fs::read_to_string(path).context("Could not read config file")?;
    let config: Config = toml::from_str(&contents).context("Could not parse config TOML")?;
    config.validate().context("Configuration validation failed")?;
    Ok(config)
}

fn config_from_env() -> Result<Option<Config>> {
    if let Ok(api_key) = std::env::var("GOOGLE_API_KEY") {
        if !api_key.is_empty() {
            return Ok(Some(Config::with_providers(vec![ProviderEntry::Gemini {
                api_key,
                model: None,
            }])));
        }
    }
    if let Ok(api_key) = std::env::var("ANTHROPIC_API_KEY") {
        if !api_key.is_empty() {
            return Ok(Some(Config::with_providers(vec![ProviderEntry::Claude {
                api_key,
                model: None,
            }])));
        }
    }
    Ok(None)
}
