// Provider factory
//
// Creates LLM providers based on configuration entries

use anyhow::{bail, Context, Result};

use super::claude::ClaudeProvider;
use super::gemini::GeminiProvider;
use super::retry::RetryPolicy;
use super::LlmProvider;
use crate::config::ProviderEntry;

/// Create an `LlmProvider` from a single configuration entry.
pub fn create_provider_from_entry(
    entry: &ProviderEntry,
    retry: RetryPolicy,
) -> Result<Box<dyn LlmProvider>> {
    match entry {
        ProviderEntry::Gemini { api_key, model } => {
            let mut provider = GeminiProvider::new(api_key.clone())?.with_retry_policy(retry);
            if let Some(m) = model {
                provider = provider.with_model(m.clone());
            }
            Ok(Box::new(provider))
        }

        ProviderEntry::Claude { api_key, model } => {
            let mut provider = ClaudeProvider::new(api_key.clone())?.with_retry_policy(retry);
            if let Some(m) = model {
                provider = provider.with_model(m.clone());
            }
            Ok(Box::new(provider))
        }
    }
}

/// Create the active provider: the first configured entry wins.
pub fn create_provider(
    entries: &[ProviderEntry],
    retry: RetryPolicy,
) -> Result<Box<dyn LlmProvider>> {
    let entry = match entries.first() {
        Some(entry) => entry,
        None => bail!("No provider entries configured"),
    };
    create_provider_from_entry(entry, retry).context("Failed to create provider from config")
}
