// Multi-provider LLM support
//
// This module provides an abstraction layer over different LLM providers
// (Gemini, Claude) so the orchestration graph can be wired to either API
// through a unified interface.

use anyhow::Result;
use async_trait::async_trait;

pub mod types;

// Provider implementations
pub mod claude;
pub mod gemini;

// Provider factory
pub mod factory;

mod retry;

// Re-export commonly used types
pub use claude::ClaudeProvider;
pub use factory::{create_provider, create_provider_from_entry};
pub use gemini::GeminiProvider;
pub use retry::{ApiStatusError, RetryPolicy};
pub use types::{ChatMessage, ProviderRequest, ProviderResponse};

/// Trait for LLM providers
///
/// All LLM providers implement this trait, providing a unified interface
/// for turning a composed prompt into generated text. The orchestration
/// graph holds the provider as a trait object so tests can substitute a
/// deterministic fake.
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Send a message and get a complete response
    async fn send_message(&self, request: &ProviderRequest) -> Result<ProviderResponse>;

    /// Get the provider name (e.g., "gemini", "claude")
    fn name(&self) -> &str;

    /// Get the default model for this provider
    fn default_model(&self) -> &str;
}
