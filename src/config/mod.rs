// Configuration management

mod loader;
mod settings;

pub use loader::load_config;
pub use settings::{Config, GraphSettings, IngestConfig, ProviderEntry, RetrySettings, ServerConfig};
