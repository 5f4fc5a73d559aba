// Repotalk - codebase Q&A service
// Main entry point

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;

use repotalk::config::load_config;
use repotalk::providers::create_provider;
use repotalk::server::AppServer;

#[derive(Parser)]
#[command(name = "repotalk", about = "Codebase Q&A service with self-critique refinement")]
struct Args {
    /// Config file path (default: ~/.repotalk/config.toml)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Override the bind address from config (e.g., "0.0.0.0:9000")
    #[arg(long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "repotalk=info,tower_http=info".into()),
        )
        .init();

    let args = Args::parse();

    let mut config = load_config(args.config.as_deref())?;
    if let Some(bind) = args.bind {
        config.server.bind_address = bind;
    }

    let provider: Arc<dyn repotalk::providers::LlmProvider> =
        Arc::from(create_provider(&config.providers, (&config.retry).into())?);
    tracing::info!(
        "Using provider '{}' with model '{}'",
        provider.name(),
        provider.default_model()
    );

    let server = AppServer::new(&config, provider)?;
    server.serve().await
}
