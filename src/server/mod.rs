// HTTP entry adapter
//
// Thin glue around the query graph: parses requests, invokes the graph,
// serializes results, and maps failures to status codes.

mod handlers;

pub use handlers::{create_router, QueryRequest, QueryResponse};

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::graph::QueryGraph;
use crate::ingest::IngestClient;
use crate::providers::LlmProvider;

/// Shared state handed to every handler.
///
/// All fields are read-only after construction; per-request state lives in
/// each graph invocation.
pub struct AppState {
    pub graph: QueryGraph,
    pub provider: Arc<dyn LlmProvider>,
    pub ingest: IngestClient,
    pub summary_max_tokens: u32,
}

/// The HTTP server for the query service
pub struct AppServer {
    state: Arc<AppState>,
    bind_address: String,
}

impl AppServer {
    /// Wire the server from config and an already-constructed provider.
    pub fn new(config: &Config, provider: Arc<dyn LlmProvider>) -> Result<Self> {
        let graph = QueryGraph::new(provider.clone(), (&config.graph).into());
        let ingest = IngestClient::new(config.ingest.base_url.clone())?;

        Ok(Self {
            state: Arc::new(AppState {
                graph,
                provider,
                ingest,
                summary_max_tokens: config.graph.max_tokens,
            }),
            bind_address: config.server.bind_address.clone(),
        })
    }

    /// Start serving. Runs until the process is stopped.
    pub async fn serve(self) -> Result<()> {
        let addr: SocketAddr = self.bind_address.parse()?;

        // Body size limit guards against oversized payloads; 4MB is generous
        // for questions plus retrieved context chunks.
        let app = create_router(self.state)
            .layer(axum::extract::DefaultBodyLimit::max(4 * 1024 * 1024))
            .layer(CorsLayer::permissive())
            .layer(TraceLayer::new_for_http());

        tracing::info!("Starting repotalk server on {}", addr);

        let listener = tokio::net::TcpListener::bind(addr).await?;
        axum::serve(listener, app).await?;

        Ok(())
    }
}
