// Shared test fixtures: a scripted fake provider and router construction
#![allow(dead_code)]

use anyhow::Result;
use async_trait::async_trait;
use std::sync::{Arc, Mutex};

use repotalk::graph::{GraphConfig, QueryGraph};
use repotalk::ingest::IngestClient;
use repotalk::providers::{LlmProvider, ProviderRequest, ProviderResponse};
use repotalk::server::{create_router, AppState};

/// Provider that replays a fixed script of responses.
pub struct ScriptedProvider {
    script: Mutex<Vec<Result<String, String>>>,
}

impl ScriptedProvider {
    pub fn new(script: Vec<Result<String, String>>) -> Self {
        Self {
            script: Mutex::new(script),
        }
    }

    pub fn ok(responses: &[&str]) -> Self {
        Self::new(responses.iter().map(|r| Ok(r.to_string())).collect())
    }
}

#[async_trait]
impl LlmProvider for ScriptedProvider {
    async fn send_message(&self, _request: &ProviderRequest) -> Result<ProviderResponse> {
        let mut script = self.script.lock().unwrap();
        if script.is_empty() {
            anyhow::bail!("scripted provider ran out of responses");
        }
        match script.remove(0) {
            Ok(text) => Ok(ProviderResponse {
                model: "scripted".to_string(),
                content: text,
                stop_reason: None,
                provider: "scripted".to_string(),
            }),
            Err(msg) => anyhow::bail!(msg),
        }
    }

    fn name(&self) -> &str {
        "scripted"
    }

    fn default_model(&self) -> &str {
        "scripted"
    }
}

/// Build a router backed by the given provider and ingestion base URL.
pub fn test_router(provider: ScriptedProvider, ingest_base_url: &str) -> axum::Router {
    let provider: Arc<dyn LlmProvider> = Arc::new(provider);
    let state = AppState {
        graph: QueryGraph::new(provider.clone(), GraphConfig::default()),
        provider,
        ingest: IngestClient::new(ingest_base_url).unwrap(),
        summary_max_tokens: 1024,
    };
    create_router(Arc::new(state))
}
