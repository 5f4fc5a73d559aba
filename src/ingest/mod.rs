// Repository-ingestion passthrough
//
// The service does not parse repositories itself; it proxies tree requests
// to a configured external ingestion service and returns the flattened tree
// listing as-is.

use anyhow::{Context, Result};
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

const REQUEST_TIMEOUT_SECS: u64 = 120;

/// Tree listing returned by the ingestion service
#[derive(Debug, Clone, Deserialize)]
pub struct TreeResponse {
    pub tree: String,
}

/// HTTP client for the external ingestion service
#[derive(Clone)]
pub struct IngestClient {
    client: Client,
    base_url: String,
}

impl IngestClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }

    /// Fetch the flattened tree for a repository URL.
    pub async fn fetch_tree(&self, repo_url: &str) -> Result<TreeResponse> {
        let url = format!("{}/tree", self.base_url);

        tracing::debug!(repo_url, "Fetching repository tree from ingestion service");

        let response = self
            .client
            .get(&url)
            .query(&[("github_url", repo_url)])
            .send()
            .await
            .context("Failed to reach ingestion service")?;

        let status = response.status();

        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            anyhow::bail!(
                "Ingestion service request failed\n\nStatus: {}\nBody: {}",
                status,
                error_body
            );
        }

        response
            .json()
            .await
            .context("Failed to parse ingestion service response")
    }
}
