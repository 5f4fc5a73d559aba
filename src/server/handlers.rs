// HTTP request handlers

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::AppState;
use crate::graph::{GraphError, Message, RunConfig};
use crate::prompts;

/// Body for `POST /api/query`
#[derive(Debug, Deserialize)]
pub struct QueryRequest {
    pub question: String,
    /// Retrieved context chunks, in relevance order
    #[serde(default)]
    pub context: Vec<String>,
    /// Opaque prior-conversation text
    #[serde(default)]
    pub history: String,
}

/// Success body for `POST /api/query`
#[derive(Debug, Serialize)]
pub struct QueryResponse {
    pub status: &'static str,
    pub response: String,
    pub trace: Vec<Message>,
}

/// Error body shared by all endpoints
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub status: &'static str,
    pub message: String,
}

impl ErrorResponse {
    fn new(message: impl Into<String>) -> Self {
        Self {
            status: "error",
            message: message.into(),
        }
    }
}

/// Build the service router.
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/api/query", post(handle_query))
        .route("/api/tree", get(handle_tree))
        .route("/api/summary", post(handle_summary))
        .with_state(state)
}

/// Liveness probe
async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

/// Map a graph failure to an HTTP status.
///
/// Input problems are the caller's fault (400), provider failures are an
/// upstream problem (502), and invariant violations are ours (500).
fn graph_error_status(error: &GraphError) -> StatusCode {
    match error {
        GraphError::EmptyQuestion => StatusCode::BAD_REQUEST,
        GraphError::ModelInvocation(_) => StatusCode::BAD_GATEWAY,
        GraphError::MalformedTrace { .. } => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// `POST /api/query` — run the full generate/reflect/refine loop.
async fn handle_query(
    State(state): State<Arc<AppState>>,
    Json(request): Json<QueryRequest>,
) -> Response {
    let run = RunConfig {
        context: request.context,
        conversation_history: request.history,
    };

    match state.graph.invoke(&request.question, &run).await {
        Ok(outcome) => (
            StatusCode::OK,
            Json(QueryResponse {
                status: "success",
                response: outcome.response,
                trace: outcome.trace,
            }),
        )
            .into_response(),
        Err(e) => {
            tracing::error!("Query invocation failed: {}", e);
            (graph_error_status(&e), Json(ErrorResponse::new(e.to_string()))).into_response()
        }
    }
}

/// Query string for `GET /api/tree`
#[derive(Debug, Deserialize)]
pub struct TreeParams {
    pub repo_url: Option<String>,
}

/// `GET /api/tree` — repository-ingestion passthrough.
async fn handle_tree(
    State(state): State<Arc<AppState>>,
    Query(params): Query<TreeParams>,
) -> Response {
    let repo_url = match params.repo_url.as_deref() {
        Some(url) if !url.trim().is_empty() => url.to_string(),
        _ => {
            return (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse::new("Missing 'repo_url' parameter")),
            )
                .into_response();
        }
    };

    match state.ingest.fetch_tree(&repo_url).await {
        Ok(tree) => (
            StatusCode::OK,
            Json(serde_json::json!({ "tree": tree.tree })),
        )
            .into_response(),
        Err(e) => {
            tracing::error!("Tree fetch failed: {:#}", e);
            (
                StatusCode::BAD_GATEWAY,
                Json(ErrorResponse::new(e.to_string())),
            )
                .into_response()
        }
    }
}

/// Body for `POST /api/summary`
#[derive(Debug, Deserialize)]
pub struct SummaryRequest {
    pub file_name: String,
    pub code: String,
}

/// `POST /api/summary` — single-shot ≤100-word file summary.
async fn handle_summary(
    State(state): State<Arc<AppState>>,
    Json(request): Json<SummaryRequest>,
) -> Response {
    if request.code.trim().is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::new("'code' must not be empty")),
        )
            .into_response();
    }

    let prompt = prompts::compose_summary(&request.file_name, &request.code)
        .with_max_tokens(state.summary_max_tokens);

    match state.provider.send_message(&prompt).await {
        Ok(response) => (
            StatusCode::OK,
            Json(serde_json::json!({ "summary": response.text() })),
        )
            .into_response(),
        Err(e) => {
            tracing::error!("Summary generation failed: {:#}", e);
            (
                StatusCode::BAD_GATEWAY,
                Json(ErrorResponse::new(e.to_string())),
            )
                .into_response()
        }
    }
}
