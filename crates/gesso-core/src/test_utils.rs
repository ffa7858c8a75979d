//! Test utilities for gesso-core
//!
//! A mock LLM server speaking both the Ollama and the OpenAI-compatible
//! protocol, for backend and integration tests.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use axum::{
    extract::{Json, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::sync::oneshot;

/// Extraction payload served by default: one business expense
pub const DEFAULT_EXTRACTION: &str = r#"{"eventos":[{"tipo":"despesa_servico","dados":{"valor":"500","descricao":"Paguei","tags":["funcionario"]}}]}"#;

/// What the extraction endpoints answer with
#[derive(Debug, Clone, Default)]
pub enum MockResponse {
    /// [`DEFAULT_EXTRACTION`]
    #[default]
    Events,
    /// Arbitrary model text
    Text(String),
    /// HTTP 500
    ServerError,
}

#[derive(Clone)]
struct MockState {
    response: MockResponse,
    requests: Arc<AtomicUsize>,
}

impl MockState {
    fn next(&self) -> Option<String> {
        self.requests.fetch_add(1, Ordering::SeqCst);
        match &self.response {
            MockResponse::Events => Some(DEFAULT_EXTRACTION.to_string()),
            MockResponse::Text(text) => Some(text.clone()),
            MockResponse::ServerError => None,
        }
    }
}

/// Mock Ollama / OpenAI-compatible server
pub struct MockOllamaServer {
    addr: SocketAddr,
    requests: Arc<AtomicUsize>,
    shutdown_tx: Option<oneshot::Sender<()>>,
}

impl MockOllamaServer {
    /// Start the mock server on an available port
    pub async fn start() -> Self {
        Self::start_with(MockResponse::default()).await
    }

    pub async fn start_with(response: MockResponse) -> Self {
        let requests = Arc::new(AtomicUsize::new(0));
        let state = MockState {
            response,
            requests: requests.clone(),
        };

        let app = Router::new()
            .route("/api/tags", get(handle_tags))
            .route("/api/generate", post(handle_generate))
            .route("/v1/models", get(handle_models))
            .route("/v1/chat/completions", post(handle_chat))
            .route("/health", get(|| async { "ok" }))
            .with_state(state);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let (shutdown_tx, shutdown_rx) = oneshot::channel();

        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    shutdown_rx.await.ok();
                })
                .await
                .unwrap();
        });

        Self {
            addr,
            requests,
            shutdown_tx: Some(shutdown_tx),
        }
    }

    /// Get the base URL for this mock server
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Number of extraction requests served (health checks excluded)
    pub fn requests(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }

    /// Stop the mock server
    pub fn stop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

impl Drop for MockOllamaServer {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Ollama tags endpoint (health check)
async fn handle_tags() -> Json<TagsResponse> {
    Json(TagsResponse {
        models: vec![ModelInfo {
            name: "llama3.2:latest".to_string(),
            modified_at: "2024-01-01T00:00:00Z".to_string(),
            size: 4_000_000_000,
        }],
    })
}

/// OpenAI models endpoint (health check)
async fn handle_models() -> Json<Value> {
    Json(json!({
        "object": "list",
        "data": [{"id": "llama3.2", "object": "model"}]
    }))
}

async fn handle_generate(
    State(state): State<MockState>,
    Json(request): Json<GenerateRequest>,
) -> Response {
    match state.next() {
        Some(response) => Json(GenerateResponse {
            model: request.model,
            response,
            done: true,
        })
        .into_response(),
        None => (StatusCode::INTERNAL_SERVER_ERROR, "model crashed").into_response(),
    }
}

async fn handle_chat(State(state): State<MockState>, Json(request): Json<Value>) -> Response {
    match state.next() {
        Some(content) => Json(json!({
            "model": request["model"],
            "choices": [{
                "index": 0,
                "message": {"role": "assistant", "content": content},
                "finish_reason": "stop"
            }]
        }))
        .into_response(),
        None => (StatusCode::INTERNAL_SERVER_ERROR, "model crashed").into_response(),
    }
}

// Request/Response types for the mock server

#[derive(Debug, Serialize)]
struct TagsResponse {
    models: Vec<ModelInfo>,
}

#[derive(Debug, Serialize)]
struct ModelInfo {
    name: String,
    modified_at: String,
    size: u64,
}

#[derive(Debug, Deserialize)]
struct GenerateRequest {
    model: String,
    #[allow(dead_code)]
    prompt: String,
}

#[derive(Debug, Serialize)]
struct GenerateResponse {
    model: String,
    response: String,
    done: bool,
}
