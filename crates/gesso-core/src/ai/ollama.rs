//! Ollama backend implementation
//!
//! HTTP client for the Ollama API. The extraction prompt comes from the
//! prompt library, so overrides apply without a rebuild.

use std::sync::{Arc, RwLock};
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};
use crate::prompts::PromptLibrary;

use super::parsing::parse_extraction;
use super::types::ExtractedEvent;
use super::{build_extraction_prompt, http_client, AIBackend, DEFAULT_OLLAMA_MODEL, DEFAULT_TIMEOUT};

/// Ollama backend
///
/// Sends one `/api/generate` request per extraction with JSON output
/// enforced through Ollama's `format` option.
#[derive(Clone)]
pub struct OllamaBackend {
    http_client: Client,
    base_url: String,
    model: String,
    timeout: Duration,
    prompts: Arc<RwLock<PromptLibrary>>,
}

impl OllamaBackend {
    /// Create a new Ollama backend
    pub fn new(base_url: &str, model: &str) -> Self {
        Self::with_timeout(base_url, model, DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(base_url: &str, model: &str, timeout: Duration) -> Self {
        Self {
            http_client: http_client(timeout),
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
            timeout,
            prompts: Arc::new(RwLock::new(PromptLibrary::new())),
        }
    }

    /// Create a new instance with a different model
    pub fn with_model(&self, model: &str) -> Self {
        Self {
            model: model.to_string(),
            ..self.clone()
        }
    }

    /// Use a specific prompt library (tests, embedded-only setups)
    pub fn with_prompts(mut self, prompts: PromptLibrary) -> Self {
        self.prompts = Arc::new(RwLock::new(prompts));
        self
    }

    /// Create from environment variables
    pub fn from_env() -> Option<Self> {
        let host = std::env::var("OLLAMA_HOST").ok()?;
        let model = std::env::var("OLLAMA_MODEL").unwrap_or_else(|_| DEFAULT_OLLAMA_MODEL.to_string());
        Some(Self::new(&host, &model))
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

/// Request to Ollama API
#[derive(Debug, Serialize)]
struct OllamaRequest {
    model: String,
    prompt: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<String>,
    format: &'static str,
    stream: bool,
}

/// Response from Ollama API
#[derive(Debug, Deserialize)]
struct OllamaResponse {
    response: String,
}

#[async_trait]
impl AIBackend for OllamaBackend {
    async fn extract_events(
        &self,
        message: &str,
        flagged_spans: &[String],
    ) -> Result<Vec<ExtractedEvent>> {
        let prompt = build_extraction_prompt(&self.prompts, message, flagged_spans)?;

        let request = OllamaRequest {
            model: self.model.clone(),
            prompt: prompt.user,
            system: prompt.system,
            format: "json",
            stream: false,
        };

        let response = self
            .http_client
            .post(format!("{}/api/generate", self.base_url))
            .json(&request)
            .send()
            .await?;

        let response = response.error_for_status().map_err(Error::Http)?;

        let ollama_response: OllamaResponse = response.json().await?;
        debug!("Ollama extraction response: {}", ollama_response.response);

        parse_extraction(&ollama_response.response)
    }

    async fn health_check(&self) -> bool {
        match self
            .http_client
            .get(format!("{}/api/tags", self.base_url))
            .send()
            .await
        {
            Ok(resp) => resp.status().is_success(),
            Err(_) => false,
        }
    }

    fn model(&self) -> &str {
        &self.model
    }

    fn host(&self) -> &str {
        &self.base_url
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{MockOllamaServer, MockResponse};

    fn backend(url: &str) -> OllamaBackend {
        OllamaBackend::new(url, "llama3.2").with_prompts(PromptLibrary::embedded_only())
    }

    #[test]
    fn test_trims_trailing_slash() {
        let backend = OllamaBackend::new("http://localhost:11434/", "llama3.2");
        assert_eq!(backend.host(), "http://localhost:11434");
        assert_eq!(backend.model(), "llama3.2");
        assert_eq!(backend.with_model("qwen2.5").model(), "qwen2.5");
    }

    #[tokio::test]
    async fn test_health_check_unreachable() {
        let backend = backend("http://127.0.0.1:1");
        assert!(!backend.health_check().await);
    }

    #[tokio::test]
    async fn test_extract_events_against_mock_server() {
        let server = MockOllamaServer::start().await;
        let backend = backend(&server.url());

        assert!(backend.health_check().await);

        let events = backend
            .extract_events("Paguei 500 hoje.", &["Paguei 500 hoje".to_string()])
            .await
            .unwrap();

        assert_eq!(events.len(), 1);
        assert_eq!(events[0].kind, "despesa_servico");
        assert_eq!(events[0].amount.as_deref(), Some("500"));
        assert_eq!(server.requests(), 1);
    }

    #[tokio::test]
    async fn test_extract_events_invalid_payload() {
        let server =
            MockOllamaServer::start_with(MockResponse::Text("não sei".to_string())).await;
        let backend = backend(&server.url());

        let result = backend
            .extract_events("oi", &["oi".to_string()])
            .await;
        assert!(matches!(result, Err(Error::InvalidData(_))));
    }

    #[tokio::test]
    async fn test_extract_events_server_error() {
        let server = MockOllamaServer::start_with(MockResponse::ServerError).await;
        let backend = backend(&server.url());

        let result = backend.extract_events("oi", &["oi".to_string()]).await;
        assert!(matches!(result, Err(Error::Http(_))));
    }
}
