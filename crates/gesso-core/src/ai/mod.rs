//! Pluggable local AI backend abstraction
//!
//! The rule engine asks a semantic-extraction service to re-read the spans it
//! could not classify. This module provides that service behind a
//! backend-agnostic interface. All backends run locally.
//!
//! # Architecture
//!
//! - `AIBackend` trait: defines the interface for all AI operations
//! - `AIClient` enum: concrete wrapper providing Clone + compile-time dispatch
//! - Backend implementations: `OllamaBackend`, `OpenAICompatibleBackend`, `MockBackend`
//!
//! # Usage
//!
//! ```rust,ignore
//! let ai = AIClient::from_env();
//! let engine = Engine::portuguese()?;
//! let events = engine.classify(&RawMessage::new("Paguei 500 hoje."), ai.as_ref()).await;
//! ```
//!
//! # Configuration
//!
//! Environment variables:
//! - `AI_BACKEND`: Backend to use (ollama, openai_compatible, mock, none). Default: ollama
//! - `OLLAMA_HOST`: Ollama server URL (required for ollama backend)
//! - `OLLAMA_MODEL`: Default model name (default: llama3.2)
//! - `OPENAI_COMPATIBLE_HOST`: Server URL (required for openai_compatible backend)
//! - `OPENAI_COMPATIBLE_MODEL`: Model name (default: gpt-3.5-turbo)
//! - `OPENAI_COMPATIBLE_API_KEY`: API key if required (optional)

mod mock;
mod ollama;
mod openai_compatible;
pub mod parsing;
pub mod types;

pub use mock::{ExtractionRequest, MockBackend};
pub use ollama::OllamaBackend;
pub use openai_compatible::OpenAICompatibleBackend;
pub use types::*;

use std::collections::HashMap;
use std::sync::RwLock;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;

use crate::config::{AiConfig, BackendKind};
use crate::error::{Error, Result};
use crate::prompts::{PromptId, PromptLibrary};

/// Request timeout when none is configured
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

pub const DEFAULT_OLLAMA_MODEL: &str = "llama3.2";
pub const DEFAULT_OPENAI_COMPATIBLE_MODEL: &str = "gpt-3.5-turbo";

/// Trait defining the interface for all AI backends
///
/// Backends should be Send + Sync to allow use across async tasks.
#[async_trait]
pub trait AIBackend: Send + Sync {
    /// Re-read `message` and return every financial event it describes.
    ///
    /// `flagged_spans` are the fragments the rule engine found inconclusive,
    /// in message order. Returned events should follow that order.
    async fn extract_events(
        &self,
        message: &str,
        flagged_spans: &[String],
    ) -> Result<Vec<ExtractedEvent>>;

    /// Check if the backend is available
    async fn health_check(&self) -> bool;

    /// Get the model name (for logging)
    fn model(&self) -> &str;

    /// Get the host URL (for logging)
    fn host(&self) -> &str;
}

/// Concrete AI client enum
///
/// Provides Clone and compile-time dispatch without Box<dyn> overhead.
#[derive(Clone)]
pub enum AIClient {
    /// Ollama backend (HTTP API)
    Ollama(OllamaBackend),
    /// OpenAI-compatible backend (Docker Model Runner, vLLM, LocalAI, llama-server, etc.)
    OpenAICompatible(OpenAICompatibleBackend),
    /// Mock backend for testing
    Mock(MockBackend),
}

impl AIClient {
    /// Create an AI client from environment variables
    ///
    /// Returns None when `AI_BACKEND=none` or when the selected backend has
    /// no host configured.
    pub fn from_env() -> Option<Self> {
        let mut config = AiConfig::default();
        config.apply_env();
        Self::from_config(&config)
    }

    /// Create an AI client from resolved configuration
    pub fn from_config(config: &AiConfig) -> Option<Self> {
        let timeout = Duration::from_secs(config.timeout_secs);
        match config.backend {
            BackendKind::None => None,
            BackendKind::Mock => Some(AIClient::mock()),
            BackendKind::Ollama => {
                let host = config.host.as_deref()?;
                let model = config.model.as_deref().unwrap_or(DEFAULT_OLLAMA_MODEL);
                Some(AIClient::Ollama(OllamaBackend::with_timeout(
                    host, model, timeout,
                )))
            }
            BackendKind::OpenAICompatible => {
                let host = config.host.as_deref()?;
                let model = config
                    .model
                    .as_deref()
                    .unwrap_or(DEFAULT_OPENAI_COMPATIBLE_MODEL);
                let mut backend = OpenAICompatibleBackend::with_timeout(host, model, timeout);
                if let Some(key) = config.api_key.as_deref() {
                    backend = backend.with_api_key(key);
                }
                Some(AIClient::OpenAICompatible(backend))
            }
        }
    }

    /// Create an Ollama backend directly
    pub fn ollama(host: &str, model: &str) -> Self {
        AIClient::Ollama(OllamaBackend::new(host, model))
    }

    /// Create a mock backend for testing
    pub fn mock() -> Self {
        AIClient::Mock(MockBackend::new())
    }

    /// Backend name for display
    pub fn kind(&self) -> BackendKind {
        match self {
            AIClient::Ollama(_) => BackendKind::Ollama,
            AIClient::OpenAICompatible(_) => BackendKind::OpenAICompatible,
            AIClient::Mock(_) => BackendKind::Mock,
        }
    }

    /// Create a new instance with a different model
    pub fn with_model(&self, model: &str) -> Self {
        match self {
            AIClient::Ollama(b) => AIClient::Ollama(b.with_model(model)),
            AIClient::OpenAICompatible(b) => AIClient::OpenAICompatible(b.with_model(model)),
            AIClient::Mock(b) => AIClient::Mock(b.with_model(model)),
        }
    }
}

// Implement AIBackend for AIClient by delegating to the inner backend
#[async_trait]
impl AIBackend for AIClient {
    async fn extract_events(
        &self,
        message: &str,
        flagged_spans: &[String],
    ) -> Result<Vec<ExtractedEvent>> {
        match self {
            AIClient::Ollama(b) => b.extract_events(message, flagged_spans).await,
            AIClient::OpenAICompatible(b) => b.extract_events(message, flagged_spans).await,
            AIClient::Mock(b) => b.extract_events(message, flagged_spans).await,
        }
    }

    async fn health_check(&self) -> bool {
        match self {
            AIClient::Ollama(b) => b.health_check().await,
            AIClient::OpenAICompatible(b) => b.health_check().await,
            AIClient::Mock(b) => b.health_check().await,
        }
    }

    fn model(&self) -> &str {
        match self {
            AIClient::Ollama(b) => b.model(),
            AIClient::OpenAICompatible(b) => b.model(),
            AIClient::Mock(b) => b.model(),
        }
    }

    fn host(&self) -> &str {
        match self {
            AIClient::Ollama(b) => b.host(),
            AIClient::OpenAICompatible(b) => b.host(),
            AIClient::Mock(b) => b.host(),
        }
    }
}

/// Rendered extraction prompt
#[derive(Debug, Clone)]
pub struct ExtractionPrompt {
    pub system: Option<String>,
    pub user: String,
}

/// Render the extraction prompt exactly as the backends send it
pub fn render_extraction_prompt(
    library: &mut PromptLibrary,
    message: &str,
    flagged_spans: &[String],
) -> Result<ExtractionPrompt> {
    let flagged = flagged_spans
        .iter()
        .map(|s| format!("- \"{}\"", s))
        .collect::<Vec<_>>()
        .join("\n");

    let template = library.get(PromptId::ExtractEvents)?;

    let mut vars = HashMap::new();
    vars.insert("message", message);
    vars.insert("flagged_spans", flagged.as_str());

    Ok(ExtractionPrompt {
        system: template.render_system(&vars),
        user: template.render_user(&vars),
    })
}

pub(crate) fn build_extraction_prompt(
    prompts: &RwLock<PromptLibrary>,
    message: &str,
    flagged_spans: &[String],
) -> Result<ExtractionPrompt> {
    let mut prompts = prompts
        .write()
        .map_err(|_| Error::InvalidData("Failed to acquire prompt library lock".into()))?;
    render_extraction_prompt(&mut prompts, message, flagged_spans)
}

pub(crate) fn http_client(timeout: Duration) -> Client {
    Client::builder()
        .timeout(timeout)
        .build()
        .unwrap_or_else(|_| Client::new())
}
