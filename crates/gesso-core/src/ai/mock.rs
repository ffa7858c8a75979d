//! Mock backend for testing
//!
//! Returns canned extraction results without a running LLM server. Records
//! how often it was called and what the last call sent.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::error::{Error, Result};

use super::parsing::parse_extraction;
use super::types::ExtractedEvent;
use super::AIBackend;

#[derive(Clone, Debug)]
enum Canned {
    Events(Vec<ExtractedEvent>),
    /// Raw model text, run through the same parser as real backends
    Raw(String),
    Failure(String),
}

/// Mock AI backend for testing
///
/// Clones share the call counter and the request log, so a test can hand a clone to the engine
/// and inspect the original afterwards.
#[derive(Clone, Debug)]
pub struct MockBackend {
    /// Whether health_check should return true
    pub healthy: bool,
    model: String,
    canned: Canned,
    calls: Arc<AtomicUsize>,
    last_request: Arc<Mutex<Option<ExtractionRequest>>>,
}

/// Arguments of one `extract_events` call
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExtractionRequest {
    pub message: String,
    pub flagged_spans: Vec<String>,
}

impl Default for MockBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl MockBackend {
    /// Healthy mock that finds no events
    pub fn new() -> Self {
        Self {
            healthy: true,
            model: "mock".to_string(),
            canned: Canned::Events(Vec::new()),
            calls: Arc::new(AtomicUsize::new(0)),
            last_request: Arc::new(Mutex::new(None)),
        }
    }

    pub fn unhealthy() -> Self {
        Self {
            healthy: false,
            ..Self::new()
        }
    }

    /// Mock that answers every extraction with `events`
    pub fn with_events(events: Vec<ExtractedEvent>) -> Self {
        Self {
            canned: Canned::Events(events),
            ..Self::new()
        }
    }

    /// Mock that answers with raw model output
    pub fn with_raw_response(raw: impl Into<String>) -> Self {
        Self {
            canned: Canned::Raw(raw.into()),
            ..Self::new()
        }
    }

    /// Mock whose extraction always fails
    pub fn failing(reason: impl Into<String>) -> Self {
        Self {
            canned: Canned::Failure(reason.into()),
            ..Self::new()
        }
    }

    /// Create a new instance with a different model name
    pub fn with_model(&self, model: &str) -> Self {
        Self {
            model: model.to_string(),
            ..self.clone()
        }
    }

    /// Number of extraction calls made so far (shared by clones)
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Message and flagged spans of the most recent extraction call
    pub fn last_request(&self) -> Option<ExtractionRequest> {
        self.last_request
            .lock()
            .ok()
            .and_then(|guard| guard.clone())
    }
}

#[async_trait]
impl AIBackend for MockBackend {
    async fn extract_events(
        &self,
        message: &str,
        flagged_spans: &[String],
    ) -> Result<Vec<ExtractedEvent>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut last) = self.last_request.lock() {
            *last = Some(ExtractionRequest {
                message: message.to_string(),
                flagged_spans: flagged_spans.to_vec(),
            });
        }
        match &self.canned {
            Canned::Events(events) => Ok(events.clone()),
            Canned::Raw(raw) => parse_extraction(raw),
            Canned::Failure(reason) => Err(Error::InvalidData(reason.clone())),
        }
    }

    async fn health_check(&self) -> bool {
        self.healthy
    }

    fn model(&self) -> &str {
        &self.model
    }

    fn host(&self) -> &str {
        "mock://localhost"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_canned_events() {
        let mock = MockBackend::with_events(vec![ExtractedEvent::new("receita").with_amount("10")]);
        let events = mock.extract_events("x", &[]).await.unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].amount.as_deref(), Some("10"));
    }

    #[tokio::test]
    async fn test_mock_raw_response_is_parsed() {
        let mock = MockBackend::with_raw_response(r#"{"eventos": [{"tipo": "despesa"}]}"#);
        let events = mock.extract_events("x", &[]).await.unwrap();
        assert_eq!(events[0].kind, "despesa");
    }

    #[tokio::test]
    async fn test_mock_failure() {
        let mock = MockBackend::failing("boom");
        assert!(mock.extract_events("x", &[]).await.is_err());
    }

    #[tokio::test]
    async fn test_call_counter_shared_by_clones() {
        let mock = MockBackend::new();
        let clone = mock.clone();
        clone.extract_events("x", &[]).await.unwrap();
        clone.extract_events("y", &[]).await.unwrap();
        assert_eq!(mock.calls(), 2);
        assert_eq!(mock.last_request().unwrap().message, "y");
    }

    #[tokio::test]
    async fn test_records_last_request() {
        let mock = MockBackend::new();
        assert!(mock.last_request().is_none());

        let flagged = vec!["Paguei 500 hoje".to_string()];
        mock.extract_events("Paguei 500 hoje.", &flagged).await.unwrap();
        assert_eq!(
            mock.last_request(),
            Some(ExtractionRequest {
                message: "Paguei 500 hoje.".to_string(),
                flagged_spans: flagged,
            })
        );
    }

    #[tokio::test]
    async fn test_mock_health_check() {
        assert!(MockBackend::new().health_check().await);
        assert!(!MockBackend::unhealthy().health_check().await);
    }
}
