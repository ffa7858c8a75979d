//! Gesso Core Library
//!
//! Turns free-form Portuguese messages about a small contracting business's
//! money into typed financial events:
//! - Segmenter that cuts a message into one span per event
//! - Lexicon of verbs, phrases and tag taxonomies
//! - Rule-based span classifier with attribute extractors
//! - Fallback to a local semantic-extraction service (Ollama, OpenAI-compatible)
//! - Reconciler merging split tag/amount pairs
//! - Prompt library for customizable AI prompts
//! - Ledger persistence with one sheet per event kind

pub mod ai;
pub mod classify;
pub mod config;
pub mod engine;
pub mod error;
pub mod extract;
pub mod fallback;
pub mod ledger;
pub mod lexicon;
pub mod models;
pub mod prompts;
pub mod reconcile;
pub mod segment;

/// Test utilities including mock Ollama server
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use ai::{AIBackend, AIClient, ExtractedEvent, MockBackend, OllamaBackend, OpenAICompatibleBackend};
pub use classify::SpanClassifier;
pub use config::{AiConfig, BackendKind, Config, LedgerConfig};
pub use engine::{Engine, RuleClassification};
pub use error::{Error, Result};
pub use fallback::{FallbackOrchestrator, FallbackOutcome};
pub use ledger::{record_events, CsvLedger, LedgerRow, LedgerSheet, LedgerStore, RecordSummary};
pub use lexicon::{Lexicon, TagTaxonomy};
pub use models::{EventKind, EventSpan, FinancialEvent, Origin, RawMessage};
pub use prompts::{Prompt, PromptId, PromptInfo, PromptLibrary};
pub use reconcile::reconcile;
pub use segment::Segmenter;
