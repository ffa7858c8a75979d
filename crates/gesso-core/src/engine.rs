//! End-to-end message pipeline
//!
//! segment → classify spans → fallback (only when a span is inconclusive)
//! → reconcile.

use tracing::debug;

use crate::ai::AIBackend;
use crate::classify::SpanClassifier;
use crate::error::Result;
use crate::extract::Extractors;
use crate::fallback::{inconclusive_positions, FallbackOrchestrator};
use crate::lexicon::Lexicon;
use crate::models::{EventSpan, FinancialEvent, RawMessage};
use crate::reconcile::reconcile;
use crate::segment::Segmenter;

/// Rule-only result for one message
#[derive(Debug, Clone, Default)]
pub struct RuleClassification {
    pub spans: Vec<EventSpan>,
    /// One event per span, same order
    pub events: Vec<FinancialEvent>,
    /// Positions of inconclusive events
    pub inconclusive: Vec<usize>,
}

impl RuleClassification {
    pub fn needs_fallback(&self) -> bool {
        !self.inconclusive.is_empty()
    }
}

/// Compiled classification engine
///
/// Building one compiles every pattern; reuse it across messages.
pub struct Engine {
    lexicon: Lexicon,
    extractors: Extractors,
    segmenter: Segmenter,
}

impl Engine {
    /// Engine over the built-in Portuguese lexicon
    pub fn portuguese() -> Result<Self> {
        Self::new(Lexicon::portuguese()?)
    }

    pub fn new(lexicon: Lexicon) -> Result<Self> {
        let segmenter = Segmenter::new(&lexicon)?;
        Ok(Self {
            lexicon,
            extractors: Extractors::new()?,
            segmenter,
        })
    }

    pub fn lexicon(&self) -> &Lexicon {
        &self.lexicon
    }

    pub fn segment(&self, text: &str) -> Vec<EventSpan> {
        self.segmenter.segment(text)
    }

    /// Segment and classify with rules only
    pub fn classify_rules(&self, text: &str) -> RuleClassification {
        let spans = self.segment(text);
        let classifier = SpanClassifier::new(&self.lexicon, &self.extractors);
        let events: Vec<FinancialEvent> = spans.iter().map(|s| classifier.classify(s)).collect();
        let inconclusive = inconclusive_positions(&events);

        debug!(
            spans = spans.len(),
            inconclusive = inconclusive.len(),
            "Rule classification done"
        );

        RuleClassification {
            spans,
            events,
            inconclusive,
        }
    }

    /// Full pipeline. `backend` is consulted at most once, and only when a
    /// span is inconclusive.
    pub async fn classify<B: AIBackend + ?Sized>(
        &self,
        message: &RawMessage,
        backend: Option<&B>,
    ) -> Vec<FinancialEvent> {
        let rules = self.classify_rules(&message.text);

        let events = match backend {
            Some(backend) if rules.needs_fallback() => {
                FallbackOrchestrator::new(&self.lexicon)
                    .resolve(backend, &message.text, &rules.spans, rules.events)
                    .await
            }
            _ => rules.events,
        };

        reconcile(events)
    }

    /// Full pipeline without a semantic-extraction service
    pub fn classify_offline(&self, message: &RawMessage) -> Vec<FinancialEvent> {
        reconcile(self.classify_rules(&message.text).events)
    }
}
