//! Rule-based span classification
//!
//! Every span becomes exactly one [`FinancialEvent`]. Revenue phrases are
//! checked before expense phrases; expenses are refined through the business
//! taxonomy, then the personal one, then context phrases.

use tracing::debug;

use crate::extract::Extractors;
use crate::lexicon::Lexicon;
use crate::models::{EventKind, EventSpan, ExpenseContext, FinancialEvent, TaxonomyKind};

/// Advisory for an expense framed by context but matching no tag
pub const ADVISORY_UNTAGGED: &str = "Tag não identificada — revise manualmente";
/// Advisory for an expense with neither taxonomy nor context
pub const ADVISORY_UNTYPED: &str = "Tipo e tag não identificados — revise manualmente";

pub struct SpanClassifier<'a> {
    lexicon: &'a Lexicon,
    extractors: &'a Extractors,
}

impl<'a> SpanClassifier<'a> {
    pub fn new(lexicon: &'a Lexicon, extractors: &'a Extractors) -> Self {
        Self {
            lexicon,
            extractors,
        }
    }

    pub fn classify(&self, span: &EventSpan) -> FinancialEvent {
        let lower = span.text.to_lowercase();

        let event = if self.lexicon.signals_revenue(&lower) {
            self.revenue(&span.text)
        } else if self.lexicon.signals_expense(&lower) {
            self.expense(&span.text, &lower)
        } else {
            FinancialEvent::new(EventKind::NaoClassificado, span.text.clone())
        };

        debug!(
            index = span.index,
            kind = %event.kind,
            tags = ?event.tags,
            amount = ?event.amount,
            "Classified span"
        );
        event
    }

    fn revenue(&self, text: &str) -> FinancialEvent {
        let mut event = self.base(EventKind::Receita, text);
        event.counterparty = self.extractors.counterparty(text);
        event
    }

    fn expense(&self, text: &str, lower: &str) -> FinancialEvent {
        for taxonomy in [TaxonomyKind::Business, TaxonomyKind::Personal] {
            let tags = self.lexicon.taxonomy(taxonomy).match_tags(lower);
            if !tags.is_empty() {
                let kind = match taxonomy {
                    TaxonomyKind::Business => EventKind::DespesaServico,
                    TaxonomyKind::Personal => EventKind::DespesaPessoal,
                };
                return self.base(kind, text).with_tags(tags);
            }
        }

        match self.lexicon.infer_context(lower) {
            Some(ExpenseContext::Servico) => self
                .base(EventKind::DespesaServico, text)
                .with_advisory(ADVISORY_UNTAGGED),
            Some(ExpenseContext::Pessoal) => self
                .base(EventKind::DespesaPessoal, text)
                .with_advisory(ADVISORY_UNTAGGED),
            None => self
                .base(EventKind::Despesa, text)
                .with_advisory(ADVISORY_UNTYPED),
        }
    }

    fn base(&self, kind: EventKind, text: &str) -> FinancialEvent {
        let mut event = FinancialEvent::new(kind, self.extractors.description(text));
        event.amount = self.extractors.amount(text);
        event.weekdays = self.extractors.weekdays(text);
        event
    }
}
