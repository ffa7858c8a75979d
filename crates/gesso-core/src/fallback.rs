//! Fallback to the semantic-extraction service
//!
//! When any rule-classified span is inconclusive, the whole message is sent
//! once to an [`AIBackend`] together with the inconclusive spans. Returned
//! events replace the inconclusive ones positionally; surplus events are
//! appended. Any failure keeps the rule result untouched.

use tracing::{debug, info, warn};

use crate::ai::{AIBackend, ExtractedEvent};
use crate::lexicon::Lexicon;
use crate::models::{EventKind, EventSpan, FinancialEvent, Origin};

/// Result of asking the semantic-extraction service
#[derive(Debug, Clone, PartialEq)]
pub enum FallbackOutcome {
    /// Normalized events, in the order the service returned them
    Replacements(Vec<FinancialEvent>),
    /// Service failed or found nothing
    Unavailable,
}

pub struct FallbackOrchestrator<'a> {
    lexicon: &'a Lexicon,
}

impl<'a> FallbackOrchestrator<'a> {
    pub fn new(lexicon: &'a Lexicon) -> Self {
        Self { lexicon }
    }

    /// Replace the inconclusive events of `events` (one per span in `spans`)
    /// with what the service extracts from `message`.
    ///
    /// Makes no call when every event is conclusive, and never more than one.
    pub async fn resolve<B: AIBackend + ?Sized>(
        &self,
        backend: &B,
        message: &str,
        spans: &[EventSpan],
        events: Vec<FinancialEvent>,
    ) -> Vec<FinancialEvent> {
        let inconclusive = inconclusive_positions(&events);
        if inconclusive.is_empty() {
            return events;
        }

        let flagged: Vec<String> = inconclusive
            .iter()
            .filter_map(|&i| spans.get(i).map(|s| s.text.clone()))
            .collect();

        match self.request(backend, message, &flagged).await {
            FallbackOutcome::Replacements(replacements) => {
                apply_replacements(events, &inconclusive, replacements)
            }
            FallbackOutcome::Unavailable => events,
        }
    }

    /// Ask the service once and normalize what it returns
    pub async fn request<B: AIBackend + ?Sized>(
        &self,
        backend: &B,
        message: &str,
        flagged_spans: &[String],
    ) -> FallbackOutcome {
        info!(
            "Asking {} ({}) about {} inconclusive span(s)",
            backend.host(),
            backend.model(),
            flagged_spans.len()
        );

        match backend.extract_events(message, flagged_spans).await {
            Ok(extracted) if extracted.is_empty() => {
                warn!("Semantic extraction returned no events, keeping rule result");
                FallbackOutcome::Unavailable
            }
            Ok(extracted) => {
                debug!("Semantic extraction returned {} event(s)", extracted.len());
                FallbackOutcome::Replacements(
                    extracted.into_iter().map(|e| self.normalize(e)).collect(),
                )
            }
            Err(e) => {
                warn!("Semantic extraction failed, keeping rule result: {}", e);
                FallbackOutcome::Unavailable
            }
        }
    }

    /// Validate a wire event against the lexicon
    pub fn normalize(&self, extracted: ExtractedEvent) -> FinancialEvent {
        let kind = extracted.kind.parse().unwrap_or_else(|_| {
            debug!("Unknown event kind '{}' from service", extracted.kind);
            EventKind::NaoClassificado
        });

        let tags = match kind.taxonomy() {
            Some(taxonomy) => {
                let taxonomy = self.lexicon.taxonomy(taxonomy);
                let mut tags: Vec<String> = Vec::new();
                for tag in extracted.tags {
                    let tag = tag.trim().to_lowercase();
                    if taxonomy.contains(&tag) && !tags.contains(&tag) {
                        tags.push(tag);
                    }
                }
                tags
            }
            None => Vec::new(),
        };

        FinancialEvent {
            kind,
            amount: non_empty(extracted.amount),
            counterparty: non_empty(extracted.counterparty),
            tags,
            weekdays: extracted
                .weekdays
                .iter()
                .map(|d| d.trim().to_lowercase())
                .filter(|d| !d.is_empty())
                .collect(),
            description: extracted.description.unwrap_or_default().trim().to_string(),
            advisory: non_empty(extracted.advisory),
            origin: Origin::ExternalService,
        }
    }
}

/// Positions of inconclusive events, in order
pub fn inconclusive_positions(events: &[FinancialEvent]) -> Vec<usize> {
    events
        .iter()
        .enumerate()
        .filter(|(_, e)| e.is_inconclusive())
        .map(|(i, _)| i)
        .collect()
}

/// Pair replacements with inconclusive positions in order. Unpaired
/// inconclusive events stay; surplus replacements go to the end.
pub fn apply_replacements(
    mut events: Vec<FinancialEvent>,
    inconclusive: &[usize],
    replacements: Vec<FinancialEvent>,
) -> Vec<FinancialEvent> {
    let mut replacements = replacements.into_iter();

    for &position in inconclusive {
        let Some(replacement) = replacements.next() else {
            break;
        };
        if let Some(slot) = events.get_mut(position) {
            *slot = replacement;
        }
    }

    events.extend(replacements);
    events
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
