//! Post-classification merging
//!
//! Messages often name what was bought in one span and how much was paid in
//! the next ("Fui no mercado. Gastei 700 lá"). The reconciler folds such
//! pairs into a single event.

use crate::models::{EventKind, FinancialEvent, Origin};

/// Single left-to-right pass merging tagged-but-unpriced expenses with the
/// priced-but-untagged expense that follows them
pub fn reconcile(events: Vec<FinancialEvent>) -> Vec<FinancialEvent> {
    let mut out = Vec::with_capacity(events.len());
    let mut iter = events.into_iter().peekable();

    while let Some(current) = iter.next() {
        let pairable = iter
            .peek()
            .is_some_and(|next| needs_amount(&current) && supplies_amount(next));
        match iter.next_if(|_| pairable) {
            Some(next) => out.push(merge(current, next)),
            None => out.push(current),
        }
    }
    out
}

fn needs_amount(event: &FinancialEvent) -> bool {
    matches!(
        event.kind,
        EventKind::DespesaServico | EventKind::DespesaPessoal
    ) && !event.tags.is_empty()
        && event.amount.is_none()
}

fn supplies_amount(event: &FinancialEvent) -> bool {
    event.kind.is_expense() && event.amount.is_some() && event.tags.is_empty()
}

fn merge(tagged: FinancialEvent, priced: FinancialEvent) -> FinancialEvent {
    let origin = if tagged.origin == Origin::ExternalService
        || priced.origin == Origin::ExternalService
    {
        Origin::ExternalService
    } else {
        Origin::RuleEngine
    };

    let description = format!("{} {}", tagged.description, priced.description)
        .trim()
        .to_string();

    let mut weekdays = tagged.weekdays;
    weekdays.extend(priced.weekdays);

    FinancialEvent {
        kind: tagged.kind,
        amount: priced.amount,
        counterparty: tagged.counterparty,
        tags: tagged.tags,
        weekdays,
        description,
        advisory: None,
        origin,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::ADVISORY_UNTYPED;

    fn tagged(kind: EventKind, tag: &str, description: &str) -> FinancialEvent {
        FinancialEvent::new(kind, description).with_tags([tag])
    }

    fn priced(amount: &str, description: &str) -> FinancialEvent {
        FinancialEvent::new(EventKind::Despesa, description)
            .with_amount(amount)
            .with_advisory(ADVISORY_UNTYPED)
    }

    #[test]
    fn test_merges_tag_with_following_amount() {
        let mut first = tagged(EventKind::DespesaPessoal, "alimentacao", "Fui no mercado");
        first.weekdays = vec!["sexta".into()];
        let mut second = priced("700", "Gastei lá");
        second.weekdays = vec!["sábado".into()];

        let out = reconcile(vec![first, second]);

        assert_eq!(out.len(), 1);
        let merged = &out[0];
        assert_eq!(merged.kind, EventKind::DespesaPessoal);
        assert_eq!(merged.tags, ["alimentacao"]);
        assert_eq!(merged.amount.as_deref(), Some("700"));
        assert_eq!(merged.description, "Fui no mercado Gastei lá");
        assert_eq!(merged.weekdays, ["sexta", "sábado"]);
        assert!(merged.advisory.is_none());
        assert_eq!(merged.origin, Origin::RuleEngine);
    }

    #[test]
    fn test_origin_external_if_either_part_is() {
        let first = tagged(EventKind::DespesaServico, "material", "tinta");
        let mut second = priced("80", "paguei");
        second.origin = Origin::ExternalService;
        let out = reconcile(vec![first, second]);
        assert_eq!(out[0].origin, Origin::ExternalService);
    }

    #[test]
    fn test_no_merge_when_conditions_fail() {
        // first already priced
        let first = tagged(EventKind::DespesaServico, "material", "tinta").with_amount("50");
        let out = reconcile(vec![first, priced("80", "paguei")]);
        assert_eq!(out.len(), 2);

        // second carries tags
        let first = tagged(EventKind::DespesaServico, "material", "tinta");
        let second = tagged(EventKind::DespesaPessoal, "lazer", "cinema").with_amount("40");
        assert_eq!(reconcile(vec![first, second]).len(), 2);

        // second is revenue
        let first = tagged(EventKind::DespesaServico, "material", "tinta");
        let second = FinancialEvent::new(EventKind::Receita, "recebi").with_amount("40");
        assert_eq!(reconcile(vec![first, second]).len(), 2);

        // first untagged
        let first = FinancialEvent::new(EventKind::DespesaServico, "obra");
        assert_eq!(reconcile(vec![first, priced("40", "paguei")]).len(), 2);
    }

    #[test]
    fn test_each_event_merges_at_most_once() {
        let events = vec![
            tagged(EventKind::DespesaServico, "material", "tinta"),
            priced("80", "paguei"),
            priced("90", "paguei de novo"),
        ];
        let out = reconcile(events);
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].amount.as_deref(), Some("80"));
        assert_eq!(out[1].amount.as_deref(), Some("90"));
    }

    #[test]
    fn test_idempotent() {
        let events = vec![
            FinancialEvent::new(EventKind::Receita, "recebi da Ana").with_amount("2.500"),
            tagged(EventKind::DespesaPessoal, "alimentacao", "mercado"),
            priced("700", "gastei"),
            tagged(EventKind::DespesaServico, "material", "tinta"),
            tagged(EventKind::DespesaServico, "ferramenta", "escada"),
            priced("300", "paguei"),
            FinancialEvent::new(EventKind::NaoClassificado, "marquei visita"),
        ];
        let once = reconcile(events);
        let twice = reconcile(once.clone());
        assert_eq!(once, twice);
        assert_eq!(once.len(), 5);
    }

    #[test]
    fn test_empty() {
        assert!(reconcile(Vec::new()).is_empty());
    }
}
