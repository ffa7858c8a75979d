//! Domain models for Gesso

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

/// An incoming message, exactly as the user typed it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawMessage {
    pub text: String,
    pub received_at: DateTime<Local>,
    /// Sender identity as reported by the front end (not interpreted here)
    pub sender: Option<String>,
}

impl RawMessage {
    /// Create a message received now
    pub fn new(text: impl Into<String>) -> Self {
        Self::at(text, Local::now())
    }

    /// Create a message with an explicit arrival time
    pub fn at(text: impl Into<String>, received_at: DateTime<Local>) -> Self {
        Self {
            text: text.into(),
            received_at,
            sender: None,
        }
    }

    pub fn with_sender(mut self, sender: impl Into<String>) -> Self {
        self.sender = Some(sender.into());
        self
    }
}

/// A trimmed fragment of a message believed to describe one event
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventSpan {
    /// Ordinal position of the span in its message (0-based)
    pub index: usize,
    pub text: String,
}

/// Kind of financial event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    /// Money received
    Receita,
    /// Business expense (labor, material, tools, transport, taxes)
    DespesaServico,
    /// Personal expense
    DespesaPessoal,
    /// Expense that could not be attributed to business or personal
    Despesa,
    /// Not recognized as financial
    NaoClassificado,
}

impl EventKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Receita => "receita",
            Self::DespesaServico => "despesa_servico",
            Self::DespesaPessoal => "despesa_pessoal",
            Self::Despesa => "despesa",
            Self::NaoClassificado => "nao_classificado",
        }
    }

    /// Human-readable label used in confirmations
    pub fn label(&self) -> &'static str {
        match self {
            Self::Receita => "Receita",
            Self::DespesaServico => "Despesa de Serviço",
            Self::DespesaPessoal => "Despesa Pessoal",
            Self::Despesa => "Despesa (sem categoria)",
            Self::NaoClassificado => "Não classificado",
        }
    }

    /// Any of the three expense kinds
    pub fn is_expense(&self) -> bool {
        matches!(
            self,
            Self::DespesaServico | Self::DespesaPessoal | Self::Despesa
        )
    }

    /// Taxonomy the event's tags must come from, if the kind carries tags at all
    pub fn taxonomy(&self) -> Option<TaxonomyKind> {
        match self {
            Self::DespesaServico => Some(TaxonomyKind::Business),
            Self::DespesaPessoal => Some(TaxonomyKind::Personal),
            _ => None,
        }
    }

    pub fn all() -> &'static [EventKind] {
        &[
            Self::Receita,
            Self::DespesaServico,
            Self::DespesaPessoal,
            Self::Despesa,
            Self::NaoClassificado,
        ]
    }
}

impl std::str::FromStr for EventKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "receita" => Ok(Self::Receita),
            "despesa_servico" | "despesa_serviço" => Ok(Self::DespesaServico),
            "despesa_pessoal" => Ok(Self::DespesaPessoal),
            "despesa" => Ok(Self::Despesa),
            "nao_classificado" | "não_classificado" => Ok(Self::NaoClassificado),
            _ => Err(format!("Unknown event kind: {}", s)),
        }
    }
}

impl std::fmt::Display for EventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Which tag taxonomy a tag belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaxonomyKind {
    Business,
    Personal,
}

/// Business-vs-personal framing inferred from context phrases
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExpenseContext {
    Servico,
    Pessoal,
}

/// Provenance of an event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Origin {
    #[default]
    RuleEngine,
    ExternalService,
}

impl Origin {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::RuleEngine => "rule_engine",
            Self::ExternalService => "external_service",
        }
    }
}

impl std::fmt::Display for Origin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One classified financial event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinancialEvent {
    pub kind: EventKind,
    /// Numeric literal as written in the message ("2.500", "17")
    pub amount: Option<String>,
    /// Who paid, for revenue events
    pub counterparty: Option<String>,
    pub tags: Vec<String>,
    pub weekdays: Vec<String>,
    pub description: String,
    /// Set when the event needs manual review
    pub advisory: Option<String>,
    pub origin: Origin,
}

impl FinancialEvent {
    /// Create an event of the given kind with no attributes
    pub fn new(kind: EventKind, description: impl Into<String>) -> Self {
        Self {
            kind,
            amount: None,
            counterparty: None,
            tags: Vec::new(),
            weekdays: Vec::new(),
            description: description.into(),
            advisory: None,
            origin: Origin::RuleEngine,
        }
    }

    pub fn with_amount(mut self, amount: impl Into<String>) -> Self {
        self.amount = Some(amount.into());
        self
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_advisory(mut self, advisory: impl Into<String>) -> Self {
        self.advisory = Some(advisory.into());
        self
    }

    /// Whether the rule-based result is too weak to trust without the
    /// semantic-extraction service.
    ///
    /// Generic expenses and unrecognized spans are always inconclusive;
    /// business/personal expenses are inconclusive when they have neither a
    /// tag nor an amount.
    pub fn is_inconclusive(&self) -> bool {
        match self.kind {
            EventKind::Despesa | EventKind::NaoClassificado => true,
            EventKind::DespesaServico | EventKind::DespesaPessoal => {
                self.tags.is_empty() && self.amount.is_none()
            }
            EventKind::Receita => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_kind_round_trip_names() {
        for kind in EventKind::all() {
            assert_eq!(kind.as_str().parse::<EventKind>().unwrap(), *kind);
        }
        assert!("lucro".parse::<EventKind>().is_err());
    }

    #[test]
    fn test_event_kind_serde_names() {
        let json = serde_json::to_string(&EventKind::DespesaServico).unwrap();
        assert_eq!(json, "\"despesa_servico\"");
        let json = serde_json::to_string(&Origin::ExternalService).unwrap();
        assert_eq!(json, "\"external_service\"");
    }

    #[test]
    fn test_taxonomy_per_kind() {
        assert_eq!(
            EventKind::DespesaServico.taxonomy(),
            Some(TaxonomyKind::Business)
        );
        assert_eq!(
            EventKind::DespesaPessoal.taxonomy(),
            Some(TaxonomyKind::Personal)
        );
        assert_eq!(EventKind::Receita.taxonomy(), None);
        assert_eq!(EventKind::Despesa.taxonomy(), None);
    }

    #[test]
    fn test_inconclusive_rules() {
        assert!(FinancialEvent::new(EventKind::Despesa, "x")
            .with_amount("500")
            .is_inconclusive());
        assert!(FinancialEvent::new(EventKind::NaoClassificado, "x").is_inconclusive());
        assert!(FinancialEvent::new(EventKind::DespesaPessoal, "x").is_inconclusive());
        assert!(!FinancialEvent::new(EventKind::DespesaPessoal, "x")
            .with_tags(["lazer"])
            .is_inconclusive());
        assert!(!FinancialEvent::new(EventKind::DespesaServico, "x")
            .with_amount("80")
            .is_inconclusive());
        assert!(!FinancialEvent::new(EventKind::Receita, "x").is_inconclusive());
    }
}
