//! Attribute extractors: amount, weekdays, counterparty and description
//!
//! All extractors are pure functions of the span text. Misses are `None`
//! (or an empty list), never errors.

use regex::Regex;

use crate::error::Result;

const NAME_INITIAL: &str = "A-ZÁÉÍÓÚÂÊÔÃÕÇ";
const NAME_TAIL: &str = "A-Za-záéíóúâêôãõç";

/// Regexes compiled once and reused for every span
#[derive(Debug)]
pub struct Extractors {
    /// Amount patterns in priority order
    amounts: Vec<Regex>,
    weekday: Regex,
    counterparty: Vec<Regex>,
    number_token: Regex,
    currency_unit: Regex,
    whitespace: Regex,
}

impl Extractors {
    pub fn new() -> Result<Self> {
        let amounts = [
            // 2.500 / 2.500,50
            r"\b(\d{1,3}(?:\.\d{3})+(?:,\d+)?)\b",
            // 2,500 / 2,500.50
            r"\b(\d{1,3}(?:,\d{3})+(?:\.\d+)?)\b",
            r"\b(\d{4,})\b",
            r"\b(\d{2,})\b",
        ]
        .iter()
        .map(|p| Regex::new(p))
        .collect::<std::result::Result<Vec<_>, _>>()?;

        let counterparty = [
            format!(
                r"(?i)(?:recebi|recebemos|recebeu).*?\b(?:da|do)\s+(?:empresa\s+)?([{NAME_INITIAL}][{NAME_TAIL}]{{2,}})"
            ),
            format!(
                r"(?i)\b([{NAME_INITIAL}][{NAME_TAIL}]{{2,}})\s+(?:me\s+)?(?:pagou|transferiu|depositou|mandou|enviou|passou|acertou)\b"
            ),
            format!(
                r"(?i)\b(?:da|do)\s+(?:empresa\s+)?([{NAME_INITIAL}][{NAME_TAIL}]{{2,}})"
            ),
        ]
        .iter()
        .map(|p| Regex::new(p))
        .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(Self {
            amounts,
            weekday: Regex::new(
                r"\b(segunda|terça|terca|quarta|quinta|sexta|sábado|sabado|domingo)\b",
            )?,
            counterparty,
            number_token: Regex::new(r"\b\d[\d.,]*\b")?,
            currency_unit: Regex::new(r"(?i)\b(?:reais|real|contos?|pilas?)\b|\br\$|\$")?,
            whitespace: Regex::new(r"\s+")?,
        })
    }

    /// First monetary amount, verbatim as written.
    ///
    /// Patterns are tried in priority order; the first pattern with any match
    /// wins, and within it the leftmost occurrence.
    pub fn amount(&self, span: &str) -> Option<String> {
        self.amounts
            .iter()
            .find_map(|re| re.captures(span))
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().to_string())
    }

    /// Every weekday mention, in order, duplicates kept
    pub fn weekdays(&self, span: &str) -> Vec<String> {
        let lower = span.to_lowercase();
        self.weekday
            .captures_iter(&lower)
            .filter_map(|caps| caps.get(1))
            .map(|m| canonical_weekday(m.as_str()).to_string())
            .collect()
    }

    /// Name of whoever paid, for revenue spans
    pub fn counterparty(&self, span: &str) -> Option<String> {
        self.counterparty.iter().find_map(|re| {
            re.captures(span)
                .and_then(|caps| caps.get(1))
                .map(|m| m.as_str().to_string())
        })
    }

    /// The span with numbers and currency words removed
    pub fn description(&self, span: &str) -> String {
        let stripped = self.number_token.replace_all(span, "");
        let stripped = self.currency_unit.replace_all(&stripped, "");
        let collapsed = self.whitespace.replace_all(&stripped, " ");
        let cleaned = collapsed.trim();
        if cleaned.is_empty() {
            span.trim().to_string()
        } else {
            cleaned.to_string()
        }
    }
}

fn canonical_weekday(day: &str) -> &str {
    match day {
        "terca" => "terça",
        "sabado" => "sábado",
        other => other,
    }
}
