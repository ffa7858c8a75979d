//! Vocabulary and tag matching
//!
//! A [`Lexicon`] bundles everything the rule engine knows about the language
//! of the messages: phrases that signal revenue or expense, the verbs that
//! open a new event, the two tag taxonomies, and the context phrases used
//! when an expense matches no tag.

mod vocabulary;

use regex::Regex;

use crate::error::Result;
use crate::models::{ExpenseContext, TaxonomyKind};

/// One phrase that makes a tag fire
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchRule {
    /// Lowercase phrase
    pub phrase: String,
    /// Match only as a whole word/phrase instead of as a substring
    pub word_boundary: bool,
}

impl MatchRule {
    pub fn new(phrase: impl Into<String>, word_boundary: bool) -> Self {
        Self {
            phrase: phrase.into().to_lowercase(),
            word_boundary,
        }
    }
}

#[derive(Debug)]
struct CompiledTag {
    name: String,
    /// Every boundary rule of the tag folded into one alternation
    bounded: Option<Regex>,
    substrings: Vec<String>,
}

impl CompiledTag {
    fn compile(name: &str, rules: &[MatchRule]) -> Result<Self> {
        let bounded: Vec<String> = rules
            .iter()
            .filter(|r| r.word_boundary)
            .map(|r| regex::escape(&r.phrase))
            .collect();
        let bounded = if bounded.is_empty() {
            None
        } else {
            Some(Regex::new(&format!(r"\b(?:{})\b", bounded.join("|")))?)
        };

        Ok(Self {
            name: name.to_string(),
            bounded,
            substrings: rules
                .iter()
                .filter(|r| !r.word_boundary)
                .map(|r| r.phrase.clone())
                .collect(),
        })
    }

    fn fires(&self, lower: &str) -> bool {
        self.bounded.as_ref().is_some_and(|re| re.is_match(lower))
            || self.substrings.iter().any(|p| lower.contains(p.as_str()))
    }
}

/// Named tags of one taxonomy, each with its match rules
#[derive(Debug)]
pub struct TagTaxonomy {
    kind: TaxonomyKind,
    tags: Vec<CompiledTag>,
}

impl TagTaxonomy {
    /// Compile a taxonomy; tag order is preserved for matching output
    pub fn new(kind: TaxonomyKind, defs: Vec<(String, Vec<MatchRule>)>) -> Result<Self> {
        let tags = defs
            .iter()
            .map(|(name, rules)| CompiledTag::compile(name, rules))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { kind, tags })
    }

    fn from_table(
        kind: TaxonomyKind,
        table: &[(&'static str, &'static [(&'static str, bool)])],
    ) -> Result<Self> {
        let defs = table
            .iter()
            .map(|(name, rules)| {
                let rules = rules
                    .iter()
                    .map(|(phrase, wb)| MatchRule::new(*phrase, *wb))
                    .collect();
                (name.to_string(), rules)
            })
            .collect();
        Self::new(kind, defs)
    }

    pub fn kind(&self) -> TaxonomyKind {
        self.kind
    }

    /// Tag names in declaration order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.tags.iter().map(|t| t.name.as_str())
    }

    /// Every tag with at least one firing rule, in declaration order.
    ///
    /// `lower` must already be lowercased.
    pub fn match_tags(&self, lower: &str) -> Vec<String> {
        self.tags
            .iter()
            .filter(|t| t.fires(lower))
            .map(|t| t.name.clone())
            .collect()
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t.name == tag)
    }
}

/// Immutable language data shared by the segmenter and classifier
#[derive(Debug)]
pub struct Lexicon {
    revenue_phrases: Vec<String>,
    expense_phrases: Vec<String>,
    event_verbs: Vec<String>,
    business: TagTaxonomy,
    personal: TagTaxonomy,
    business_context: Vec<String>,
    personal_context: Vec<String>,
}

fn owned(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_lowercase()).collect()
}

impl Lexicon {
    /// The built-in Brazilian Portuguese vocabulary
    pub fn portuguese() -> Result<Self> {
        Ok(Self {
            revenue_phrases: owned(vocabulary::REVENUE_PHRASES),
            expense_phrases: owned(vocabulary::EXPENSE_PHRASES),
            event_verbs: owned(vocabulary::EVENT_VERBS),
            business: TagTaxonomy::from_table(TaxonomyKind::Business, vocabulary::BUSINESS_TAGS)?,
            personal: TagTaxonomy::from_table(TaxonomyKind::Personal, vocabulary::PERSONAL_TAGS)?,
            business_context: owned(vocabulary::BUSINESS_CONTEXT),
            personal_context: owned(vocabulary::PERSONAL_CONTEXT),
        })
    }

    /// Replace the tag taxonomies, keeping the rest of the vocabulary
    pub fn with_taxonomies(mut self, business: TagTaxonomy, personal: TagTaxonomy) -> Self {
        self.business = business;
        self.personal = personal;
        self
    }

    pub fn taxonomy(&self, kind: TaxonomyKind) -> &TagTaxonomy {
        match kind {
            TaxonomyKind::Business => &self.business,
            TaxonomyKind::Personal => &self.personal,
        }
    }

    pub fn event_verbs(&self) -> &[String] {
        &self.event_verbs
    }

    /// Regex alternation of all event verbs, without anchors or grouping
    pub fn verb_alternation(&self) -> String {
        self.event_verbs
            .iter()
            .map(|v| regex::escape(v))
            .collect::<Vec<_>>()
            .join("|")
    }

    pub fn signals_revenue(&self, lower: &str) -> bool {
        contains_any(lower, &self.revenue_phrases)
    }

    pub fn signals_expense(&self, lower: &str) -> bool {
        contains_any(lower, &self.expense_phrases)
    }

    /// Business framing wins over personal when both appear
    pub fn infer_context(&self, lower: &str) -> Option<ExpenseContext> {
        if contains_any(lower, &self.business_context) {
            Some(ExpenseContext::Servico)
        } else if contains_any(lower, &self.personal_context) {
            Some(ExpenseContext::Pessoal)
        } else {
            None
        }
    }
}

fn contains_any(lower: &str, phrases: &[String]) -> bool {
    phrases.iter().any(|p| lower.contains(p.as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lexicon() -> Lexicon {
        Lexicon::portuguese().unwrap()
    }

    #[test]
    fn test_taxonomy_names_in_order() {
        let lex = lexicon();
        let business: Vec<_> = lex.taxonomy(TaxonomyKind::Business).names().collect();
        assert_eq!(
            business,
            ["funcionario", "material", "ferramenta", "transporte", "imposto"]
        );
        let personal: Vec<_> = lex.taxonomy(TaxonomyKind::Personal).names().collect();
        assert_eq!(
            personal,
            [
                "alimentacao",
                "moradia",
                "transporte_pessoal",
                "saude",
                "educacao",
                "lazer",
                "vestuario",
                "internet_telefone"
            ]
        );
    }

    #[test]
    fn test_word_boundary_rules() {
        let lex = lexicon();
        let business = lex.taxonomy(TaxonomyKind::Business);
        assert_eq!(business.match_tags("comprei tinta por 250 reais"), ["material"]);
        // "cal" must not fire inside "calçada"
        assert!(business.match_tags("varri a calçada").is_empty());
        assert_eq!(business.match_tags("paguei o cal"), ["material"]);
    }

    #[test]
    fn test_substring_rules() {
        let lex = lexicon();
        let business = lex.taxonomy(TaxonomyKind::Business);
        assert_eq!(
            business.match_tags("paguei a mão de obra"),
            ["funcionario"]
        );
        let personal = lex.taxonomy(TaxonomyKind::Personal);
        assert_eq!(personal.match_tags("paguei a conta de luz"), ["moradia"]);
    }

    #[test]
    fn test_multiple_tags_in_declaration_order() {
        let lex = lexicon();
        let business = lex.taxonomy(TaxonomyKind::Business);
        assert_eq!(
            business.match_tags("gasolina e cimento pro servente"),
            ["funcionario", "material", "transporte"]
        );
    }

    #[test]
    fn test_accented_word_boundaries() {
        let lex = lexicon();
        let personal = lex.taxonomy(TaxonomyKind::Personal);
        assert_eq!(personal.match_tags("tomei um café"), ["alimentacao"]);
        assert_eq!(personal.match_tags("fui na farmácia"), ["saude"]);
    }

    #[test]
    fn test_contains() {
        let lex = lexicon();
        assert!(lex.taxonomy(TaxonomyKind::Business).contains("imposto"));
        assert!(!lex.taxonomy(TaxonomyKind::Business).contains("lazer"));
        assert!(lex.taxonomy(TaxonomyKind::Personal).contains("lazer"));
    }

    #[test]
    fn test_infer_context_business_first() {
        let lex = lexicon();
        assert_eq!(
            lex.infer_context("paguei 90 para a obra"),
            Some(ExpenseContext::Servico)
        );
        assert_eq!(
            lex.infer_context("gastei 50 pra mim"),
            Some(ExpenseContext::Pessoal)
        );
        assert_eq!(
            lex.infer_context("gastei 50 no trabalho pra mim"),
            Some(ExpenseContext::Servico)
        );
        assert_eq!(lex.infer_context("paguei 500 hoje"), None);
    }

    #[test]
    fn test_revenue_and_expense_signals() {
        let lex = lexicon();
        assert!(lex.signals_revenue("quinta recebi 2.500 da ana"));
        assert!(!lex.signals_revenue("comprei tinta"));
        assert!(lex.signals_expense("comprei tinta"));
        assert!(!lex.signals_expense("marquei orçamento com a ana"));
    }

    #[test]
    fn test_custom_taxonomy() {
        let tax = TagTaxonomy::new(
            TaxonomyKind::Business,
            vec![(
                "software".to_string(),
                vec![MatchRule::new("Licença", true), MatchRule::new("assinatura anual", false)],
            )],
        )
        .unwrap();
        assert_eq!(tax.match_tags("renovei a licença"), ["software"]);
        assert_eq!(tax.match_tags("paguei a assinatura anual"), ["software"]);
        assert!(tax.match_tags("licenças").is_empty());
    }

    #[test]
    fn test_verb_alternation_compiles() {
        let lex = lexicon();
        let re = Regex::new(&format!(r"(?i)\b(?:{})\b", lex.verb_alternation())).unwrap();
        assert!(re.is_match("Caiu 1800 no pix"));
        assert!(!re.is_match("marquei orçamento"));
    }
}
