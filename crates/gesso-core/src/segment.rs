//! Message segmentation
//!
//! Splits one free-text message into spans that each describe a single
//! financial event. Works with or without punctuation: explicit separators
//! are honored first, then cuts are inferred from financial-action verbs
//! that follow a comma, a narrative connective or a number.

use regex::Regex;
use tracing::debug;

use crate::error::Result;
use crate::lexicon::Lexicon;
use crate::models::EventSpan;

/// Upper bound on numeric-transition rewrites per message
pub const MAX_NUMERIC_PASSES: usize = 10;

/// Internal boundary marker; neither a word nor a whitespace character
const MARK: &str = "\u{1e}";

const UNITS: &str = r"reais|real|conto|contos|pila|pilas|r\$";
const HEDGES: &str = r"uns|umas|cerca de|mais de|menos de";
const CONNECTIVES: &str = r"e|mas|porém|porem|aí|ai|então|entao|também|tambem";

#[derive(Debug)]
pub struct Segmenter {
    separators: Vec<Regex>,
    comma_verb: Regex,
    connective_verb: Regex,
    and_verb: Regex,
    numeric_transition: Regex,
    boundary: Regex,
    /// Connective left at the end of a piece by a cut right after it
    dangling: Regex,
    orphan: Regex,
    any_verb: Regex,
}

impl Segmenter {
    pub fn new(lexicon: &Lexicon) -> Result<Self> {
        let verbs = lexicon.verb_alternation();

        let separators = [
            r"(?i),\s*(?:mas|porém|porem)\s+",
            r"(?i),?\s*\be\s+ainda\s+",
            r"\s*[.!?]\s+",
            r"\s*[—–]+\s*",
        ]
        .iter()
        .map(|p| Regex::new(p))
        .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(Self {
            separators,
            comma_verb: Regex::new(&format!(r"(?i),\s*({verbs})\s+"))?,
            connective_verb: Regex::new(&format!(
                r"(?i)\s+(?:aí|ai|então|entao|também|tambem)\s+({verbs})\s+([^,]+?\d+)"
            ))?,
            and_verb: Regex::new(&format!(r"(?i)\s+e\s+({verbs})\s+(\w[^,]{{0,30}}?\d+)"))?,
            numeric_transition: Regex::new(&format!(
                r"(?i)(\d[\d.,]*(?:\s*(?:{UNITS}))?(?:\s+\w+){{0,4}}?)\s+({verbs})\s+"
            ))?,
            boundary: Regex::new(&format!(r"\s*{MARK}\s*"))?,
            dangling: Regex::new(&format!(r"(?i)\s+(?:{CONNECTIVES})$"))?,
            orphan: Regex::new(&format!(
                r"(?i)^(?:{verbs})\s+(?:(?:{HEDGES})\s+)?[\d.,]+(?:\s*(?:{UNITS}))?$"
            ))?,
            any_verb: Regex::new(&format!(r"(?i)\b(?:{verbs})\b"))?,
        })
    }

    /// Split a message into ordered event spans
    pub fn segment(&self, text: &str) -> Vec<EventSpan> {
        let text = text.trim().replace(MARK, " ");
        if text.is_empty() {
            return Vec::new();
        }

        let marked = self.mark_boundaries(&text);
        let pieces = self.fold_orphans(&marked);
        let spans = self.merge_verbless(pieces);

        debug!(count = spans.len(), "Segmented message");
        spans
            .into_iter()
            .enumerate()
            .map(|(index, text)| EventSpan { index, text })
            .collect()
    }

    fn mark_boundaries(&self, text: &str) -> String {
        let sep = format!(" {MARK} ");

        let mut t = text.to_string();
        for re in &self.separators {
            t = re.replace_all(&t, sep.as_str()).into_owned();
        }

        t = self
            .comma_verb
            .replace_all(&t, format!(" {MARK} ${{1}} ").as_str())
            .into_owned();

        let verb_and_content = format!(" {MARK} ${{1}} ${{2}}");
        t = self
            .connective_verb
            .replace_all(&t, verb_and_content.as_str())
            .into_owned();
        t = self
            .and_verb
            .replace_all(&t, verb_and_content.as_str())
            .into_owned();

        // Each rewrite can expose the next transition
        let after_number = format!("${{1}} {MARK} ${{2}} ");
        for _ in 0..MAX_NUMERIC_PASSES {
            let next = self
                .numeric_transition
                .replace_all(&t, after_number.as_str())
                .into_owned();
            if next == t {
                break;
            }
            t = next;
        }
        t
    }

    /// Split on markers; a bare "verb number [unit]" piece joins the previous one
    fn fold_orphans(&self, marked: &str) -> Vec<String> {
        let mut pieces: Vec<String> = Vec::new();
        for part in self.boundary.split(marked) {
            let part = part
                .trim()
                .trim_end_matches(['.', ',', '!', '?'])
                .trim_end();
            let part = self.dangling.replace(part, "");
            let part = part.trim_end_matches(',');
            if part.is_empty() {
                continue;
            }
            match pieces.last_mut() {
                Some(prev) if self.orphan.is_match(part) => {
                    prev.push(' ');
                    prev.push_str(part);
                }
                _ => pieces.push(part.to_string()),
            }
        }
        pieces
    }

    /// A piece without any verb absorbs the next piece when that one has a verb
    fn merge_verbless(&self, pieces: Vec<String>) -> Vec<String> {
        let mut merged = Vec::with_capacity(pieces.len());
        let mut iter = pieces.into_iter().peekable();
        while let Some(current) = iter.next() {
            let absorb = !self.any_verb.is_match(&current)
                && iter.peek().is_some_and(|next| self.any_verb.is_match(next));
            match iter.next_if(|_| absorb) {
                Some(next) => merged.push(format!("{} {}", current.trim_end(), next.trim_start())),
                None => merged.push(current),
            }
        }
        merged
    }

    /// Number of financial-action verb occurrences in `text`
    pub fn count_verbs(&self, text: &str) -> usize {
        self.any_verb.find_iter(text).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn segmenter() -> Segmenter {
        Segmenter::new(&Lexicon::portuguese().unwrap()).unwrap()
    }

    fn texts(s: &Segmenter, input: &str) -> Vec<String> {
        s.segment(input).into_iter().map(|span| span.text).collect()
    }

    #[test]
    fn test_single_sentence_strips_trailing_punctuation() {
        let s = segmenter();
        assert_eq!(
            texts(&s, "Quinta recebi 2.500 da Ana."),
            ["Quinta recebi 2.500 da Ana"]
        );
    }

    #[test]
    fn test_contrastive_separator() {
        let s = segmenter();
        assert_eq!(
            texts(&s, "Recebi 3000 da Ana, mas paguei 500 de material."),
            ["Recebi 3000 da Ana", "paguei 500 de material"]
        );
    }

    #[test]
    fn test_comma_before_verb() {
        let s = segmenter();
        assert_eq!(
            texts(&s, "Terça recebi 500 da Maria, paguei 800 de cimento"),
            ["Terça recebi 500 da Maria", "paguei 800 de cimento"]
        );
    }

    #[test]
    fn test_and_verb_with_orphan_fold() {
        let s = segmenter();
        assert_eq!(
            texts(&s, "Fui no mercado e gastei 700 reais e pedi comida por 17"),
            ["Fui no mercado gastei 700 reais", "pedi comida por 17"]
        );
    }

    #[test]
    fn test_numeric_transition_without_punctuation() {
        let s = segmenter();
        assert_eq!(
            texts(&s, "recebi 1500 do João comprei tinta 200"),
            ["recebi 1500 do João", "comprei tinta 200"]
        );
    }

    #[test]
    fn test_numeric_cut_drops_dangling_connective() {
        let s = segmenter();
        assert_eq!(
            texts(&s, "Recebi 2,500 da Ana e paguei 1,200 de material."),
            ["Recebi 2,500 da Ana", "paguei 1,200 de material"]
        );
        assert_eq!(
            texts(&s, "recebi 300 do Carlos mas comprei tinta 90"),
            ["recebi 300 do Carlos", "comprei tinta 90"]
        );
    }

    #[test]
    fn test_hedge_and_filler_words_survive() {
        let s = segmenter();
        assert_eq!(
            texts(&s, "caiu uns 300 no pix comprei cimento 80"),
            ["caiu uns 300 no pix", "comprei cimento 80"]
        );
    }

    #[test]
    fn test_narrative_connective() {
        let s = segmenter();
        assert_eq!(
            texts(&s, "comprei tinta 200 aí botei gasolina 130"),
            ["comprei tinta 200", "botei gasolina 130"]
        );
    }

    #[test]
    fn test_orphan_after_sentence_break() {
        let s = segmenter();
        assert_eq!(
            texts(&s, "Fui no mercado. Gastei 700"),
            ["Fui no mercado Gastei 700"]
        );
        assert_eq!(
            texts(&s, "Comprei tinta. Paguei uns 90 reais"),
            ["Comprei tinta Paguei uns 90 reais"]
        );
    }

    #[test]
    fn test_verbless_piece_merges_forward() {
        let s = segmenter();
        assert_eq!(
            texts(&s, "Ontem à tarde. Paguei a conta de luz"),
            ["Ontem à tarde Paguei a conta de luz"]
        );
    }

    #[test]
    fn test_verbless_merge_consumes_one_piece() {
        let s = segmenter();
        assert_eq!(
            texts(&s, "Ontem. Paguei a luz. Comprei tinta"),
            ["Ontem Paguei a luz", "Comprei tinta"]
        );
    }

    #[test]
    fn test_dash_and_e_ainda() {
        let s = segmenter();
        assert_eq!(
            texts(&s, "recebi 100 do Carlos — e ainda comprei material por 780"),
            ["recebi 100 do Carlos", "comprei material por 780"]
        );
    }

    #[test]
    fn test_empty_input() {
        let s = segmenter();
        assert!(s.segment("").is_empty());
        assert!(s.segment("   \n ").is_empty());
    }

    #[test]
    fn test_span_indices_are_ordinal() {
        let s = segmenter();
        let spans = s.segment("Recebi 3000 da Ana, mas paguei 500 de luz. Comprei tinta por 80");
        let indices: Vec<_> = spans.iter().map(|sp| sp.index).collect();
        assert_eq!(indices, [0, 1, 2]);
    }

    #[test]
    fn test_no_verb_is_dropped() {
        let s = segmenter();
        let messages = [
            "Fui no mercado e gastei 700 reais e pedi comida por 17",
            "recebi 1500 do João comprei tinta 200 paguei 50 de frete",
            "caiu uns 300 no pix, comprei cimento 80 aí botei gasolina 130",
            "Quinta eu recebi 2.500 da Ana, mas sexta paguei o servente — e ainda comprei material por 780.",
            "paguei 10 paguei 20 paguei 30 paguei 40",
            "Ontem. Paguei a luz. Comprei tinta",
        ];
        for msg in messages {
            let spans = s.segment(msg);
            let in_spans: usize = spans.iter().map(|sp| s.count_verbs(&sp.text)).sum();
            assert_eq!(in_spans, s.count_verbs(msg), "verbs lost in {:?}", msg);
        }
    }

    #[test]
    fn test_marker_in_input_is_neutralized() {
        let s = segmenter();
        let spans = s.segment("paguei\u{1e}500 de luz");
        assert_eq!(spans.len(), 1);
        assert_eq!(spans[0].text, "paguei 500 de luz");
    }
}
