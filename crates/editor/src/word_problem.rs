//! Locating DSL values inside the word-problem prose.
//!
//! Matching is heuristic: the prose is free text and the DSL only records
//! quantities and names, so the best available signal is where those
//! literals occur.

use std::sync::OnceLock;

use mwp_dsl::Span;
use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};

/// Matcher settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchOptions {
    /// Match words regardless of case. Default is true.
    pub case_insensitive: bool,
    /// Accept an `s`/`es` suffix on words. Default is true.
    pub match_plurals: bool,
    /// Keep at most this many ranges per lookup. Default is unlimited.
    pub max_matches: Option<usize>,
}

impl Default for MatchOptions {
    fn default() -> Self {
        Self { case_insensitive: true, match_plurals: true, max_matches: None }
    }
}

const NUMBER_WORDS: [&str; 21] = [
    "zero", "one", "two", "three", "four", "five", "six", "seven", "eight", "nine", "ten", "eleven",
    "twelve", "thirteen", "fourteen", "fifteen", "sixteen", "seventeen", "eighteen", "nineteen", "twenty",
];

fn number_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\d+(?:\.\d+)?").unwrap())
}

#[derive(Debug, Clone, Default)]
pub struct WordProblemMatcher {
    options: MatchOptions,
}

impl WordProblemMatcher {
    pub fn new(options: MatchOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &MatchOptions {
        &self.options
    }

    /// Byte ranges in `text` where `value` occurs, sorted and de-duplicated.
    ///
    /// Numeric values match numerically equal numbers (`3` matches `3.0`
    /// but not the `3` in `3.5`) and small counts spelled out as words.
    /// Other values match as whole words.
    pub fn find(&self, text: &str, value: &str) -> Vec<Span> {
        let value = value.trim();
        if value.is_empty() || text.is_empty() {
            return Vec::new();
        }
        let mut spans = match value.parse::<f64>() {
            Ok(n) if n.is_finite() => self.find_number(text, n),
            _ => self.find_word(text, value),
        };
        spans.sort_by_key(|s| (s.start, s.end));
        spans.dedup();
        if let Some(max) = self.options.max_matches {
            spans.truncate(max);
        }
        spans
    }

    /// [`find`](Self::find) for several values, merged.
    pub fn find_all<'v>(&self, text: &str, values: impl IntoIterator<Item = &'v str>) -> Vec<Span> {
        let mut spans: Vec<Span> = values
            .into_iter()
            .flat_map(|v| self.find(text, v))
            .collect();
        spans.sort_by_key(|s| (s.start, s.end));
        spans.dedup();
        if let Some(max) = self.options.max_matches {
            spans.truncate(max);
        }
        spans
    }

    fn find_number(&self, text: &str, n: f64) -> Vec<Span> {
        let mut spans: Vec<Span> = number_regex()
            .find_iter(text)
            .filter(|m| m.as_str().parse::<f64>().ok() == Some(n))
            .map(|m| Span::new(m.start(), m.end()))
            .collect();
        if n.fract() == 0.0 && (0.0..=20.0).contains(&n) {
            // Bounded by the range check above.
            let word = NUMBER_WORDS[n as usize];
            spans.extend(self.word_matches(text, word, false));
        }
        spans
    }

    fn find_word(&self, text: &str, value: &str) -> Vec<Span> {
        self.word_matches(text, value, self.options.match_plurals)
    }

    fn word_matches(&self, text: &str, word: &str, plurals: bool) -> Vec<Span> {
        let suffix = if plurals { "(?:s|es)?" } else { "" };
        let pattern = format!(r"\b{}{}\b", regex::escape(word), suffix);
        match RegexBuilder::new(&pattern)
            .case_insensitive(self.options.case_insensitive)
            .build()
        {
            Ok(re) => re.find_iter(text).map(|m| Span::new(m.start(), m.end())).collect(),
            Err(_) => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MWP: &str = "Jane has 3 apples. Bob gives her three more Apples, and 3.5 pears. How many apples does Jane have?";

    fn slices<'a>(text: &'a str, spans: &[Span]) -> Vec<&'a str> {
        spans.iter().map(|s| &text[s.start..s.end]).collect()
    }

    #[test]
    fn test_number_matches() {
        let m = WordProblemMatcher::default();
        let spans = m.find(MWP, "3");
        assert_eq!(slices(MWP, &spans), vec!["3", "three"]);
    }

    #[test]
    fn test_word_matches_plural_and_case() {
        let m = WordProblemMatcher::default();
        assert_eq!(slices(MWP, &m.find(MWP, "apple")), vec!["apples", "Apples", "apples"]);
        assert_eq!(slices(MWP, &m.find(MWP, "Jane")), vec!["Jane", "Jane"]);
    }

    #[test]
    fn test_case_sensitive_without_plurals() {
        let m = WordProblemMatcher::new(MatchOptions {
            case_insensitive: false,
            match_plurals: false,
            max_matches: None,
        });
        assert_eq!(slices(MWP, &m.find(MWP, "Apples")), vec!["Apples"]);
        assert!(m.find(MWP, "apple").is_empty());
    }

    #[test]
    fn test_max_matches_and_empty() {
        let m = WordProblemMatcher::new(MatchOptions { max_matches: Some(1), ..Default::default() });
        assert_eq!(m.find(MWP, "apple").len(), 1);
        assert!(m.find(MWP, "  ").is_empty());
        assert!(m.find("", "apple").is_empty());
    }

    #[test]
    fn test_find_all_merges() {
        let m = WordProblemMatcher::default();
        let spans = m.find_all(MWP, ["Bob", "3.5"]);
        assert_eq!(slices(MWP, &spans), vec!["Bob", "3.5"]);
    }

    #[test]
    fn test_regex_metacharacters_are_literal() {
        let m = WordProblemMatcher::default();
        assert_eq!(m.find("x.y and xzy", "x.y").len(), 1);
    }
}
