//! The match policies behind every query.
//!
//! [`matches`] answers the question for a single field value. The
//! [`RecordMatcher`] compiles a query once and applies the same logic to
//! whole records while iterating over the table.

use std::ops::Range;

use regex::Regex;

use punchline_core::text::{last_word, normalize_key};
use punchline_core::{Determiners, MatchMode, SimileRecord};

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// A compiled case-insensitive whole-word (or whole-phrase) pattern.
///
/// Special characters are escaped. A `\b` anchor is only placed on a side
/// where the term starts or ends with a word character, since an anchor
/// next to punctuation ("c++", "n.y.") could never match. A term ending in
/// punctuation must not be followed by that same character, so "c+" does
/// not match the front of "c++". The term itself is capture group 1.
#[derive(Debug, Clone)]
pub(crate) struct TermPattern(Regex);

impl TermPattern {
    pub(crate) fn compile(term: &str) -> Result<Self, regex::Error> {
        let lead = if term.chars().next().is_some_and(is_word_char) {
            r"\b".to_string()
        } else {
            String::new()
        };
        let trail = match term.chars().last() {
            Some(c) if is_word_char(c) => r"\b".to_string(),
            Some(c) => format!("(?:$|[^{}])", regex::escape(&c.to_string())),
            None => String::new(),
        };
        Regex::new(&format!("(?i){lead}({}){trail}", regex::escape(term))).map(Self)
    }

    pub(crate) fn is_match(&self, text: &str) -> bool {
        self.0.is_match(text)
    }

    /// Byte ranges of every occurrence of the term in `text`.
    pub(crate) fn ranges<'t>(&'t self, text: &'t str) -> impl Iterator<Item = Range<usize>> + 't {
        self.0
            .captures_iter(text)
            .filter_map(|caps| caps.get(1))
            .map(|m| m.range())
    }
}

/// Exact-or-last-word test on normalized values.
fn last_word_match(field: &str, query: &str, determiners: &Determiners) -> bool {
    let cleaned = determiners.strip(field);
    if cleaned.is_empty() {
        return false;
    }
    cleaned == query || last_word(cleaned) == Some(query)
}

/// Whether `field_value` matches `query` under `mode`.
///
/// Both sides are trimmed and lowercased first. An empty query or field
/// never matches. For [`MatchMode::Expanded`] this is the per-term test;
/// expansion itself happens in [`RecordMatcher`].
pub fn matches(field_value: &str, query: &str, mode: MatchMode, determiners: &Determiners) -> bool {
    let query = normalize_key(query);
    let field = normalize_key(field_value);
    if query.is_empty() || field.is_empty() {
        return false;
    }

    match mode {
        MatchMode::Substring => field.contains(&query),
        MatchMode::LastWord | MatchMode::Expanded => last_word_match(&field, &query, determiners),
        MatchMode::WordBoundary => match TermPattern::compile(&query) {
            Ok(pattern) => pattern.is_match(&field),
            Err(e) => {
                log::warn!("Unusable query '{}': {}", query, e);
                false
            }
        },
    }
}

#[derive(Debug, Clone)]
struct Term {
    text: String,
    /// Word-boundary pattern. `None` in other modes, or when the term is
    /// too large to compile, in which case the term never matches.
    pattern: Option<TermPattern>,
}

/// A compiled query, applied record by record.
#[derive(Debug, Clone)]
pub struct RecordMatcher {
    mode: MatchMode,
    terms: Vec<Term>,
    determiners: Determiners,
}

impl RecordMatcher {
    /// Compile `query` for `mode`. `expansions` are only used by
    /// [`MatchMode::Expanded`], where a record matches if any of the query
    /// or its expansions passes the last-word test.
    pub fn new(
        query: &str,
        expansions: &[String],
        mode: MatchMode,
        determiners: Determiners,
    ) -> Self {
        let mut texts = vec![normalize_key(query)];
        if mode.uses_synonyms() {
            for extra in expansions {
                let extra = normalize_key(extra);
                if !texts.contains(&extra) {
                    texts.push(extra);
                }
            }
        }
        texts.retain(|t| !t.is_empty());

        let terms = texts
            .into_iter()
            .map(|text| {
                let pattern = if mode == MatchMode::WordBoundary {
                    TermPattern::compile(&text)
                        .map_err(|e| log::warn!("Unusable query term: {}", e))
                        .ok()
                } else {
                    None
                };
                Term { text, pattern }
            })
            .collect();

        Self {
            mode,
            terms,
            determiners,
        }
    }

    pub fn mode(&self) -> MatchMode {
        self.mode
    }

    /// The normalized terms being matched, query first.
    pub fn terms(&self) -> impl Iterator<Item = &str> {
        self.terms.iter().map(|t| t.text.as_str())
    }

    /// Substring matching reads the line; every other policy reads the
    /// signified/signifier keys, or the line for records without them.
    pub fn is_match(&self, record: &SimileRecord) -> bool {
        if self.terms.is_empty() {
            return false;
        }
        match self.mode {
            MatchMode::Substring => self.field_matches(record.line_key()),
            _ => record
                .semantic_keys()
                .into_iter()
                .any(|key| self.field_matches(key)),
        }
    }

    fn field_matches(&self, key: &str) -> bool {
        if key.is_empty() {
            return false;
        }
        self.terms.iter().any(|term| match self.mode {
            MatchMode::Substring => key.contains(term.text.as_str()),
            MatchMode::LastWord | MatchMode::Expanded => {
                last_word_match(key, &term.text, &self.determiners)
            }
            MatchMode::WordBoundary => term.pattern.as_ref().is_some_and(|p| p.is_match(key)),
        })
    }
}
