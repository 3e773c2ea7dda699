//! Text normalization shared by loading and matching.
//!
//! Display text is never touched here: every function returns a new value
//! (or a sub-slice) so callers keep the verbatim original.

use serde::{Deserialize, Serialize};

/// Leading determiners and possessives stripped before last-word matching.
pub const DEFAULT_DETERMINERS: &[&str] = &[
    "a", "an", "the", "my", "his", "her", "your", "our", "their", "that", "this",
];

/// Lowercase and trim a raw value into its matching key.
pub fn normalize_key(raw: &str) -> String {
    raw.to_lowercase().trim().to_string()
}

/// The final whitespace-delimited token of `value`, if any.
pub fn last_word(value: &str) -> Option<&str> {
    value.split_whitespace().last()
}

/// A configurable set of leading words dropped from a field before
/// exact/last-word comparison ("the wolf" compares as "wolf").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Determiners(Vec<String>);

impl Default for Determiners {
    fn default() -> Self {
        Self(DEFAULT_DETERMINERS.iter().map(|d| (*d).to_string()).collect())
    }
}

impl Determiners {
    #[must_use]
    pub fn new<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(
            words
                .into_iter()
                .map(|w| normalize_key(&Into::<String>::into(w)))
                .filter(|w| !w.is_empty())
                .collect(),
        )
    }

    /// An empty set: `strip` becomes the identity.
    #[must_use]
    pub fn none() -> Self {
        Self(Vec::new())
    }

    pub fn words(&self) -> &[String] {
        &self.0
    }

    /// Strip one leading determiner from an already-normalized value.
    ///
    /// The determiner must be followed by whitespace, so "theory" and a
    /// bare "the" are returned unchanged.
    pub fn strip<'a>(&self, value: &'a str) -> &'a str {
        let value = value.trim();
        let Some((first, rest)) = value.split_once(char::is_whitespace) else {
            return value;
        };
        if self.0.iter().any(|d| d == first) {
            rest.trim_start()
        } else {
            value
        }
    }
}
