use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// How a query is compared against a record's fields.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MatchMode {
    /// Query is a substring of the line. No boundary checks.
    Substring,
    /// Query equals the determiner-stripped field, or its final word.
    LastWord,
    /// Query appears in the field as a whole word or phrase.
    #[default]
    WordBoundary,
    /// Last-word matching against the query plus related terms.
    Expanded,
}

impl MatchMode {
    pub const ALL: [Self; 4] = [
        Self::Substring,
        Self::LastWord,
        Self::WordBoundary,
        Self::Expanded,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Substring => "substring",
            Self::LastWord => "last-word",
            Self::WordBoundary => "word-boundary",
            Self::Expanded => "expanded",
        }
    }

    /// Whether this mode needs the synonym expander before matching.
    pub const fn uses_synonyms(self) -> bool {
        matches!(self, Self::Expanded)
    }
}

impl fmt::Display for MatchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MatchMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().replace('_', "-");
        Self::ALL
            .into_iter()
            .find(|mode| mode.as_str().eq_ignore_ascii_case(&wanted))
            .ok_or_else(|| Error::UnknownMatchMode(s.to_string()))
    }
}
