//! Error types for loading and synonym lookups.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while building the simile table.
#[derive(Debug, Error)]
pub enum LoadError {
    /// No simile data exists at the configured location.
    #[error("no simile data found at {}", path.display())]
    NotFound { path: PathBuf },

    /// A data file exists but could not be opened.
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A data file is not valid CSV.
    #[error("malformed CSV in {}: {source}", path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// A data file lacks a column every simile needs.
    #[error("{} has no '{column}' column", path.display())]
    MissingColumn { path: PathBuf, column: &'static str },

    /// The file name pattern is not a valid glob.
    #[error("invalid file pattern: {0}")]
    Pattern(#[from] globset::Error),
}

impl LoadError {
    /// Returns `true` when the data location is simply absent, as opposed
    /// to present but unreadable.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

/// Convenience alias for loading results.
pub type LoadResult<T> = std::result::Result<T, LoadError>;

/// Errors from the word-relatedness service. The expander never lets these
/// reach its callers.
#[derive(Debug, Error)]
pub enum SynonymError {
    /// The service answered with a non-success status.
    #[error("HTTP error from synonym service: {message}")]
    Http { message: String },

    /// The response body was not the expected word list.
    #[error("parse error from synonym service: {message}")]
    Parse { message: String },

    /// An error propagated from `reqwest` (timeout, connection refused, ...).
    #[error("request error: {0}")]
    Request(#[from] reqwest::Error),
}

impl SynonymError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Request(e) if e.is_timeout())
    }
}

/// Convenience alias for synonym service results.
pub type SynonymResult<T> = std::result::Result<T, SynonymError>;
