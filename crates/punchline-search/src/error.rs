use thiserror::Error;

#[derive(Debug, Error)]
pub enum SearchError {
    #[error("could not build match pattern: {0}")]
    Pattern(#[from] regex::Error),
}

pub type SearchResult<T> = std::result::Result<T, SearchError>;
