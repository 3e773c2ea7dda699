use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("unknown match mode: {0} (expected substring, last-word, word-boundary or expanded)")]
    UnknownMatchMode(String),
}

pub type Result<T> = std::result::Result<T, Error>;
