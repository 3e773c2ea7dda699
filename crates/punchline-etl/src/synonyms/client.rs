//! Datamuse-compatible word-relatedness client.
//!
//! Issues `GET <endpoint>?ml=<word>&max=<n>` and reads back a JSON array of
//! `{"word": ..., "score": ...}` objects. One request per call, bounded by
//! the configured timeout, never retried.

use reqwest::Client;
use serde::Deserialize;

use crate::config::SynonymSettings;
use crate::error::{SynonymError, SynonymResult};

#[derive(Debug, Deserialize)]
struct RelatedWord {
    word: String,
}

/// HTTP client for the word-relatedness service.
#[derive(Debug, Clone)]
pub struct SynonymClient {
    http: Client,
    endpoint: String,
    max_results: usize,
}

impl SynonymClient {
    /// Create a client from settings.
    ///
    /// # Errors
    /// Returns an error if the underlying HTTP client cannot be created.
    pub fn new(settings: &SynonymSettings) -> SynonymResult<Self> {
        let http = Client::builder()
            .user_agent(concat!("punchline/", env!("CARGO_PKG_VERSION")))
            .timeout(settings.timeout())
            .build()?;
        Ok(Self {
            http,
            endpoint: settings.endpoint.clone(),
            max_results: settings.max_results,
        })
    }

    pub fn max_results(&self) -> usize {
        self.max_results
    }

    /// Fetch words related to `word`, in the order the service ranks them.
    ///
    /// # Errors
    /// Returns an error on timeout, network failure, non-success status,
    /// or a body that is not a word list.
    pub async fn related(&self, word: &str) -> SynonymResult<Vec<String>> {
        let max = self.max_results.to_string();
        let response = self
            .http
            .get(&self.endpoint)
            .query(&[("ml", word), ("max", max.as_str())])
            .send()
            .await?
            .error_for_status()
            .map_err(|e| SynonymError::Http {
                message: e.to_string(),
            })?;

        let words: Vec<RelatedWord> = response.json().await.map_err(|e| SynonymError::Parse {
            message: e.to_string(),
        })?;

        Ok(words.into_iter().map(|w| w.word).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        let client = SynonymClient::new(&SynonymSettings::default()).unwrap();
        let debug = format!("{:?}", client);
        assert!(debug.contains("SynonymClient"));
        assert_eq!(client.max_results(), 4);
    }

    #[test]
    fn test_related_words_deserialize() {
        let json = r#"[
            {"word": "frost", "score": 3001},
            {"word": "glacier", "score": 2900, "tags": ["n"]}
        ]"#;
        let words: Vec<RelatedWord> = serde_json::from_str(json).unwrap();
        assert_eq!(words.len(), 2);
        assert_eq!(words[0].word, "frost");
    }

    #[test]
    fn test_related_words_empty() {
        let words: Vec<RelatedWord> = serde_json::from_str("[]").unwrap();
        assert!(words.is_empty());
    }
}
