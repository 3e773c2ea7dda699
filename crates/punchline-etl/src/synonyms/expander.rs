//! Best-effort, session-cached query expansion.

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use punchline_core::text::normalize_key;

use crate::config::SynonymSettings;
use crate::synonyms::client::SynonymClient;

/// Expands a query word into a few related terms.
///
/// Failures of any kind (timeout, network error, bad status, bad payload)
/// degrade to an empty expansion and are only logged. Every answer,
/// including an empty one, is cached per word for the life of the
/// expander.
#[derive(Debug)]
pub struct SynonymExpander {
    client: Option<SynonymClient>,
    max_results: usize,
    cache: Mutex<HashMap<String, Vec<String>>>,
}

impl SynonymExpander {
    /// Build an expander from settings. A disabled service, or one whose
    /// HTTP client cannot be created, yields an expander that always
    /// returns nothing.
    pub fn from_settings(settings: &SynonymSettings) -> Self {
        if !settings.enabled {
            return Self::disabled();
        }
        match SynonymClient::new(settings) {
            Ok(client) => Self::with_client(client),
            Err(e) => {
                log::warn!("Synonym lookups disabled: {}", e);
                Self::disabled()
            }
        }
    }

    pub fn with_client(client: SynonymClient) -> Self {
        Self {
            max_results: client.max_results(),
            client: Some(client),
            cache: Mutex::new(HashMap::new()),
        }
    }

    pub fn disabled() -> Self {
        Self {
            client: None,
            max_results: 0,
            cache: Mutex::new(HashMap::new()),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.client.is_some()
    }

    /// The cached expansion for `word`, if it has been looked up.
    pub fn cached(&self, word: &str) -> Option<Vec<String>> {
        self.cache
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&normalize_key(word))
            .cloned()
    }

    /// Related terms for `word`, excluding the word itself.
    ///
    /// Never fails: returns an empty list when the service is disabled or
    /// the lookup goes wrong.
    pub async fn expand(&self, word: &str) -> Vec<String> {
        let key = normalize_key(word);
        let Some(client) = &self.client else {
            return Vec::new();
        };
        if key.is_empty() {
            return Vec::new();
        }
        if let Some(hit) = self.cached(&key) {
            return hit;
        }

        let terms = match client.related(&key).await {
            Ok(words) => clean_terms(&key, words, self.max_results),
            Err(e) => {
                log::warn!("Synonym lookup for '{}' failed: {}", key, e);
                Vec::new()
            }
        };
        log::debug!("Expanded '{}' to {:?}", key, terms);

        self.cache
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key, terms.clone());
        terms
    }
}

/// Normalize service output: lowercase, drop blanks, the query itself and
/// duplicates, and cap the count.
fn clean_terms(query: &str, words: Vec<String>, max: usize) -> Vec<String> {
    let mut terms: Vec<String> = Vec::with_capacity(max);
    if max == 0 {
        return terms;
    }
    for word in words {
        let word = normalize_key(&word);
        if word.is_empty() || word == query || terms.contains(&word) {
            continue;
        }
        terms.push(word);
        if terms.len() == max {
            break;
        }
    }
    terms
}
