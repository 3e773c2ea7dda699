//! Query evaluation over the session table.
//!
//! A search is one sequential pass over the read-only table. Matches keep
//! table order; the result limit only bounds how many are handed back for
//! rendering, and the total is always reported.

use std::sync::Arc;

use rand::seq::index;
use rand::Rng;

use punchline_core::text::normalize_key;
use punchline_core::{Determiners, MatchMode, SimileRecord, SimileTable};

use crate::matcher::RecordMatcher;

/// Tunables for a [`SearchEngine`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineSettings {
    pub mode: MatchMode,
    /// Maximum records returned per query. Zero means no limit.
    pub result_limit: usize,
    /// Records returned for an empty query. Zero shows the prompt instead.
    pub sample_size: usize,
    pub determiners: Determiners,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            mode: MatchMode::default(),
            result_limit: 50,
            sample_size: 5,
            determiners: Determiners::default(),
        }
    }
}

/// Matches for a non-empty query.
#[derive(Debug, Clone)]
pub struct SearchResults<'a> {
    query: String,
    mode: MatchMode,
    total: usize,
    records: Vec<&'a SimileRecord>,
    terms: Vec<String>,
}

impl<'a> SearchResults<'a> {
    /// The normalized query.
    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn mode(&self) -> MatchMode {
        self.mode
    }

    /// Number of matching records before the result limit was applied.
    pub fn total(&self) -> usize {
        self.total
    }

    /// Matching records in table order, at most the result limit.
    pub fn records(&self) -> &[&'a SimileRecord] {
        &self.records
    }

    pub fn is_empty(&self) -> bool {
        self.total == 0
    }

    pub fn is_truncated(&self) -> bool {
        self.records.len() < self.total
    }

    /// The query and any expansion terms that took part in matching.
    pub fn terms(&self) -> &[String] {
        &self.terms
    }

    /// Terms to highlight in `record`'s line: the query terms plus the
    /// record's own signified and signifier.
    pub fn highlight_terms<'r>(&'r self, record: &'r SimileRecord) -> Vec<&'r str> {
        self.terms
            .iter()
            .map(String::as_str)
            .chain(record.signified())
            .chain(record.signifier())
            .collect()
    }
}

/// What a query produced.
#[derive(Debug, Clone)]
pub enum SearchOutcome<'a> {
    /// Empty query and nothing to sample: show the ready prompt.
    Prompt,
    /// Empty query: a random sample of the table.
    Sample(Vec<&'a SimileRecord>),
    /// Non-empty query.
    Matches(SearchResults<'a>),
}

/// Runs queries against one loaded table.
#[derive(Debug, Clone)]
pub struct SearchEngine {
    table: Arc<SimileTable>,
    settings: EngineSettings,
}

impl SearchEngine {
    pub fn new(table: Arc<SimileTable>, settings: EngineSettings) -> Self {
        Self { table, settings }
    }

    pub fn table(&self) -> &SimileTable {
        &self.table
    }

    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    /// Run `query` with the configured mode.
    pub fn search(&self, query: &str, expansions: &[String]) -> SearchOutcome<'_> {
        self.search_with_mode(query, self.settings.mode, expansions)
    }

    /// Run `query` with an explicit mode. An empty (or all-whitespace)
    /// query is not a filter: it yields a random sample, or the prompt.
    pub fn search_with_mode(
        &self,
        query: &str,
        mode: MatchMode,
        expansions: &[String],
    ) -> SearchOutcome<'_> {
        let query = normalize_key(query);
        if query.is_empty() {
            return self.sample_outcome();
        }

        let matcher =
            RecordMatcher::new(&query, expansions, mode, self.settings.determiners.clone());
        let mut records: Vec<&SimileRecord> =
            self.table.iter().filter(|r| matcher.is_match(r)).collect();
        let total = records.len();
        if self.settings.result_limit > 0 {
            records.truncate(self.settings.result_limit);
        }

        log::debug!(
            "'{}' ({}) matched {} of {} records",
            query,
            mode,
            total,
            self.table.len()
        );

        SearchOutcome::Matches(SearchResults {
            terms: matcher.terms().map(str::to_string).collect(),
            query,
            mode,
            total,
            records,
        })
    }

    /// Up to `count` distinct records chosen at random.
    pub fn sample(&self, count: usize) -> Vec<&SimileRecord> {
        self.sample_with(count, &mut rand::thread_rng())
    }

    pub fn sample_with<R: Rng + ?Sized>(&self, count: usize, rng: &mut R) -> Vec<&SimileRecord> {
        let records = self.table.records();
        let amount = count.min(records.len());
        index::sample(rng, records.len(), amount)
            .into_iter()
            .map(|i| &records[i])
            .collect()
    }

    fn sample_outcome(&self) -> SearchOutcome<'_> {
        if self.settings.sample_size == 0 || self.table.is_empty() {
            SearchOutcome::Prompt
        } else {
            SearchOutcome::Sample(self.sample(self.settings.sample_size))
        }
    }
}
