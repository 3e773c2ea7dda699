use std::collections::HashSet;
use std::path::{Path, PathBuf};

use crate::model::SimileRecord;

/// The in-memory simile table for a session.
///
/// Records keep the order in which their source files were concatenated.
#[derive(Debug, Clone, Default)]
pub struct SimileTable {
    records: Vec<SimileRecord>,
    sources: Vec<PathBuf>,
}

impl SimileTable {
    #[must_use]
    pub fn new(records: Vec<SimileRecord>, sources: Vec<PathBuf>) -> Self {
        Self { records, sources }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[SimileRecord] {
        &self.records
    }

    pub fn iter(&self) -> std::slice::Iter<'_, SimileRecord> {
        self.records.iter()
    }

    /// Files the table was built from, in concatenation order.
    pub fn sources(&self) -> &[PathBuf] {
        &self.sources
    }

    pub fn contains_source(&self, path: &Path) -> bool {
        self.sources.iter().any(|p| p == path)
    }

    /// Number of records that carry a signified/signifier pair.
    pub fn comparison_count(&self) -> usize {
        self.records.iter().filter(|r| r.has_comparison()).count()
    }

    /// Drop every record whose `(artist, line)` pair was already seen,
    /// keeping the first occurrence. Returns how many were removed.
    pub fn dedupe(&mut self) -> usize {
        let before = self.records.len();
        let mut seen: HashSet<(String, String)> = HashSet::with_capacity(before);
        self.records
            .retain(|r| seen.insert((r.artist().to_string(), r.line().to_string())));
        before - self.records.len()
    }
}

impl<'a> IntoIterator for &'a SimileTable {
    type Item = &'a SimileRecord;
    type IntoIter = std::slice::Iter<'a, SimileRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}
