//! Load-once access to the session's simile table.

use std::sync::{Arc, OnceLock};

use punchline_core::SimileTable;

use crate::error::LoadResult;
use crate::load::{load_table, DataSource, LoadOptions};

/// Memoizes the simile table for a session.
///
/// The first call to [`Catalog::table`] reads the data files; later calls
/// share the same read-only table. Failed loads are not cached, so a
/// missing file can be fixed and picked up by the next call. Files are
/// re-read only through an explicit [`Catalog::reload`].
#[derive(Debug)]
pub struct Catalog {
    source: DataSource,
    options: LoadOptions,
    table: OnceLock<Arc<SimileTable>>,
}

impl Catalog {
    pub fn new(source: DataSource, options: LoadOptions) -> Self {
        Self {
            source,
            options,
            table: OnceLock::new(),
        }
    }

    pub fn source(&self) -> &DataSource {
        &self.source
    }

    pub fn is_loaded(&self) -> bool {
        self.table.get().is_some()
    }

    /// The session table, loading it on first use.
    ///
    /// # Errors
    /// Returns the load error when the table has not been loaded yet and
    /// loading fails.
    pub fn table(&self) -> LoadResult<Arc<SimileTable>> {
        if let Some(table) = self.table.get() {
            return Ok(Arc::clone(table));
        }
        let loaded = Arc::new(load_table(&self.source, self.options)?);
        Ok(Arc::clone(self.table.get_or_init(|| loaded)))
    }

    /// Re-read the data files, replacing the cached table on success.
    /// On failure the previous table (if any) stays in place.
    ///
    /// # Errors
    /// Returns the load error.
    pub fn reload(&mut self) -> LoadResult<Arc<SimileTable>> {
        let loaded = Arc::new(load_table(&self.source, self.options)?);
        self.table = OnceLock::from(Arc::clone(&loaded));
        Ok(loaded)
    }
}
