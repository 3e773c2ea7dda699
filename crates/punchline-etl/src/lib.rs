//! Loading and enrichment for punchline.
//!
//! Discovers and reads simile CSV files into a [`SimileTable`], memoizes the
//! table for the session in a [`Catalog`], layers configuration, and expands
//! queries through an external word-relatedness service.
//!
//! [`SimileTable`]: punchline_core::SimileTable

#![deny(unsafe_code)]
#![warn(missing_debug_implementations)]

pub mod catalog;
pub mod config;
pub mod error;
pub mod load;
pub mod synonyms;

pub use catalog::Catalog;
pub use config::{Config, SynonymSettings};
pub use error::{LoadError, LoadResult, SynonymError, SynonymResult};
pub use load::{discover_files, load_table, DataSource, LoadOptions};
pub use synonyms::{SynonymClient, SynonymExpander};
