//! Core domain model for punchline.
//!
//! This crate defines the simile record and table types, the enumerated
//! match policies, and the text normalization shared by the loader and the
//! matcher.

#![deny(unsafe_code)]
#![warn(missing_debug_implementations)]

pub mod error;
pub mod model;
pub mod text;

pub use error::{Error, Result};
pub use model::{MatchMode, SimileRecord, SimileTable};
pub use text::Determiners;
