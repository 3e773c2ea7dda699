//! Query evaluation for punchline.
//!
//! One configurable matcher covers every match policy, a highlighter marks
//! the compared terms inside a display line, and the engine applies both to
//! the in-memory simile table.

#![deny(unsafe_code)]
#![warn(missing_debug_implementations)]

pub mod engine;
pub mod error;
pub mod highlight;
pub mod matcher;

pub use engine::{EngineSettings, SearchEngine, SearchOutcome, SearchResults};
pub use error::{SearchError, SearchResult};
pub use highlight::{highlight, segments, Markup, Segment};
pub use matcher::{matches, RecordMatcher};
