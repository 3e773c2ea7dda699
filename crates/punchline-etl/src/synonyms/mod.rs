//! Query expansion through an external word-relatedness service.

pub mod client;
pub mod expander;

pub use client::SynonymClient;
pub use expander::SynonymExpander;
