//! Paper records and excerpt completion
//!
//! Papers are owned by the import and reading workflows; the review engine
//! only reads their status, added date, and excerpt metadata, and writes
//! the `spaced_repetition` block.

pub mod models;

pub use models::*;
