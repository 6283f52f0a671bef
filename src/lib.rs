//! Litlearn: personal research-paper triage.
//!
//! Papers are imported, read, and summarised into excerpts elsewhere; this
//! crate owns what happens after an excerpt is completed:
//! - Fibonacci-week spaced repetition scheduling with relevance expiry
//! - Daily due-queue selection with a review cap
//! - The present / reveal / judge review session
//! - A thin JSON-file adapter for `data/papers.json` and `data/settings.json`

pub mod dates;
pub mod papers;
pub mod review;
pub mod settings;
pub mod storage;

pub use papers::{Excerpt, ExcerptError, Paper, PaperStatus, Relevance};
pub use review::{ReviewRecord, ReviewSession, ReviewState, ReviewStats, SessionPhase};
pub use settings::{ReviewSettings, Settings};
pub use storage::{PaperStorage, StorageError};
