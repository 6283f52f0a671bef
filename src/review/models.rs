//! Data models for the review schedule

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::algorithm;
use crate::dates::{
    deserialize_lenient, deserialize_lenient_option, deserialize_or_default,
    deserialize_valid_entries,
};

/// A single recall judgment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewRecord {
    pub date: NaiveDate,
    pub recalled_correctly: bool,
}

/// Spaced repetition state attached to a completed paper
///
/// Serialized as the paper's `spaced_repetition` block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewState {
    /// Date on or after which the paper is due
    #[serde(default, deserialize_with = "deserialize_lenient")]
    pub next_review_date: Option<NaiveDate>,
    /// Last computed spacing interval in weeks
    #[serde(
        default = "default_interval_weeks",
        deserialize_with = "deserialize_interval_weeks"
    )]
    pub current_interval_weeks: u32,
    /// Position in the growth table. Negative, `null`, or non-numeric values
    /// read from disk are treated as 0.
    #[serde(default, deserialize_with = "deserialize_or_default")]
    pub fibonacci_index: i32,
    /// Append-only, oldest first. Malformed records are dropped on load.
    #[serde(default, deserialize_with = "deserialize_valid_entries")]
    pub review_history: Vec<ReviewRecord>,
    /// Set once the next review would fall past the paper's relevance horizon.
    /// Never cleared.
    #[serde(default, deserialize_with = "deserialize_or_default")]
    pub expired: bool,
}

fn default_interval_weeks() -> u32 {
    1
}

fn deserialize_interval_weeks<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(deserialize_lenient_option(deserializer)?.unwrap_or_else(default_interval_weeks))
}

impl ReviewState {
    /// State for a paper whose excerpt was completed on `today`: first review one week out
    pub fn initial(today: NaiveDate) -> Self {
        Self {
            next_review_date: Some(algorithm::next_review_date(today, 0)),
            current_interval_weeks: algorithm::interval_weeks(0),
            fibonacci_index: 0,
            review_history: Vec::new(),
            expired: false,
        }
    }

    pub fn fibonacci_index(&self) -> usize {
        self.fibonacci_index.max(0) as usize
    }

    /// Due on or before `today`, and not expired
    pub fn is_due(&self, today: NaiveDate) -> bool {
        !self.expired && self.next_review_date.is_some_and(|d| d <= today)
    }

    /// Judgments recorded on `day`
    pub fn reviews_on(&self, day: NaiveDate) -> impl Iterator<Item = &ReviewRecord> {
        self.review_history.iter().filter(move |r| r.date == day)
    }

    /// Share of judgments that were recalled, or `None` before the first review
    pub fn recall_rate(&self) -> Option<f32> {
        if self.review_history.is_empty() {
            return None;
        }
        let recalled = self
            .review_history
            .iter()
            .filter(|r| r.recalled_correctly)
            .count();
        Some(recalled as f32 / self.review_history.len() as f32)
    }
}

/// Dashboard counters across the paper collection
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewStats {
    pub inbox_papers: usize,
    pub reading_papers: usize,
    pub completed_papers: usize,
    pub due_today: usize,
    pub expired_papers: usize,
    pub reviews_today: usize,
    pub correct_today: usize,
    /// Reviews still allowed today under the daily cap
    pub remaining_today: usize,
}
