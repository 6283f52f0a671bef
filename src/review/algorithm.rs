//! Fibonacci-week spacing
//!
//! Each successful recall moves a paper one step along a Fibonacci sequence
//! of weeks; a failed recall sends it back to the start. A paper expires once
//! its next review would land after its relevance horizon (`added_date` plus
//! `expiry_years`), and expired papers are never scheduled again.
//!
//! Interval table (weeks), indexed by `fibonacci_index`:
//! `1, 1, 2, 3, 5, 8, 13, 21, 34, 55, 89, 144`
//! Indices past the end stay at 144 weeks.

use chrono::{Duration, NaiveDate};

use super::models::{ReviewRecord, ReviewState};
use crate::dates::add_years;
use crate::papers::Relevance;

/// Review spacing in weeks
pub const FIBONACCI_WEEKS: [u32; 12] = [1, 1, 2, 3, 5, 8, 13, 21, 34, 55, 89, 144];

/// Interval in weeks for a position in the growth table, clamped to the last entry
pub fn interval_weeks(index: usize) -> u32 {
    FIBONACCI_WEEKS[index.min(FIBONACCI_WEEKS.len() - 1)]
}

/// Date of the next review when scheduling from `from` at `index`
pub fn next_review_date(from: NaiveDate, index: usize) -> NaiveDate {
    from + Duration::weeks(i64::from(interval_weeks(index)))
}

/// Last day a paper is still relevant, or `None` when it never expires
pub fn expiry_date(added_date: Option<NaiveDate>, relevance: Relevance) -> Option<NaiveDate> {
    match relevance {
        Relevance::Indefinite => None,
        Relevance::Years(years) => added_date.and_then(|added| add_years(added, years)),
    }
}

/// Whether a review on `next_review` would fall after the relevance horizon
pub fn is_expired(
    added_date: Option<NaiveDate>,
    relevance: Relevance,
    next_review: NaiveDate,
) -> bool {
    expiry_date(added_date, relevance).is_some_and(|expiry| next_review > expiry)
}

/// Compute the state that follows a recall judgment made on `today`.
///
/// `state` is not modified; the returned state carries a copy of the history
/// with one record appended. An expired state is returned unchanged.
pub fn advance(
    state: &ReviewState,
    recalled: bool,
    added_date: Option<NaiveDate>,
    relevance: Relevance,
    today: NaiveDate,
) -> ReviewState {
    if state.expired {
        log::debug!("Review state already expired; not rescheduling");
        return state.clone();
    }

    let index = if recalled {
        state.fibonacci_index() + 1
    } else {
        0
    };
    let weeks = interval_weeks(index);
    let next = next_review_date(today, index);
    let expired = is_expired(added_date, relevance, next);

    let mut review_history = Vec::with_capacity(state.review_history.len() + 1);
    review_history.extend_from_slice(&state.review_history);
    review_history.push(ReviewRecord {
        date: today,
        recalled_correctly: recalled,
    });

    ReviewState {
        next_review_date: Some(next),
        current_interval_weeks: weeks,
        fibonacci_index: i32::try_from(index).unwrap_or(i32::MAX),
        review_history,
        expired,
    }
}

/// Format an interval in weeks to a short human-readable string
pub fn format_interval_weeks(weeks: u32) -> String {
    if weeks == 0 {
        "now".to_string()
    } else if weeks < 4 {
        format!("{}w", weeks)
    } else if weeks < 52 {
        // 4.35 weeks per month on average
        let months = ((weeks as f32) / 4.35).round() as u32;
        format!("{}mo", months.max(1))
    } else {
        let years = weeks / 52;
        format!("{}y", years)
    }
}
