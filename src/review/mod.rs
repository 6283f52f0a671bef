//! Spaced repetition review of completed papers
//!
//! This module provides:
//! - Fibonacci-week interval growth with relevance expiry
//! - Due-queue selection and the daily review cap
//! - The present / reveal / judge session state machine

pub mod algorithm;
pub mod models;
pub mod queue;
pub mod session;

pub use algorithm::{advance, format_interval_weeks, interval_weeks, FIBONACCI_WEEKS};
pub use models::*;
pub use queue::{is_eligible, plan_day, review_stats, select_due_queue, upcoming, DailyPlan};
pub use session::{ReviewSession, SessionError, SessionPhase};
