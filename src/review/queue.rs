//! Due-queue selection
//!
//! Selection is a pure query over the whole paper collection. The daily cap
//! is not applied here: callers split the queue with [`plan_day`] using the
//! number of reviews still allowed today.

use chrono::NaiveDate;

use super::models::ReviewStats;
use crate::papers::{Paper, PaperStatus};
use crate::settings::ReviewSettings;

/// Whether a paper should be offered for review on `today`
pub fn is_eligible(paper: &Paper, today: NaiveDate, policy: &ReviewSettings) -> bool {
    if !paper.is_completed() {
        return false;
    }
    let Some(state) = paper.review_state.as_ref() else {
        return false;
    };
    paper.citability() >= policy.min_citability && paper.has_projects() && state.is_due(today)
}

/// All eligible papers, earliest due first.
///
/// The sort is stable, so papers due on the same day keep collection order.
pub fn select_due_queue<'a>(
    papers: &'a [Paper],
    today: NaiveDate,
    policy: &ReviewSettings,
) -> Vec<&'a Paper> {
    let mut queue: Vec<&Paper> = papers
        .iter()
        .filter(|p| is_eligible(p, today, policy))
        .collect();
    queue.sort_by_key(|p| p.review_state.as_ref().and_then(|s| s.next_review_date));
    queue
}

/// A due queue split by what may still be reviewed today
#[derive(Debug, Clone, PartialEq)]
pub struct DailyPlan<'a> {
    /// Up to the remaining cap, in queue order
    pub actionable: Vec<&'a Paper>,
    /// Due but past today's cap
    pub waiting: Vec<&'a Paper>,
}

pub fn plan_day<'a>(queue: &[&'a Paper], remaining: usize) -> DailyPlan<'a> {
    let split = remaining.min(queue.len());
    DailyPlan {
        actionable: queue[..split].to_vec(),
        waiting: queue[split..].to_vec(),
    }
}

/// Number of judgments already recorded on `today` across all papers
pub fn reviews_judged_on(papers: &[Paper], today: NaiveDate) -> usize {
    papers
        .iter()
        .filter_map(|p| p.review_state.as_ref())
        .map(|s| s.reviews_on(today).count())
        .sum()
}

/// The head of the due queue for the dashboard
pub fn upcoming<'a>(
    papers: &'a [Paper],
    today: NaiveDate,
    policy: &ReviewSettings,
) -> Vec<&'a Paper> {
    let mut queue = select_due_queue(papers, today, policy);
    queue.truncate(policy.upcoming_limit);
    queue
}

/// Collection-wide counters for the dashboard
pub fn review_stats(papers: &[Paper], today: NaiveDate, policy: &ReviewSettings) -> ReviewStats {
    let mut stats = ReviewStats::default();

    for paper in papers {
        match paper.status {
            PaperStatus::Inbox => stats.inbox_papers += 1,
            PaperStatus::Reading => stats.reading_papers += 1,
            PaperStatus::Completed => stats.completed_papers += 1,
            PaperStatus::Other(_) => {}
        }

        if let Some(state) = paper.review_state.as_ref() {
            if state.expired {
                stats.expired_papers += 1;
            }
            for record in state.reviews_on(today) {
                stats.reviews_today += 1;
                if record.recalled_correctly {
                    stats.correct_today += 1;
                }
            }
        }

        if is_eligible(paper, today, policy) {
            stats.due_today += 1;
        }
    }

    stats.remaining_today = policy.daily_cap.saturating_sub(stats.reviews_today);
    stats
}
