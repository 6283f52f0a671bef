//! Review session turn loop
//!
//! One paper is handled at a time: it is presented with its excerpt hidden,
//! revealed, and judged. The session never writes anything itself. After
//! [`ReviewSession::judge`] the caller persists the returned state and only
//! then calls [`ReviewSession::commit`], so a failed write does not count
//! against the daily cap and the next queue is derived from stored data.
//!
//! ```text
//! Idle --present--> Presented --reveal--> Revealed --judge+commit--> Idle
//!   \__________ cap reached or queue empty __________________________--> Complete
//! ```

use chrono::NaiveDate;
use thiserror::Error;
use uuid::Uuid;

use super::models::ReviewState;
use super::queue::reviews_judged_on;
use crate::papers::Paper;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    /// No paper shown
    Idle,
    /// Paper shown, stored excerpt hidden
    Presented(Uuid),
    /// Stored excerpt shown, awaiting judgment
    Revealed(Uuid),
    /// Daily cap reached or nothing left to review
    Complete,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    #[error("Review session is complete for {0}")]
    Complete(NaiveDate),

    #[error("No paper is being presented")]
    NothingPresented,

    #[error("Paper must be revealed before it is judged")]
    NotRevealed,

    #[error("Paper {got} is not the current card ({expected})")]
    WrongPaper { expected: Uuid, got: Uuid },

    #[error("Paper {0} has no review schedule")]
    NotScheduled(Uuid),
}

/// Per-day review session with an explicit judged-today counter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewSession {
    day: NaiveDate,
    daily_cap: usize,
    judged: usize,
    phase: SessionPhase,
}

impl ReviewSession {
    pub fn new(day: NaiveDate, daily_cap: usize) -> Self {
        Self {
            day,
            daily_cap,
            judged: 0,
            phase: SessionPhase::Idle,
        }
    }

    /// Start a session for `day`, counting judgments already recorded on that day.
    pub fn resume(day: NaiveDate, daily_cap: usize, papers: &[Paper]) -> Self {
        let mut session = Self::new(day, daily_cap);
        session.judged = reviews_judged_on(papers, day);
        if session.cap_reached() {
            session.phase = SessionPhase::Complete;
        }
        log::debug!(
            "Review session for {}: {} of {} already judged",
            day,
            session.judged,
            daily_cap
        );
        session
    }

    pub fn day(&self) -> NaiveDate {
        self.day
    }

    pub fn phase(&self) -> &SessionPhase {
        &self.phase
    }

    pub fn judged(&self) -> usize {
        self.judged
    }

    pub fn daily_cap(&self) -> usize {
        self.daily_cap
    }

    pub fn remaining(&self) -> usize {
        self.daily_cap.saturating_sub(self.judged)
    }

    pub fn cap_reached(&self) -> bool {
        self.judged >= self.daily_cap
    }

    pub fn is_complete(&self) -> bool {
        self.phase == SessionPhase::Complete
    }

    /// Show the head of a freshly derived due queue.
    ///
    /// From `Idle` this moves to `Presented`, or to `Complete` when the cap is
    /// reached or the queue is empty. Calling it again while a paper is shown
    /// returns that same paper if it is still in the queue.
    pub fn present<'a>(&mut self, queue: &[&'a Paper]) -> Option<&'a Paper> {
        match self.phase {
            SessionPhase::Complete => None,
            SessionPhase::Presented(id) | SessionPhase::Revealed(id) => {
                let current = queue.iter().copied().find(|p| p.id == id);
                if current.is_none() {
                    log::warn!("Presented paper {} left the queue; restarting turn", id);
                    self.phase = SessionPhase::Idle;
                    return self.present(queue);
                }
                current
            }
            SessionPhase::Idle => {
                if self.cap_reached() {
                    log::debug!("Daily review cap of {} reached", self.daily_cap);
                    self.phase = SessionPhase::Complete;
                    return None;
                }
                match queue.first().copied() {
                    Some(paper) => {
                        self.phase = SessionPhase::Presented(paper.id);
                        Some(paper)
                    }
                    None => {
                        self.phase = SessionPhase::Complete;
                        None
                    }
                }
            }
        }
    }

    /// Present a specific paper from the due queue instead of its head.
    ///
    /// Used when the user picks the card themselves. The cap still applies and
    /// the paper must be in `queue`.
    pub fn present_paper<'a>(&mut self, queue: &[&'a Paper], paper_id: Uuid) -> Option<&'a Paper> {
        if self.phase == SessionPhase::Complete || self.cap_reached() {
            self.phase = SessionPhase::Complete;
            return None;
        }
        let paper = queue.iter().copied().find(|p| p.id == paper_id)?;
        self.phase = SessionPhase::Presented(paper.id);
        Some(paper)
    }

    /// Show the stored excerpt for the presented paper
    pub fn reveal(&mut self) -> Result<Uuid, SessionError> {
        match self.phase {
            SessionPhase::Presented(id) | SessionPhase::Revealed(id) => {
                self.phase = SessionPhase::Revealed(id);
                Ok(id)
            }
            SessionPhase::Idle => Err(SessionError::NothingPresented),
            SessionPhase::Complete => Err(SessionError::Complete(self.day)),
        }
    }

    /// Compute the schedule that follows the user's judgment on the revealed paper.
    ///
    /// Nothing changes until [`commit`](Self::commit) is called.
    pub fn judge(&self, paper: &Paper, recalled: bool) -> Result<ReviewState, SessionError> {
        let expected = match self.phase {
            SessionPhase::Revealed(id) => id,
            SessionPhase::Presented(_) => return Err(SessionError::NotRevealed),
            SessionPhase::Idle => return Err(SessionError::NothingPresented),
            SessionPhase::Complete => return Err(SessionError::Complete(self.day)),
        };
        if paper.id != expected {
            return Err(SessionError::WrongPaper {
                expected,
                got: paper.id,
            });
        }
        paper
            .advance_review(recalled, self.day)
            .ok_or(SessionError::NotScheduled(paper.id))
    }

    /// Record that the judgment for `paper_id` has been persisted
    pub fn commit(&mut self, paper_id: Uuid) -> Result<&SessionPhase, SessionError> {
        match self.phase {
            SessionPhase::Revealed(id) if id == paper_id => {}
            SessionPhase::Revealed(id) => {
                return Err(SessionError::WrongPaper {
                    expected: id,
                    got: paper_id,
                })
            }
            SessionPhase::Presented(_) => return Err(SessionError::NotRevealed),
            SessionPhase::Idle => return Err(SessionError::NothingPresented),
            SessionPhase::Complete => return Err(SessionError::Complete(self.day)),
        }

        self.judged += 1;
        self.phase = if self.cap_reached() {
            SessionPhase::Complete
        } else {
            SessionPhase::Idle
        };
        log::debug!(
            "Committed review of {} ({}/{} today)",
            paper_id,
            self.judged,
            self.daily_cap
        );
        Ok(&self.phase)
    }

    /// Drop the current card without judging it
    pub fn skip(&mut self) {
        if matches!(
            self.phase,
            SessionPhase::Presented(_) | SessionPhase::Revealed(_)
        ) {
            self.phase = SessionPhase::Idle;
        }
    }
}
