//! Data models for paper records
//!
//! Field names follow the snake_case layout of `data/papers.json`. Keys this
//! crate does not model are carried in `extra` so that writing a paper back
//! never drops data owned by the import, reading, or AI tooling.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;
use uuid::Uuid;

use crate::dates::{
    deserialize_lenient, deserialize_lenient_option, deserialize_or_default,
    deserialize_valid_entries,
};
use crate::review::algorithm;
use crate::review::models::ReviewState;

/// `expiry_years` value meaning the paper stays relevant forever
pub const NEVER_EXPIRES: u32 = 999;

/// Minimum length of the final main-claims text for a completed excerpt
pub const MIN_MAIN_CLAIMS_CHARS: usize = 50;

/// Minimum number of final topics for a completed excerpt
pub const MIN_TOPICS: usize = 2;

/// Where a paper is in the triage workflow
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum PaperStatus {
    /// Imported but not yet opened
    #[default]
    Inbox,
    /// Excerpt in progress
    Reading,
    /// Excerpt completed; eligible for review scheduling
    Completed,
    /// Written by a newer or foreign tool; kept verbatim
    Other(String),
}

impl PaperStatus {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Inbox => "inbox",
            Self::Reading => "reading",
            Self::Completed => "completed",
            Self::Other(s) => s,
        }
    }
}

impl From<String> for PaperStatus {
    fn from(s: String) -> Self {
        match s.as_str() {
            "inbox" => Self::Inbox,
            "reading" => Self::Reading,
            "completed" => Self::Completed,
            _ => Self::Other(s),
        }
    }
}

impl From<PaperStatus> for String {
    fn from(status: PaperStatus) -> Self {
        match status {
            PaperStatus::Other(s) => s,
            other => other.as_str().to_string(),
        }
    }
}

impl std::fmt::Display for PaperStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One excerpt field as drafted by the user, suggested by the AI, and finally adopted
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, bound(deserialize = "T: serde::de::DeserializeOwned + Default"))]
pub struct ExcerptField<T> {
    #[serde(deserialize_with = "deserialize_or_default")]
    pub user_input: T,
    #[serde(deserialize_with = "deserialize_or_default")]
    pub ai_suggestion: T,
    #[serde(rename = "final", deserialize_with = "deserialize_or_default")]
    pub final_value: T,
}

impl<T> ExcerptField<T> {
    pub fn adopted(value: T) -> Self
    where
        T: Clone + Default,
    {
        Self {
            user_input: value.clone(),
            ai_suggestion: T::default(),
            final_value: value,
        }
    }
}

/// How long a paper stays relevant after it was added
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Relevance {
    Years(u32),
    Indefinite,
}

impl Relevance {
    /// Missing, zero, and the 999 sentinel all mean "never expires".
    pub fn from_years(years: Option<u32>) -> Self {
        match years {
            None | Some(0) | Some(NEVER_EXPIRES) => Self::Indefinite,
            Some(n) => Self::Years(n),
        }
    }
}

/// Structured notes recorded while reading a paper
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Excerpt {
    #[serde(default, deserialize_with = "deserialize_or_default")]
    pub main_claims: ExcerptField<String>,
    #[serde(default, deserialize_with = "deserialize_or_default")]
    pub topics: ExcerptField<Vec<String>>,
    #[serde(default, deserialize_with = "deserialize_or_default")]
    pub key_concepts: ExcerptField<Vec<String>>,
    #[serde(default, deserialize_with = "deserialize_or_default")]
    pub critical_notes: ExcerptField<String>,
    /// Research quality / relevance score, 1-10. `null` or non-numeric reads as 0.
    #[serde(default, deserialize_with = "deserialize_or_default")]
    pub citability: i32,
    #[serde(default, deserialize_with = "deserialize_valid_entries")]
    pub relevant_projects: Vec<String>,
    #[serde(
        default,
        deserialize_with = "deserialize_lenient_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub expiry_years: Option<u32>,
    #[serde(
        default,
        deserialize_with = "deserialize_lenient",
        skip_serializing_if = "Option::is_none"
    )]
    pub completed_date: Option<NaiveDate>,
    #[serde(
        default,
        deserialize_with = "deserialize_lenient_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub time_spent_minutes: Option<u32>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Excerpt {
    pub fn relevance(&self) -> Relevance {
        Relevance::from_years(self.expiry_years)
    }

    /// Check the fields a completed excerpt must have
    pub fn validate(&self) -> Result<(), ExcerptError> {
        let claims = self.main_claims.final_value.trim().chars().count();
        if claims < MIN_MAIN_CLAIMS_CHARS {
            return Err(ExcerptError::MainClaimsTooShort(claims));
        }
        let topics = self
            .topics
            .final_value
            .iter()
            .filter(|t| !t.trim().is_empty())
            .count();
        if topics < MIN_TOPICS {
            return Err(ExcerptError::TooFewTopics(topics));
        }
        if !(1..=10).contains(&self.citability) {
            return Err(ExcerptError::CitabilityOutOfRange(self.citability));
        }
        Ok(())
    }

    /// Check `expiry_years` against the configured horizons. A missing value is allowed.
    pub fn validate_expiry(&self, options: &[u32]) -> Result<(), ExcerptError> {
        match self.expiry_years {
            Some(years) if !options.contains(&years) => Err(ExcerptError::UnsupportedExpiry(years)),
            _ => Ok(()),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExcerptError {
    #[error("Main claims need at least 50 characters (got {0})")]
    MainClaimsTooShort(usize),

    #[error("At least 2 topics are required (got {0})")]
    TooFewTopics(usize),

    #[error("Citability must be between 1 and 10 (got {0})")]
    CitabilityOutOfRange(i32),

    #[error("Expiry of {0} years is not one of the configured options")]
    UnsupportedExpiry(u32),
}

/// A paper record as stored in `papers.json`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Paper {
    pub id: Uuid,
    #[serde(default, deserialize_with = "deserialize_or_default")]
    pub doi: String,
    #[serde(default, deserialize_with = "deserialize_or_default")]
    pub title: String,
    #[serde(default, deserialize_with = "deserialize_or_default")]
    pub status: PaperStatus,
    #[serde(default, deserialize_with = "deserialize_lenient")]
    pub added_date: Option<NaiveDate>,
    #[serde(
        default,
        deserialize_with = "deserialize_lenient_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub excerpt: Option<Excerpt>,
    #[serde(
        default,
        rename = "spaced_repetition",
        deserialize_with = "deserialize_lenient_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub review_state: Option<ReviewState>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Paper {
    pub fn new(doi: String, title: String, added_date: NaiveDate) -> Self {
        Self {
            id: Uuid::new_v4(),
            doi,
            title,
            status: PaperStatus::Inbox,
            added_date: Some(added_date),
            excerpt: None,
            review_state: None,
            extra: Map::new(),
        }
    }

    pub fn is_completed(&self) -> bool {
        self.status == PaperStatus::Completed
    }

    pub fn relevance(&self) -> Relevance {
        self.excerpt
            .as_ref()
            .map_or(Relevance::Indefinite, Excerpt::relevance)
    }

    pub fn citability(&self) -> i32 {
        self.excerpt.as_ref().map_or(0, |e| e.citability)
    }

    pub fn has_projects(&self) -> bool {
        self.excerpt
            .as_ref()
            .is_some_and(|e| !e.relevant_projects.is_empty())
    }

    /// Mark the excerpt as finished and start the review schedule.
    ///
    /// Re-completing a paper replaces the excerpt but keeps an existing
    /// review state, so its history and interval are not lost.
    pub fn complete(&mut self, mut excerpt: Excerpt, today: NaiveDate) -> Result<(), ExcerptError> {
        excerpt.validate()?;
        excerpt.completed_date = Some(today);
        self.excerpt = Some(excerpt);
        self.status = PaperStatus::Completed;
        if self.review_state.is_none() {
            self.review_state = Some(ReviewState::initial(today));
        }
        Ok(())
    }

    /// Compute the review state that follows a recall judgment made `today`.
    ///
    /// Returns `None` for papers that were never scheduled.
    pub fn advance_review(&self, recalled: bool, today: NaiveDate) -> Option<ReviewState> {
        let state = self.review_state.as_ref()?;
        Some(algorithm::advance(
            state,
            recalled,
            self.added_date,
            self.relevance(),
            today,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn valid_excerpt() -> Excerpt {
        Excerpt {
            main_claims: ExcerptField::adopted(
                "Spacing reviews on a growing schedule improves long-term retention.".to_string(),
            ),
            topics: ExcerptField::adopted(vec!["memory".to_string(), "learning".to_string()]),
            citability: 8,
            relevant_projects: vec!["ExamLens".to_string()],
            expiry_years: Some(5),
            ..Default::default()
        }
    }

    #[test]
    fn test_relevance_sentinels() {
        assert_eq!(Relevance::from_years(None), Relevance::Indefinite);
        assert_eq!(Relevance::from_years(Some(0)), Relevance::Indefinite);
        assert_eq!(Relevance::from_years(Some(999)), Relevance::Indefinite);
        assert_eq!(Relevance::from_years(Some(5)), Relevance::Years(5));
    }

    #[test]
    fn test_complete_seeds_review_state() {
        let mut paper = Paper::new("10.1000/xyz".to_string(), "Spacing".to_string(), date("2024-01-01"));
        paper.status = PaperStatus::Reading;

        paper.complete(valid_excerpt(), date("2024-02-01")).unwrap();

        assert!(paper.is_completed());
        let state = paper.review_state.as_ref().unwrap();
        assert_eq!(state.fibonacci_index, 0);
        assert_eq!(state.current_interval_weeks, 1);
        assert_eq!(state.next_review_date, Some(date("2024-02-08")));
        assert!(state.review_history.is_empty());
        assert!(!state.expired);
        assert_eq!(paper.excerpt.as_ref().unwrap().completed_date, Some(date("2024-02-01")));
    }

    #[test]
    fn test_complete_rejects_short_claims() {
        let mut paper = Paper::new("10.1000/xyz".to_string(), "Spacing".to_string(), date("2024-01-01"));
        let mut excerpt = valid_excerpt();
        excerpt.main_claims = ExcerptField::adopted("Too short".to_string());

        let err = paper.complete(excerpt, date("2024-02-01")).unwrap_err();
        assert_eq!(err, ExcerptError::MainClaimsTooShort(9));
        assert_eq!(paper.status, PaperStatus::Inbox);
        assert!(paper.review_state.is_none());
    }

    #[test]
    fn test_complete_rejects_single_topic() {
        let mut paper = Paper::new("10.1000/xyz".to_string(), "Spacing".to_string(), date("2024-01-01"));
        let mut excerpt = valid_excerpt();
        excerpt.topics = ExcerptField::adopted(vec!["memory".to_string(), " ".to_string()]);

        assert_eq!(
            paper.complete(excerpt, date("2024-02-01")),
            Err(ExcerptError::TooFewTopics(1))
        );
    }

    #[test]
    fn test_recomplete_keeps_history() {
        let mut paper = Paper::new("10.1000/xyz".to_string(), "Spacing".to_string(), date("2024-01-01"));
        paper.complete(valid_excerpt(), date("2024-02-01")).unwrap();
        let advanced = paper.advance_review(true, date("2024-02-08")).unwrap();
        paper.review_state = Some(advanced);

        paper.complete(valid_excerpt(), date("2024-03-01")).unwrap();

        assert_eq!(paper.review_state.as_ref().unwrap().review_history.len(), 1);
    }

    #[test]
    fn test_advance_review_without_state() {
        let paper = Paper::new("10.1000/xyz".to_string(), "Spacing".to_string(), date("2024-01-01"));
        assert!(paper.advance_review(true, date("2024-02-01")).is_none());
    }

    #[test]
    fn test_deserialize_original_layout() {
        let json = r#"{
            "id": "6f1c2a52-3c1e-4d7a-9a43-0f2b1d7c9e11",
            "doi": "10.1000/abc",
            "title": "Retrieval practice",
            "added_date": "2024-01-01",
            "status": "completed",
            "pdf_path": "pdfs/abc.pdf",
            "excerpt": {
                "main_claims": {"user_input": "a", "ai_suggestion": "", "final": "claims"},
                "topics": {"user_input": ["x"], "ai_suggestion": [], "final": ["x", "y"]},
                "citability": 9,
                "relevant_projects": ["ExplAIner"],
                "expiry_years": 999,
                "completed_date": "2024-01-05"
            },
            "spaced_repetition": {
                "next_review_date": "2024-01-12",
                "current_interval_weeks": 1,
                "fibonacci_index": 0,
                "review_history": [],
                "expired": false
            }
        }"#;

        let paper: Paper = serde_json::from_str(json).unwrap();
        assert!(paper.is_completed());
        assert_eq!(paper.citability(), 9);
        assert_eq!(paper.relevance(), Relevance::Indefinite);
        assert_eq!(paper.extra.get("pdf_path"), Some(&Value::from("pdfs/abc.pdf")));

        let out = serde_json::to_value(&paper).unwrap();
        assert_eq!(out["pdf_path"], "pdfs/abc.pdf");
        assert_eq!(out["spaced_repetition"]["next_review_date"], "2024-01-12");
        assert_eq!(out["excerpt"]["main_claims"]["final"], "claims");
    }

    #[test]
    fn test_deserialize_permissive() {
        let json = r#"{
            "id": "6f1c2a52-3c1e-4d7a-9a43-0f2b1d7c9e11",
            "status": "archived",
            "added_date": "not a date",
            "excerpt": {}
        }"#;

        let paper: Paper = serde_json::from_str(json).unwrap();
        assert_eq!(paper.status, PaperStatus::Other("archived".to_string()));
        assert_eq!(paper.added_date, None);
        assert_eq!(paper.citability(), 0);
        assert!(!paper.has_projects());

        let out = serde_json::to_value(&paper).unwrap();
        assert_eq!(out["status"], "archived");
    }

    #[test]
    fn test_deserialize_null_fields() {
        let json = r#"{
            "id": "6f1c2a52-3c1e-4d7a-9a43-0f2b1d7c9e11",
            "doi": null,
            "title": "Retrieval practice",
            "status": "completed",
            "added_date": "2024-01-01",
            "excerpt": {
                "main_claims": {"user_input": null, "ai_suggestion": "", "final": "claims"},
                "topics": null,
                "citability": null,
                "relevant_projects": ["ExamLens", null],
                "expiry_years": null
            },
            "spaced_repetition": {"next_review_date": "2024-01-08", "fibonacci_index": null}
        }"#;

        let paper: Paper = serde_json::from_str(json).unwrap();
        assert_eq!(paper.doi, "");
        assert_eq!(paper.citability(), 0);
        assert_eq!(paper.relevance(), Relevance::Indefinite);
        let excerpt = paper.excerpt.as_ref().unwrap();
        assert_eq!(excerpt.main_claims.final_value, "claims");
        assert!(excerpt.topics.final_value.is_empty());
        assert_eq!(excerpt.relevant_projects, vec!["ExamLens"]);
        assert_eq!(paper.review_state.as_ref().unwrap().fibonacci_index, 0);
    }
}
