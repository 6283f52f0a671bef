//! JSON-file storage for papers and settings
//!
//! Directory structure:
//! ```text
//! {base}/data/
//! ├── papers.json     # { "papers": [...] }
//! └── settings.json   # Settings, missing keys take defaults
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::papers::{Excerpt, ExcerptError, Paper};
use crate::review::ReviewState;
use crate::settings::Settings;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Paper not found: {0}")]
    PaperNotFound(Uuid),

    #[error("Data directory not found")]
    DataDirNotFound,

    #[error("Invalid excerpt: {0}")]
    Excerpt(#[from] ExcerptError),
}

pub type Result<T> = std::result::Result<T, StorageError>;

#[derive(Debug, Default, Serialize, Deserialize)]
struct PapersFile {
    #[serde(default)]
    papers: Vec<Paper>,
}

/// Storage manager for the paper collection
pub struct PaperStorage {
    /// Root folder chosen by the user; holds `data/` and `pdfs/`
    base_path: PathBuf,
}

impl PaperStorage {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    /// Get the default data directory
    pub fn default_data_dir() -> Result<PathBuf> {
        dirs::data_local_dir()
            .map(|p| p.join("litlearn"))
            .ok_or(StorageError::DataDirNotFound)
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    fn data_dir(&self) -> PathBuf {
        self.base_path.join("data")
    }

    fn papers_path(&self) -> PathBuf {
        self.data_dir().join("papers.json")
    }

    fn settings_path(&self) -> PathBuf {
        self.data_dir().join("settings.json")
    }

    /// Initialize storage directories
    pub fn init(&self) -> Result<()> {
        fs::create_dir_all(self.data_dir())?;
        Ok(())
    }

    /// Write to a sibling `.tmp` file, then rename over the target
    fn write_atomic(&self, path: &Path, json: String) -> Result<()> {
        self.init()?;
        let tmp_path = path.with_extension("json.tmp");
        fs::write(&tmp_path, json)?;
        fs::rename(&tmp_path, path)?;
        Ok(())
    }

    // ==================== Paper Operations ====================

    /// List all papers in file order
    pub fn list_papers(&self) -> Result<Vec<Paper>> {
        let path = self.papers_path();
        if !path.exists() {
            return Ok(Vec::new());
        }

        let content = fs::read_to_string(&path)?;
        let file: PapersFile = serde_json::from_str(&content)?;
        log::debug!("Loaded {} papers from {:?}", file.papers.len(), path);
        Ok(file.papers)
    }

    /// Replace the whole collection
    pub fn save_papers(&self, papers: &[Paper]) -> Result<()> {
        #[derive(Serialize)]
        struct PapersFileRef<'a> {
            papers: &'a [Paper],
        }

        let json = serde_json::to_string_pretty(&PapersFileRef { papers })?;
        self.write_atomic(&self.papers_path(), json)
    }

    pub fn get_paper(&self, paper_id: Uuid) -> Result<Paper> {
        self.list_papers()?
            .into_iter()
            .find(|p| p.id == paper_id)
            .ok_or(StorageError::PaperNotFound(paper_id))
    }

    /// Replace one paper, keeping its position in the collection
    pub fn update_paper(&self, paper: &Paper) -> Result<()> {
        let mut papers = self.list_papers()?;
        let pos = papers
            .iter()
            .position(|p| p.id == paper.id)
            .ok_or(StorageError::PaperNotFound(paper.id))?;

        papers[pos] = paper.clone();
        self.save_papers(&papers)
    }

    // ==================== Review Operations ====================

    /// Store a paper's new review state and return the updated paper
    pub fn save_review_state(&self, paper_id: Uuid, state: &ReviewState) -> Result<Paper> {
        let mut papers = self.list_papers()?;
        let paper = papers
            .iter_mut()
            .find(|p| p.id == paper_id)
            .ok_or(StorageError::PaperNotFound(paper_id))?;

        paper.review_state = Some(state.clone());
        let updated = paper.clone();
        self.save_papers(&papers)?;

        log::info!(
            "Saved review for {}: next {:?}, interval {}w{}",
            paper_id,
            state.next_review_date,
            state.current_interval_weeks,
            if state.expired { ", expired" } else { "" }
        );
        Ok(updated)
    }

    /// Complete a paper's excerpt and start its review schedule.
    ///
    /// The excerpt's `expiry_years` must be one of the configured `expiry_options`.
    pub fn complete_paper(&self, paper_id: Uuid, excerpt: Excerpt, today: NaiveDate) -> Result<Paper> {
        let settings = self.load_settings()?;
        excerpt.validate_expiry(&settings.expiry_options)?;

        let mut paper = self.get_paper(paper_id)?;
        paper.complete(excerpt, today)?;
        self.update_paper(&paper)?;
        log::info!("Completed excerpt for {} ({})", paper.title, paper_id);
        Ok(paper)
    }

    // ==================== Settings ====================

    pub fn load_settings(&self) -> Result<Settings> {
        let path = self.settings_path();
        if !path.exists() {
            return Ok(Settings::default());
        }

        let content = fs::read_to_string(&path)?;
        let settings: Settings = serde_json::from_str(&content)?;
        Ok(settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::papers::{ExcerptField, PaperStatus};
    use tempfile::TempDir;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn create_test_storage() -> (PaperStorage, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let storage = PaperStorage::new(temp_dir.path().to_path_buf());
        (storage, temp_dir)
    }

    fn excerpt() -> Excerpt {
        Excerpt {
            main_claims: ExcerptField::adopted(
                "Interleaved practice beats blocked practice for category learning tasks.".to_string(),
            ),
            topics: ExcerptField::adopted(vec!["interleaving".to_string(), "practice".to_string()]),
            citability: 8,
            relevant_projects: vec!["LearningGoalHub".to_string()],
            expiry_years: Some(10),
            ..Default::default()
        }
    }

    #[test]
    fn test_missing_files_are_empty() {
        let (storage, _temp) = create_test_storage();
        assert!(storage.list_papers().unwrap().is_empty());
        assert_eq!(storage.load_settings().unwrap(), Settings::default());
    }

    #[test]
    fn test_save_and_list_papers() {
        let (storage, _temp) = create_test_storage();
        let papers = vec![
            Paper::new("10.1000/a".to_string(), "A".to_string(), date("2024-01-01")),
            Paper::new("10.1000/b".to_string(), "B".to_string(), date("2024-01-02")),
        ];

        storage.save_papers(&papers).unwrap();

        let loaded = storage.list_papers().unwrap();
        assert_eq!(loaded, papers);
        assert!(!storage.papers_path().with_extension("json.tmp").exists());

        let raw: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(storage.papers_path()).unwrap()).unwrap();
        assert_eq!(raw["papers"][1]["doi"], "10.1000/b");
    }

    #[test]
    fn test_complete_and_save_review_state() {
        let (storage, _temp) = create_test_storage();
        let paper = Paper::new("10.1000/a".to_string(), "A".to_string(), date("2024-01-01"));
        let other = Paper::new("10.1000/b".to_string(), "B".to_string(), date("2024-01-01"));
        storage.save_papers(&[paper.clone(), other.clone()]).unwrap();

        let completed = storage.complete_paper(paper.id, excerpt(), date("2024-02-01")).unwrap();
        assert_eq!(completed.status, PaperStatus::Completed);

        let next = completed.advance_review(true, date("2024-02-08")).unwrap();
        let updated = storage.save_review_state(paper.id, &next).unwrap();
        assert_eq!(updated.review_state.as_ref(), Some(&next));

        let loaded = storage.list_papers().unwrap();
        assert_eq!(loaded[0].id, paper.id);
        assert_eq!(loaded[0].review_state.as_ref().unwrap().fibonacci_index, 1);
        assert_eq!(loaded[1], other);
    }

    #[test]
    fn test_complete_invalid_excerpt_leaves_file() {
        let (storage, _temp) = create_test_storage();
        let paper = Paper::new("10.1000/a".to_string(), "A".to_string(), date("2024-01-01"));
        storage.save_papers(&[paper.clone()]).unwrap();

        let mut bad = excerpt();
        bad.citability = 11;
        let result = storage.complete_paper(paper.id, bad, date("2024-02-01"));

        assert!(matches!(result, Err(StorageError::Excerpt(ExcerptError::CitabilityOutOfRange(11)))));
        assert_eq!(storage.get_paper(paper.id).unwrap(), paper);
    }

    #[test]
    fn test_unknown_paper() {
        let (storage, _temp) = create_test_storage();
        let id = Uuid::new_v4();
        let state = ReviewState::initial(date("2024-01-01"));
        assert!(matches!(
            storage.save_review_state(id, &state),
            Err(StorageError::PaperNotFound(missing)) if missing == id
        ));
    }

    #[test]
    fn test_complete_checks_expiry_options() {
        let (storage, _temp) = create_test_storage();
        let paper = Paper::new("10.1000/a".to_string(), "A".to_string(), date("2024-01-01"));
        storage.save_papers(&[paper.clone()]).unwrap();
        fs::write(
            storage.settings_path(),
            r#"{"api_key": "sk-test", "expiry_options": [2, 999]}"#,
        )
        .unwrap();

        let result = storage.complete_paper(paper.id, excerpt(), date("2024-02-01"));
        assert!(matches!(result, Err(StorageError::Excerpt(ExcerptError::UnsupportedExpiry(10)))));
        assert_eq!(storage.get_paper(paper.id).unwrap(), paper);

        let mut allowed = excerpt();
        allowed.expiry_years = Some(2);
        let completed = storage.complete_paper(paper.id, allowed, date("2024-02-01")).unwrap();
        assert_eq!(completed.relevance(), crate::papers::Relevance::Years(2));
    }

    #[test]
    fn test_null_fields_do_not_block_loading() {
        let (storage, _temp) = create_test_storage();
        storage.init().unwrap();
        fs::write(
            storage.papers_path(),
            r#"{"papers": [
                {
                    "id": "6f1c2a52-3c1e-4d7a-9a43-0f2b1d7c9e11",
                    "title": "Spacing effects",
                    "status": "completed",
                    "added_date": "2024-01-01",
                    "excerpt": {"citability": null, "relevant_projects": ["ExamLens"]},
                    "spaced_repetition": {
                        "next_review_date": "2024-01-08",
                        "current_interval_weeks": 1,
                        "fibonacci_index": null,
                        "review_history": []
                    }
                },
                {
                    "id": "0d8e3b1a-7f42-4c55-8e21-5a9b6c3d2e10",
                    "title": "Testing effect",
                    "status": "inbox"
                }
            ]}"#,
        )
        .unwrap();

        let papers = storage.list_papers().unwrap();
        assert_eq!(papers.len(), 2);
        assert_eq!(papers[0].citability(), 0);
        assert_eq!(papers[0].review_state.as_ref().unwrap().fibonacci_index, 0);
        assert_eq!(papers[1].title, "Testing effect");

        // Rewriting replaces the nulls with their defaults
        let next = papers[0].advance_review(true, date("2024-01-08")).unwrap();
        let updated = storage.save_review_state(papers[0].id, &next).unwrap();
        assert_eq!(updated.review_state.as_ref().unwrap().fibonacci_index, 1);
        let raw: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(storage.papers_path()).unwrap()).unwrap();
        assert_eq!(raw["papers"][0]["excerpt"]["citability"], 0);
        assert_eq!(raw["papers"][0]["spaced_repetition"]["fibonacci_index"], 1);
    }
}
