use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;

use litlearn_lib::papers::Paper;
use litlearn_lib::review::{select_due_queue, ReviewSession, ReviewState};
use litlearn_lib::settings::Settings;
use litlearn_lib::storage::PaperStorage;

/// Shared application state for CLI commands
pub struct App {
    pub storage: PaperStorage,
    pub settings: Settings,
    /// Injected "now" for every date comparison
    pub today: NaiveDate,
}

impl App {
    /// Initialize from `data_dir`, or the default data directory
    pub fn new(data_dir: Option<PathBuf>, today: NaiveDate) -> Result<Self> {
        let data_dir = match data_dir {
            Some(dir) => dir,
            None => PaperStorage::default_data_dir().context("Failed to get data directory")?,
        };

        let storage = PaperStorage::new(data_dir);
        let settings = storage.load_settings().context("Failed to load settings")?;

        Ok(Self {
            storage,
            settings,
            today,
        })
    }

    pub fn list_papers(&self) -> Result<Vec<Paper>> {
        self.storage.list_papers().context("Failed to load papers")
    }

    /// Papers due today, earliest first
    pub fn due_queue<'a>(&self, papers: &'a [Paper]) -> Vec<&'a Paper> {
        select_due_queue(papers, self.today, &self.settings.review)
    }

    /// Session for today, counting judgments already stored today
    pub fn session(&self, papers: &[Paper]) -> ReviewSession {
        ReviewSession::resume(self.today, self.settings.review.daily_cap, papers)
    }

    /// Persist a judgment and return the stored paper
    pub fn save_review(&self, paper: &Paper, state: &ReviewState) -> Result<Paper> {
        self.storage
            .save_review_state(paper.id, state)
            .with_context(|| format!("Failed to save review of '{}'", paper.title))
    }

    /// Find a paper by id prefix, DOI, or title (case-insensitive prefix match)
    pub fn find_paper<'a>(&self, papers: &'a [Paper], query: &str) -> Result<&'a Paper> {
        let query_lower = query.trim().to_lowercase();
        if query_lower.is_empty() {
            bail!("Empty paper query");
        }

        // Exact DOI or title first
        if let Some(paper) = papers.iter().find(|p| {
            p.doi.to_lowercase() == query_lower || p.title.to_lowercase() == query_lower
        }) {
            return Ok(paper);
        }

        let matches: Vec<&Paper> = papers
            .iter()
            .filter(|p| {
                p.id.to_string().starts_with(&query_lower)
                    || p.title.to_lowercase().starts_with(&query_lower)
            })
            .collect();

        match matches.len() {
            0 => bail!("No paper matching '{}'", query),
            1 => Ok(matches[0]),
            _ => bail!(
                "Ambiguous paper '{}'. Matches:\n{}",
                query,
                matches
                    .iter()
                    .map(|p| format!("  - {} ({})", p.title, short_id(p)))
                    .collect::<Vec<_>>()
                    .join("\n")
            ),
        }
    }
}

/// First block of the UUID, enough to address a paper from the command line
pub fn short_id(paper: &Paper) -> String {
    paper.id.to_string()[..8].to_string()
}
