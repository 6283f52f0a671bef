//! User settings stored in `data/settings.json`
//!
//! Every field has a default, so a missing or partial file yields a usable
//! configuration. Keys owned by other parts of the app (API keys, provider
//! choice, session length) are ignored; this crate never writes the file.

use serde::Deserialize;

pub const DEFAULT_DAILY_CAP: usize = 3;
pub const DEFAULT_MIN_CITABILITY: i32 = 7;

/// Due-queue policy
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ReviewSettings {
    /// Maximum number of judgments per calendar day
    #[serde(default = "default_daily_cap")]
    pub daily_cap: usize,
    /// Papers scoring below this are never offered for review
    #[serde(default = "default_min_citability")]
    pub min_citability: i32,
    /// Entries shown in the dashboard's upcoming list
    #[serde(default = "default_upcoming_limit")]
    pub upcoming_limit: usize,
}

fn default_daily_cap() -> usize {
    DEFAULT_DAILY_CAP
}

fn default_min_citability() -> i32 {
    DEFAULT_MIN_CITABILITY
}

fn default_upcoming_limit() -> usize {
    5
}

impl Default for ReviewSettings {
    fn default() -> Self {
        Self {
            daily_cap: default_daily_cap(),
            min_citability: default_min_citability(),
            upcoming_limit: default_upcoming_limit(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Settings {
    /// Relevance horizons an excerpt may choose from; 999 means "never expires"
    #[serde(default = "default_expiry_options")]
    pub expiry_options: Vec<u32>,
    #[serde(default)]
    pub review: ReviewSettings,
}

fn default_expiry_options() -> Vec<u32> {
    vec![1, 5, 10, 999]
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            expiry_options: default_expiry_options(),
            review: ReviewSettings::default(),
        }
    }
}
