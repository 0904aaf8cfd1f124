//! Render job configuration
//!
//! A JSON document such as:
//!
//! ```json
//! {
//!     "repo_path": "/path/to/project",
//!     "output_image_path": "history.png",
//!     "commit_date": "2022-01-01"
//! }
//! ```
//!
//! Optional keys: `reference` (defaults to HEAD), `max_depth` (at least 1),
//! `verify_hashes`, `merge_edges`.

use anyhow::Context;
use chrono::{DateTime, NaiveDate};
use serde::Deserialize;
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Config {
    pub repo_path: PathBuf,
    pub output_image_path: PathBuf,
    pub commit_date: CommitDate,
    #[serde(default)]
    pub reference: Option<String>,
    #[serde(default)]
    pub max_depth: Option<NonZeroUsize>,
    #[serde(default)]
    pub verify_hashes: bool,
    #[serde(default)]
    pub merge_edges: bool,
}

impl Config {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Unable to read config file {}", path.display()))?;

        Self::parse(&content).with_context(|| format!("Invalid config file {}", path.display()))
    }

    pub fn parse(content: &str) -> anyhow::Result<Self> {
        Ok(serde_json::from_str(content)?)
    }
}

/// Inclusive lower bound for commit timestamps
///
/// Parsed from an ISO date (`2022-01-01`, meaning midnight UTC) or an
/// RFC 3339 timestamp (`2022-01-01T12:00:00+02:00`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(try_from = "String")]
pub struct CommitDate(i64);

impl CommitDate {
    pub fn parse(value: &str) -> anyhow::Result<Self> {
        let value = value.trim();

        if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
            let midnight = date
                .and_hms_opt(0, 0, 0)
                .context("midnight is always a valid time")?;
            return Ok(CommitDate(midnight.and_utc().timestamp()));
        }

        DateTime::parse_from_rfc3339(value)
            .map(|datetime| CommitDate(datetime.timestamp()))
            .with_context(|| {
                format!("Invalid commit date '{value}': expected YYYY-MM-DD or RFC 3339")
            })
    }

    pub fn timestamp(&self) -> i64 {
        self.0
    }
}

impl TryFrom<String> for CommitDate {
    type Error = anyhow::Error;

    fn try_from(value: String) -> anyhow::Result<Self> {
        Self::parse(&value)
    }
}

impl std::str::FromStr for CommitDate {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        Self::parse(s)
    }
}
