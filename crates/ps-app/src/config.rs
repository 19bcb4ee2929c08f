//! Application configuration
//!
//! Every field has a default, so an empty `{}` file (or no file at all) runs
//! against the published spreadsheet with the stores under `data/`.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use ps_core::FilterSpec;
use ps_data::SourceConfig;

/// Filter selectors as typed by the user; `TODAS`/`TODOS` or blank mean no restriction
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterSelection {
    pub organization: String,
    pub status: String,
    pub workshop: String,
    /// `YYYY-MM-DD`
    pub start_date: String,
    /// `YYYY-MM-DD`
    pub end_date: String,
}

impl FilterSelection {
    pub fn to_spec(&self) -> FilterSpec {
        FilterSpec {
            start_date: FilterSpec::date_bound(&self.start_date),
            end_date: FilterSpec::date_bound(&self.end_date),
            organization: FilterSpec::selector(&self.organization),
            status: FilterSpec::selector(&self.status),
            workshop: FilterSpec::selector(&self.workshop),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub source: SourceConfig,

    /// JSON list of dispatched record keys
    pub dispatch_state_path: PathBuf,

    /// JSON map of workshop name to e-mail address
    pub workshop_emails_path: PathBuf,

    /// Send budget requests for queued orders that were not notified yet
    pub dispatch_pending: bool,

    /// Directory receiving a report after each refresh
    pub report_dir: Option<PathBuf>,

    pub filter: FilterSelection,

    /// Run a single refresh cycle and exit
    pub once: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            source: SourceConfig::default(),
            dispatch_state_path: PathBuf::from("data/dispatched_emails.json"),
            workshop_emails_path: PathBuf::from("data/workshop_emails.json"),
            dispatch_pending: false,
            report_dir: None,
            filter: FilterSelection::default(),
            once: false,
        }
    }
}

impl AppConfig {
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        serde_json::from_str(&text).with_context(|| format!("Invalid config {}", path.display()))
    }

    /// Config from the first CLI argument, or defaults when none is given
    pub fn from_args(mut args: impl Iterator<Item = String>) -> Result<Self> {
        match args.nth(1) {
            Some(path) => Self::from_json_file(Path::new(&path)),
            None => Ok(Self::default()),
        }
    }
}
