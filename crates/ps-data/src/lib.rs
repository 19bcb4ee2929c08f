//! Ingestion and aggregation for the PS control dashboard

pub mod aggregate;
pub mod config;
pub mod loader;
pub mod parser;
pub mod sources;
pub mod state;

use thiserror::Error;
use tokio::task::JoinError;

// Re-exports
pub use aggregate::{DashboardView, FilterOptions, KpiStats, MonthBucket};
pub use config::SourceConfig;
pub use loader::load_dataset;
pub use parser::parse_dataset;
pub use sources::{FileCsvSource, HttpCsvSource, StaticSource};
pub use state::DashboardContext;

/// Errors that can occur in data operations
#[derive(Error, Debug)]
pub enum DataError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Unexpected HTTP status {status} from {url}")]
    Status { status: u16, url: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Join error: {0}")]
    Join(#[from] JoinError),
}
