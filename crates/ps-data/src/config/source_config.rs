//! Configuration for where the spreadsheet export comes from

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use ps_core::DataSource;

use crate::sources::{FileCsvSource, HttpCsvSource};
use crate::DataError;

/// Published CSV export of the control spreadsheet
pub const DEFAULT_SHEET_CSV_URL: &str = "https://docs.google.com/spreadsheets/d/1nQwuzcJYp3FXLgcyMjAQbwTZSBy5xGHcyQqAlZYuajg/export?format=csv&gid=0";

/// Where the export is read from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceLocation {
    Url(String),
    File(PathBuf),
}

/// Source configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    /// Export location
    pub location: SourceLocation,

    /// How often the dataset is re-fetched, e.g. `"5m"`
    pub refresh_interval: String,

    /// HTTP request timeout, e.g. `"30s"`
    pub request_timeout: String,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            location: SourceLocation::Url(DEFAULT_SHEET_CSV_URL.to_string()),
            refresh_interval: "5m".to_string(),
            request_timeout: "30s".to_string(),
        }
    }
}

impl SourceConfig {
    /// Configuration reading a local export
    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self {
            location: SourceLocation::File(path.into()),
            ..Self::default()
        }
    }

    /// Get the source name (file name or URL)
    pub fn source_name(&self) -> String {
        match &self.location {
            SourceLocation::Url(url) => url.clone(),
            SourceLocation::File(path) => path
                .file_name()
                .and_then(|n| n.to_str())
                .unwrap_or("unknown.csv")
                .to_string(),
        }
    }

    pub fn refresh_interval(&self) -> Result<Duration, DataError> {
        parse_duration_field("refresh_interval", &self.refresh_interval)
    }

    pub fn request_timeout(&self) -> Result<Duration, DataError> {
        parse_duration_field("request_timeout", &self.request_timeout)
    }

    /// Build the data source this configuration points at
    pub fn build_source(&self) -> Result<Arc<dyn DataSource>, DataError> {
        match &self.location {
            SourceLocation::Url(url) => Ok(Arc::new(HttpCsvSource::new(url.clone(), self.request_timeout()?)?)),
            SourceLocation::File(path) => Ok(Arc::new(FileCsvSource::new(path.clone()))),
        }
    }

    /// Load from a JSON file; missing fields take their defaults
    pub fn from_json_file(path: &Path) -> Result<Self, DataError> {
        let text = std::fs::read_to_string(path)?;
        serde_json::from_str(&text).map_err(|e| DataError::Config(format!("{}: {}", path.display(), e)))
    }
}

fn parse_duration_field(name: &str, value: &str) -> Result<Duration, DataError> {
    humantime::parse_duration(value.trim())
        .map_err(|e| DataError::Config(format!("invalid {} '{}': {}", name, value, e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_points_at_sheet() {
        let config = SourceConfig::default();
        assert_eq!(config.location, SourceLocation::Url(DEFAULT_SHEET_CSV_URL.to_string()));
        assert_eq!(config.refresh_interval().unwrap(), Duration::from_secs(300));
        assert_eq!(config.request_timeout().unwrap(), Duration::from_secs(30));
    }

    #[test]
    fn test_invalid_interval_is_config_error() {
        let config = SourceConfig {
            refresh_interval: "soon".to_string(),
            ..SourceConfig::default()
        };
        assert!(matches!(config.refresh_interval(), Err(DataError::Config(_))));
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: SourceConfig =
            serde_json::from_str(r#"{ "location": { "file": "/tmp/ps.csv" }, "refresh_interval": "1m" }"#).unwrap();
        assert_eq!(config.location, SourceLocation::File(PathBuf::from("/tmp/ps.csv")));
        assert_eq!(config.refresh_interval().unwrap(), Duration::from_secs(60));
        assert_eq!(config.request_timeout, "30s");
        assert_eq!(config.source_name(), "ps.csv");
    }

    #[tokio::test]
    async fn test_file_config_builds_file_source() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("export.csv");
        std::fs::write(&path, "OM,PS\nCFN,1\n").unwrap();

        let config = SourceConfig::file(&path);
        assert_eq!(config.source_name(), "export.csv");
        assert_eq!(config.refresh_interval, "5m");

        let source = config.build_source().unwrap();
        assert_eq!(source.source_name(), "export.csv");
        assert_eq!(source.fetch_text().await.unwrap(), "OM,PS\nCFN,1\n");
    }
}
