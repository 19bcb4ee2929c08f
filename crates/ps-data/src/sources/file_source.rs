//! Spreadsheet export read from disk

use std::path::PathBuf;

use async_trait::async_trait;

use crate::DataError;

/// CSV export saved as a local file
pub struct FileCsvSource {
    path: PathBuf,
}

impl FileCsvSource {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    async fn read(&self) -> Result<String, DataError> {
        let path = self.path.clone();
        tokio::task::spawn_blocking(move || std::fs::read_to_string(&path))
            .await?
            .map_err(DataError::from)
    }
}

#[async_trait]
impl ps_core::data::DataSource for FileCsvSource {
    async fn fetch_text(&self) -> anyhow::Result<String> {
        self.read().await.map_err(|e| e.into())
    }

    fn source_name(&self) -> &str {
        self.path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("unknown.csv")
    }
}
