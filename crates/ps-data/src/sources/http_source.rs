//! Spreadsheet export fetched over HTTP

use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, info};

use crate::DataError;

/// CSV export served at a URL (the published spreadsheet link)
pub struct HttpCsvSource {
    url: String,
    client: reqwest::Client,
}

impl HttpCsvSource {
    /// Create a new HTTP source with a request timeout
    pub fn new(url: String, timeout: Duration) -> Result<Self, DataError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        info!("Creating HttpCsvSource for {}", url);
        Ok(Self { url, client })
    }

    /// Fetch the export body; non-success statuses are errors
    async fn fetch(&self) -> Result<String, DataError> {
        let response = self.client.get(&self.url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(DataError::Status {
                status: status.as_u16(),
                url: self.url.clone(),
            });
        }

        let text = response.text().await?;
        debug!(bytes = text.len(), "Fetched spreadsheet export");
        Ok(text)
    }
}

#[async_trait]
impl ps_core::data::DataSource for HttpCsvSource {
    async fn fetch_text(&self) -> anyhow::Result<String> {
        self.fetch().await.map_err(|e| e.into())
    }

    fn source_name(&self) -> &str {
        &self.url
    }
}
