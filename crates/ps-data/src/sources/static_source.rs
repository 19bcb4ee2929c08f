//! In-memory export, used for demos and tests

use async_trait::async_trait;

/// Source that always returns the same text
pub struct StaticSource {
    name: String,
    text: String,
}

impl StaticSource {
    pub fn new(name: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            text: text.into(),
        }
    }
}

#[async_trait]
impl ps_core::data::DataSource for StaticSource {
    async fn fetch_text(&self) -> anyhow::Result<String> {
        Ok(self.text.clone())
    }

    fn source_name(&self) -> &str {
        &self.name
    }
}
