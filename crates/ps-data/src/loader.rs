//! Fetch-and-parse entry point

use tracing::{error, info};

use ps_core::events::DatasetFetchFailed;
use ps_core::{DataSource, EventBus, ServiceOrder};

use crate::parser::parse_dataset;

/// Fetch the export from `source` and parse it.
///
/// A failed fetch yields an empty dataset. The failure is only visible in the
/// log and, when a bus is given, as a [`DatasetFetchFailed`] event.
pub async fn load_dataset(source: &dyn DataSource, events: Option<&EventBus>) -> Vec<ServiceOrder> {
    match source.fetch_text().await {
        Ok(text) => {
            let records = parse_dataset(&text);
            info!(source = source.source_name(), records = records.len(), "Loaded dataset");
            records
        }
        Err(e) => {
            error!(source = source.source_name(), "Error fetching data: {:#}", e);
            if let Some(bus) = events {
                bus.publish(DatasetFetchFailed {
                    source_name: source.source_name().to_string(),
                    error: e.to_string(),
                });
            }
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sources::StaticSource;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;

    struct UnreachableSource;

    #[async_trait]
    impl DataSource for UnreachableSource {
        async fn fetch_text(&self) -> anyhow::Result<String> {
            anyhow::bail!("connection refused")
        }

        fn source_name(&self) -> &str {
            "unreachable"
        }
    }

    #[tokio::test]
    async fn test_load_parses_source_text() {
        let source = StaticSource::new("sheet", "OM,PS\nCFN,1\nCFN,0\nBNRJ,2\n");
        let records = load_dataset(&source, None).await;
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].organization, "BNRJ");
    }

    #[tokio::test]
    async fn test_fetch_failure_yields_empty_dataset_and_event() {
        let bus = EventBus::new();
        let seen = Arc::new(AtomicBool::new(false));
        let flag = seen.clone();
        bus.subscribe(move |e: &DatasetFetchFailed| {
            flag.store(e.error.contains("connection refused"), Ordering::SeqCst);
        });

        let records = load_dataset(&UnreachableSource, Some(&bus)).await;
        assert!(records.is_empty());
        assert!(seen.load(Ordering::SeqCst));
    }
}
