//! Core types for the PS control dashboard
//!
//! This crate holds the service-order model, the month and status
//! vocabularies, filter criteria and the event bus shared by the other crates.

pub mod calendar;
pub mod events;
pub mod filter;
pub mod format;
pub mod model;
pub mod status;

// Re-export commonly used types
pub use calendar::CalendarMonth;
pub use events::EventBus;
pub use filter::FilterSpec;
pub use model::{RecordKey, ServiceOrder};
pub use data::DataSource;

pub mod data {
    /// Anything that can hand over the raw CSV export as text
    #[async_trait::async_trait]
    pub trait DataSource: Send + Sync {
        /// Fetch the whole export
        async fn fetch_text(&self) -> anyhow::Result<String>;

        /// Get the source name/path
        fn source_name(&self) -> &str;
    }
}
