//! Budget-request dispatch for the PS control dashboard
//!
//! Builds the e-mail payload for a service order, resolves the workshop's
//! address and keeps the persisted set of orders that were already notified.

pub mod directory;
pub mod dispatch_state;
pub mod dispatcher;
pub mod payload;
pub mod sender;
pub mod store;

use thiserror::Error;

pub use directory::WorkshopDirectory;
pub use dispatch_state::DispatchState;
pub use dispatcher::Dispatcher;
pub use payload::BudgetRequest;
pub use sender::EmailSender;
pub use store::{JsonFileStore, MemoryStore, PersistentStore};

/// Errors from the persistence capability
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

/// Errors from the dispatch workflow
#[derive(Error, Debug)]
pub enum DispatchError {
    #[error("E-mail provider error: {0}")]
    Provider(String),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}
