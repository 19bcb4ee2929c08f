//! Outbound e-mail capability

use async_trait::async_trait;

use crate::payload::BudgetRequest;
use crate::DispatchError;

/// Delivers a budget request through an e-mail provider
#[async_trait]
pub trait EmailSender: Send + Sync {
    async fn send(&self, request: &BudgetRequest) -> Result<(), DispatchError>;
}
