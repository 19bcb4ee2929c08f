//! Dry-run e-mail provider

use async_trait::async_trait;
use tracing::info;

use ps_notify::{BudgetRequest, DispatchError, EmailSender};

/// Logs each budget request as JSON instead of delivering it
pub struct LogSender;

#[async_trait]
impl EmailSender for LogSender {
    async fn send(&self, request: &BudgetRequest) -> Result<(), DispatchError> {
        let payload = serde_json::to_string(request).map_err(|e| DispatchError::Provider(e.to_string()))?;
        info!(to = %request.to_email, %payload, "Budget request (dry run)");
        Ok(())
    }
}
