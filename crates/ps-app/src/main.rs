//! Main application entry point

use std::sync::Arc;

use anyhow::Result;
use tracing::info;

mod config;
mod logging;
mod mailer;
mod notices;
mod runner;

use config::AppConfig;
use mailer::LogSender;
use runner::DashboardApp;

#[tokio::main]
async fn main() -> Result<()> {
    logging::init_logging();

    let config = AppConfig::from_args(std::env::args())?;
    let interval = config.source.refresh_interval()?;
    info!(interval = ?interval, once = config.once, "Starting PS dashboard");

    let app = DashboardApp::from_config(&config, Arc::new(LogSender))?;
    app.run(interval, config.once).await?;

    if let Some(at) = app.context().last_update() {
        info!(
            last_update = %at.format("%d/%m/%Y %H:%M:%S"),
            dispatched = app.dispatcher().dispatched_count(),
            "Stopped"
        );
    }
    Ok(())
}
