//! Periodic refresh cycle

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use chrono::{Local, NaiveDate};
use tokio::time::MissedTickBehavior;
use tracing::{error, info, warn};

use ps_core::events::{ReportEmpty, ReportExported, ReportFailed};
use ps_core::{DataSource, EventBus};
use ps_data::aggregate::budget_queue_count;
use ps_data::DashboardContext;
use ps_notify::{Dispatcher, EmailSender, JsonFileStore, WorkshopDirectory};
use ps_report::{report_rows, write_report_file, ReportError, ReportHeader};

use crate::config::AppConfig;
use crate::notices::{Notice, NoticeBoard};

/// What one refresh cycle did
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CycleSummary {
    pub record_count: usize,
    pub filtered_count: usize,
    pub budget_queue: usize,
    pub dispatched: usize,
    pub report: Option<PathBuf>,
    pub notices: Vec<Notice>,
}

pub struct DashboardApp {
    context: DashboardContext,
    source: Arc<dyn DataSource>,
    dispatcher: Dispatcher,
    dispatch_pending: bool,
    report_dir: Option<PathBuf>,
    notices: NoticeBoard,
}

impl DashboardApp {
    pub fn new(
        context: DashboardContext,
        source: Arc<dyn DataSource>,
        dispatcher: Dispatcher,
        dispatch_pending: bool,
        report_dir: Option<PathBuf>,
    ) -> Self {
        let notices = NoticeBoard::attach(context.events());
        Self {
            context,
            source,
            dispatcher,
            dispatch_pending,
            report_dir,
            notices,
        }
    }

    /// Wire the source, the file-backed stores and the filter from `config`
    pub fn from_config(config: &AppConfig, sender: Arc<dyn EmailSender>) -> Result<Self> {
        let events = Arc::new(EventBus::new());
        let context = DashboardContext::new(events.clone());
        context.set_filter(config.filter.to_spec());

        let email_store: JsonFileStore<BTreeMap<String, String>> = JsonFileStore::new(&config.workshop_emails_path);
        let directory = WorkshopDirectory::load(&email_store);
        let state_store = Arc::new(JsonFileStore::<Vec<String>>::new(&config.dispatch_state_path));
        info!(
            dispatch_state = %state_store.path().display(),
            workshop_emails = %email_store.path().display(),
            "Stores configured"
        );
        let dispatcher = Dispatcher::new(sender, directory, state_store, events);

        info!(source = %config.source.source_name(), "Data source configured");
        Ok(Self::new(
            context,
            config.source.build_source()?,
            dispatcher,
            config.dispatch_pending,
            config.report_dir.clone(),
        ))
    }

    pub fn context(&self) -> &DashboardContext {
        &self.context
    }

    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    /// Refresh, log the KPIs, then run the optional dispatch and report steps
    pub async fn run_cycle(&self, today: NaiveDate) -> CycleSummary {
        let record_count = self.context.refresh(self.source.as_ref()).await;
        let view = self.context.view();
        let budget_queue = budget_queue_count(&self.context.snapshot());

        let kpis = &view.kpis;
        info!(
            records = record_count,
            filtered = kpis.total_count,
            completed = kpis.completed_count,
            pending = kpis.pending_count,
            amended = kpis.amended_count,
            budget = kpis.total_budget,
            labor_hours = kpis.total_labor_hours,
            in_house = kpis.in_house_count,
            outsourced = kpis.outsourced_count,
            budget_queue,
            "Dashboard refreshed"
        );

        let dispatched = if self.dispatch_pending {
            self.dispatch_queue(today).await
        } else {
            0
        };

        let events = self.context.events();
        let report = self.report_dir.as_ref().and_then(|dir| {
            let rows = report_rows(&view.filtered, today);
            let header = ReportHeader::new(&self.context.filter(), Local::now().naive_local());
            match write_report_file(dir, &header, &rows) {
                Ok(path) => {
                    events.publish(ReportExported {
                        path: path.display().to_string(),
                        rows: rows.len(),
                    });
                    Some(path)
                }
                Err(ReportError::NoData) => {
                    events.publish(ReportEmpty);
                    None
                }
                Err(e) => {
                    error!("Error writing report: {}", e);
                    events.publish(ReportFailed { error: e.to_string() });
                    None
                }
            }
        });

        let notices = self.notices.drain();
        for notice in &notices {
            notice.log();
        }

        CycleSummary {
            record_count,
            filtered_count: view.filtered.len(),
            budget_queue,
            dispatched,
            report,
            notices,
        }
    }

    async fn dispatch_queue(&self, today: NaiveDate) -> usize {
        let mut sent = 0;
        for order in self.context.budget_queue(None) {
            if self.dispatcher.is_dispatched(&order) {
                continue;
            }
            match self.dispatcher.dispatch(&order, today).await {
                Ok(_) => sent += 1,
                Err(e) => warn!(record = %order.key(), "Budget request not sent: {}", e),
            }
        }
        sent
    }

    /// Run cycles every `interval` until Ctrl-C, or once when `once` is set
    pub async fn run(&self, interval: Duration, once: bool) -> Result<()> {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    self.run_cycle(Local::now().date_naive()).await;
                    if once {
                        break;
                    }
                }
                _ = tokio::signal::ctrl_c() => {
                    info!("Shutting down");
                    break;
                }
            }
        }
        Ok(())
    }
}
