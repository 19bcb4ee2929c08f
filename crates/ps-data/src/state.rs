//! Dashboard state owned by the consumer
//!
//! Holds the current record snapshot and filter. A refresh builds the new
//! snapshot completely before swapping it in, so readers holding the previous
//! `Arc` keep a consistent view until they drop it.

use std::sync::Arc;

use chrono::{DateTime, Local};
use parking_lot::RwLock;
use tracing::debug;

use ps_core::events::{DatasetRefreshed, FilterChanged};
use ps_core::{DataSource, EventBus, FilterSpec, ServiceOrder};

use crate::aggregate::{self, DashboardView};
use crate::loader::load_dataset;

/// Records and refresh time, swapped together
#[derive(Default)]
struct Snapshot {
    records: Arc<Vec<ServiceOrder>>,
    taken_at: Option<DateTime<Local>>,
}

/// Owned dashboard context: record snapshot, active filter and last refresh time
pub struct DashboardContext {
    /// Current record snapshot with the time it was swapped in
    snapshot: Arc<RwLock<Snapshot>>,

    /// Active filter
    filter: Arc<RwLock<FilterSpec>>,

    /// Event bus
    events: Arc<EventBus>,
}

impl DashboardContext {
    /// Create an empty context
    pub fn new(events: Arc<EventBus>) -> Self {
        Self {
            snapshot: Arc::new(RwLock::new(Snapshot::default())),
            filter: Arc::new(RwLock::new(FilterSpec::default())),
            events,
        }
    }

    /// Current snapshot; stays valid across later refreshes
    pub fn snapshot(&self) -> Arc<Vec<ServiceOrder>> {
        self.snapshot.read().records.clone()
    }

    /// Swap in a fully built record set
    pub fn replace_records(&self, records: Vec<ServiceOrder>, source_name: &str) {
        let record_count = records.len();
        let next = Snapshot {
            records: Arc::new(records),
            taken_at: Some(Local::now()),
        };
        *self.snapshot.write() = next;

        self.events.publish(DatasetRefreshed {
            source_name: source_name.to_string(),
            record_count,
        });
    }

    /// Fetch, parse and swap. A failed fetch swaps in an empty dataset.
    pub async fn refresh(&self, source: &dyn DataSource) -> usize {
        let records = load_dataset(source, Some(self.events.as_ref())).await;
        let count = records.len();
        self.replace_records(records, source.source_name());
        count
    }

    /// Records and the time they were swapped in, read under one lock
    pub fn snapshot_with_time(&self) -> (Arc<Vec<ServiceOrder>>, Option<DateTime<Local>>) {
        let snapshot = self.snapshot.read();
        (snapshot.records.clone(), snapshot.taken_at)
    }

    pub fn last_update(&self) -> Option<DateTime<Local>> {
        self.snapshot.read().taken_at
    }

    pub fn filter(&self) -> FilterSpec {
        self.filter.read().clone()
    }

    /// Replace the active filter; no re-parse happens
    pub fn set_filter(&self, spec: FilterSpec) {
        debug!(?spec, "Filter changed");
        let summary = spec.describe();
        *self.filter.write() = spec;
        self.events.publish(FilterChanged { summary });
    }

    /// All projections for the current snapshot and filter
    pub fn view(&self) -> DashboardView {
        let records = self.snapshot();
        let spec = self.filter();
        aggregate::build_view(&records, &spec)
    }

    /// Orders waiting for a budget, ignoring the dashboard filter
    pub fn budget_queue(&self, workshop: Option<&str>) -> Vec<ServiceOrder> {
        aggregate::budget_queue(&self.snapshot(), workshop)
    }

    pub fn events(&self) -> &Arc<EventBus> {
        &self.events
    }
}
