//! Dashboard event bus
//!
//! Subscribers register a typed callback per event; `publish` runs the
//! callbacks for that type in subscription order on the caller's thread.
//! Callbacks must not publish, the subscriber table is locked while they run.

use std::any::{Any, TypeId};

use ahash::AHashMap;
use parking_lot::Mutex;

/// Marker for values that can travel on the bus
pub trait Event: Any + Send + Sync {}

type Callback = Box<dyn Fn(&dyn Any) + Send + Sync>;

/// Type-keyed publish/subscribe
#[derive(Default)]
pub struct EventBus {
    subscribers: Mutex<AHashMap<TypeId, Vec<Callback>>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `callback` for every published `E`
    pub fn subscribe<E, F>(&self, callback: F)
    where
        E: Event,
        F: Fn(&E) + Send + Sync + 'static,
    {
        let erased: Callback = Box::new(move |event| {
            if let Some(event) = event.downcast_ref::<E>() {
                callback(event);
            }
        });
        self.subscribers
            .lock()
            .entry(TypeId::of::<E>())
            .or_default()
            .push(erased);
    }

    /// Deliver `event`; returns how many callbacks saw it
    pub fn publish<E: Event>(&self, event: E) -> usize {
        let subscribers = self.subscribers.lock();
        match subscribers.get(&TypeId::of::<E>()) {
            Some(callbacks) => {
                for callback in callbacks {
                    callback(&event);
                }
                callbacks.len()
            }
            None => 0,
        }
    }

    pub fn subscriber_count<E: Event>(&self) -> usize {
        self.subscribers
            .lock()
            .get(&TypeId::of::<E>())
            .map_or(0, Vec::len)
    }
}

/// A refresh produced a new record snapshot
#[derive(Debug, Clone)]
pub struct DatasetRefreshed {
    pub source_name: String,
    pub record_count: usize,
}

/// The source text could not be obtained; the dataset is empty
#[derive(Debug, Clone)]
pub struct DatasetFetchFailed {
    pub source_name: String,
    pub error: String,
}

#[derive(Debug, Clone)]
pub struct FilterChanged {
    pub summary: String,
}

/// A budget request was sent for a record
#[derive(Debug, Clone)]
pub struct BudgetRequestDispatched {
    pub record_key: String,
    pub to_email: String,
}

/// The e-mail provider rejected a budget request
#[derive(Debug, Clone)]
pub struct BudgetRequestFailed {
    pub record_key: String,
    pub error: String,
}

/// A record's dispatch mark was cleared
#[derive(Debug, Clone)]
pub struct BudgetRequestReverted {
    pub record_key: String,
}

/// A report file was written
#[derive(Debug, Clone)]
pub struct ReportExported {
    pub path: String,
    pub rows: usize,
}

/// Report export was skipped because no record matched the filter
#[derive(Debug, Clone)]
pub struct ReportEmpty;

#[derive(Debug, Clone)]
pub struct ReportFailed {
    pub error: String,
}

impl Event for DatasetRefreshed {}
impl Event for DatasetFetchFailed {}
impl Event for FilterChanged {}
impl Event for BudgetRequestDispatched {}
impl Event for BudgetRequestFailed {}
impl Event for BudgetRequestReverted {}
impl Event for ReportExported {}
impl Event for ReportEmpty {}
impl Event for ReportFailed {}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[test]
    fn test_publish_reaches_only_matching_subscribers() {
        let bus = EventBus::new();
        let refreshed = Arc::new(AtomicUsize::new(0));
        let counter = refreshed.clone();
        bus.subscribe(move |e: &DatasetRefreshed| {
            counter.fetch_add(e.record_count, Ordering::SeqCst);
        });

        let delivered = bus.publish(DatasetRefreshed {
            source_name: "sheet".to_string(),
            record_count: 3,
        });
        let ignored = bus.publish(DatasetFetchFailed {
            source_name: "sheet".to_string(),
            error: "timeout".to_string(),
        });

        assert_eq!(delivered, 1);
        assert_eq!(ignored, 0);
        assert_eq!(refreshed.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn test_callbacks_run_in_subscription_order() {
        let bus = EventBus::new();
        let seen = Arc::new(Mutex::new(Vec::new()));
        for tag in ["first", "second"] {
            let seen = seen.clone();
            bus.subscribe(move |_: &ReportEmpty| seen.lock().push(tag));
        }

        assert_eq!(bus.subscriber_count::<ReportEmpty>(), 2);
        assert_eq!(bus.subscriber_count::<ReportFailed>(), 0);
        bus.publish(ReportEmpty);
        assert_eq!(*seen.lock(), vec!["first", "second"]);
    }
}
