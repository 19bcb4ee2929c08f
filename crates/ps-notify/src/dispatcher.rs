//! Dispatch and revert of budget requests
//!
//! The dispatch set is marked only after the provider accepts the message.
//! Every change is written through to the store; a failed write is logged and
//! the in-memory mark stays, since the e-mail has already gone out.

use std::sync::Arc;

use chrono::NaiveDate;
use parking_lot::{Mutex, RwLock};
use tracing::{error, info, warn};

use ps_core::events::{BudgetRequestDispatched, BudgetRequestFailed, BudgetRequestReverted};
use ps_core::{EventBus, ServiceOrder};

use crate::directory::WorkshopDirectory;
use crate::dispatch_state::DispatchState;
use crate::payload::BudgetRequest;
use crate::sender::EmailSender;
use crate::store::PersistentStore;
use crate::DispatchError;

/// E-mail workflow context: provider, directory and dispatch set
pub struct Dispatcher {
    sender: Arc<dyn EmailSender>,
    directory: Arc<RwLock<WorkshopDirectory>>,
    state: Arc<Mutex<DispatchState>>,
    state_store: Arc<dyn PersistentStore<Vec<String>>>,
    events: Arc<EventBus>,
}

impl Dispatcher {
    /// Create a dispatcher, loading the dispatch set from `state_store`
    pub fn new(
        sender: Arc<dyn EmailSender>,
        directory: WorkshopDirectory,
        state_store: Arc<dyn PersistentStore<Vec<String>>>,
        events: Arc<EventBus>,
    ) -> Self {
        let state = match state_store.load() {
            Ok(keys) => DispatchState::from_keys(keys),
            Err(e) => {
                warn!("Could not load dispatch state, starting empty: {}", e);
                DispatchState::default()
            }
        };

        Self {
            sender,
            directory: Arc::new(RwLock::new(directory)),
            state: Arc::new(Mutex::new(state)),
            state_store,
            events,
        }
    }

    /// Send the budget request for `order` and mark it as dispatched
    pub async fn dispatch(&self, order: &ServiceOrder, today: NaiveDate) -> Result<BudgetRequest, DispatchError> {
        let request = BudgetRequest::for_order(order, &self.directory.read(), today);
        let key = order.key();

        if let Err(e) = self.sender.send(&request).await {
            error!(record = %key, "Error dispatching budget request: {}", e);
            self.events.publish(BudgetRequestFailed {
                record_key: key.as_storage_key(),
                error: e.to_string(),
            });
            return Err(e);
        }

        let snapshot = {
            let mut state = self.state.lock();
            state.mark(&key);
            state.to_keys()
        };
        self.persist(&snapshot);

        info!(record = %key, to = %request.to_email, "Budget request dispatched");
        self.events.publish(BudgetRequestDispatched {
            record_key: key.as_storage_key(),
            to_email: request.to_email.clone(),
        });

        Ok(request)
    }

    /// Clear the dispatch mark for `order`. Returns `false` when it was not marked.
    pub fn revert(&self, order: &ServiceOrder) -> bool {
        let key = order.key();
        let snapshot = {
            let mut state = self.state.lock();
            if !state.unmark(&key) {
                return false;
            }
            state.to_keys()
        };
        self.persist(&snapshot);

        self.events.publish(BudgetRequestReverted {
            record_key: key.as_storage_key(),
        });
        true
    }

    pub fn is_dispatched(&self, order: &ServiceOrder) -> bool {
        self.state.lock().is_dispatched(&order.key())
    }

    pub fn dispatched_count(&self) -> usize {
        self.state.lock().len()
    }

    /// Copy of the current directory
    pub fn directory(&self) -> WorkshopDirectory {
        self.directory.read().clone()
    }

    /// Replace the directory, e.g. after the settings screen saved it
    pub fn set_directory(&self, directory: WorkshopDirectory) {
        *self.directory.write() = directory;
    }

    fn persist(&self, keys: &Vec<String>) {
        if let Err(e) = self.state_store.save(keys) {
            error!("Could not persist dispatch state: {}", e);
        }
    }
}
