//! Application state.

use std::sync::Arc;

use acp_core::TaskExecutor;
use acp_dispatch::{Dispatcher, EventBus, JobStore};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub store: JobStore,
    pub bus: EventBus,
    pub dispatcher: Dispatcher,
}

impl AppState {
    /// Wire up the store, event bus, and dispatch worker around the given
    /// executor.
    pub fn new(executor: Arc<dyn TaskExecutor>) -> Self {
        let store = JobStore::new();
        let bus = EventBus::new();
        let dispatcher = Dispatcher::start(store.clone(), bus.clone(), executor);

        Self {
            store,
            bus,
            dispatcher,
        }
    }
}
