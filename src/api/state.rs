//! Application state for the payroll reconciler API.
//!
//! This module defines the shared application state that is available
//! to all request handlers.

use std::sync::Arc;

use crate::config::ConfigLoader;
use crate::error::ReconcileResult;
use crate::store::InMemoryStore;

/// Shared application state.
///
/// Holds the loaded configuration and the reference store built from it.
#[derive(Clone)]
pub struct AppState {
    config: Arc<ConfigLoader>,
    store: Arc<InMemoryStore>,
}

impl AppState {
    /// Creates application state, building the store from the loaded reference data.
    pub fn new(config: ConfigLoader) -> ReconcileResult<Self> {
        let store = InMemoryStore::from_reference_data(config.reference())?;
        Ok(Self {
            config: Arc::new(config),
            store: Arc::new(store),
        })
    }

    /// Returns a reference to the configuration loader.
    pub fn config(&self) -> &ConfigLoader {
        &self.config
    }

    /// Returns a reference to the reference store.
    pub fn store(&self) -> &InMemoryStore {
        &self.store
    }
}
