//! Application state for the Service Record Engine API.
//!
//! This module defines the shared application state that is available
//! to all request handlers.

use std::sync::Arc;

use crate::derivation::RecordDeriver;

/// Shared application state.
///
/// Holds the record deriver, which in turn owns the store collaborators and
/// the loaded configuration.
#[derive(Clone)]
pub struct AppState {
    deriver: Arc<RecordDeriver>,
}

impl AppState {
    /// Creates a new application state around a deriver.
    pub fn new(deriver: RecordDeriver) -> Self {
        Self {
            deriver: Arc::new(deriver),
        }
    }

    /// Returns the record deriver.
    pub fn deriver(&self) -> &RecordDeriver {
        &self.deriver
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineConfig;
    use crate::store::MemoryStore;

    #[test]
    fn test_app_state_is_clone() {
        // Verify AppState can be cloned (required for axum state)
        fn assert_clone<T: Clone>() {}
        assert_clone::<AppState>();
    }

    #[test]
    fn test_clones_share_deriver() {
        let store = Arc::new(MemoryStore::new());
        let state = AppState::new(RecordDeriver::new(
            store.clone(),
            store.clone(),
            store,
            EngineConfig::default(),
        ));
        let other = state.clone();
        assert!(std::ptr::eq(state.deriver(), other.deriver()));
    }
}
