//! Application state shared across axum handlers.

use std::path::Path;
use std::sync::Arc;

use fazendas_lib::{Error as LibError, ParcelStore, SpatialiteStore};

/// Error during application state initialization.
#[derive(Debug)]
pub enum AppStateError {
    /// Failed to open the parcel store.
    StoreOpen(LibError),
}

impl std::fmt::Display for AppStateError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::StoreOpen(e) => write!(f, "failed to open parcel store: {}", e),
        }
    }
}

impl std::error::Error for AppStateError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::StoreOpen(e) => Some(e),
        }
    }
}

/// Shared application state for all axum handlers.
///
/// Cheaply cloneable; holds only the store behind an `Arc`. The store owns
/// the connection lifecycle, so no other shared mutable state crosses
/// requests.
#[derive(Clone)]
pub struct AppState {
    store: Arc<dyn ParcelStore>,
}

impl AppState {
    /// Open the SpatiaLite store at `db_path` and wrap it as shared state.
    pub fn open(db_path: impl AsRef<Path>) -> Result<Self, AppStateError> {
        let db_path = db_path.as_ref();
        tracing::info!(path = %db_path.display(), "loading parcel store");

        let store = SpatialiteStore::open(db_path).map_err(AppStateError::StoreOpen)?;
        Ok(Self::from_store(Arc::new(store)))
    }

    /// Build state from a pre-constructed store. Used by tests.
    pub fn from_store(store: Arc<dyn ParcelStore>) -> Self {
        Self { store }
    }

    /// Access the parcel store.
    pub fn store(&self) -> &dyn ParcelStore {
        self.store.as_ref()
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::MockStore;

    #[test]
    fn test_app_state_from_store() {
        let state = AppState::from_store(Arc::new(MockStore::empty()));
        assert!(state.store().ping().is_ok());
    }

    #[test]
    fn test_app_state_clone_shares_store() {
        let store = Arc::new(MockStore::empty());
        let state = AppState::from_store(store.clone());
        let cloned = state.clone();

        cloned.store().ping().unwrap();
        assert_eq!(store.query_count(), 0);
    }

    #[test]
    fn test_app_state_open_missing_database() {
        let result = AppState::open("/nonexistent/parcels.db");
        assert!(matches!(result, Err(AppStateError::StoreOpen(_))));
    }

    #[test]
    fn test_app_state_error_display() {
        let err = AppStateError::StoreOpen(LibError::Io(std::io::Error::other("missing")));
        assert!(err.to_string().contains("failed to open parcel store"));
    }
}
