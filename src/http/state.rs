use crate::db::Store;
use crate::storage::StorageClient;
use std::sync::Arc;

/// Shared application state for HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Users and assessments data access
    pub store: Arc<Store>,

    /// Object store for uploaded answer videos
    pub storage: Arc<StorageClient>,
}

impl AppState {
    pub fn new(store: Store, storage: StorageClient) -> Self {
        Self {
            store: Arc::new(store),
            storage: Arc::new(storage),
        }
    }
}
