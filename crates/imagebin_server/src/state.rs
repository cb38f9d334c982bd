//! Shared application state.

use crate::ServerConfig;
use imagebin_database::MetadataRepository;
use imagebin_storage::AssetStore;
use std::sync::Arc;

/// Services built once at startup and handed to every request.
#[derive(Clone)]
pub struct AppState {
    config: Arc<ServerConfig>,
    storage: Arc<dyn AssetStore>,
    repository: Arc<dyn MetadataRepository>,
}

impl AppState {
    /// Creates new application state.
    pub fn new(
        config: ServerConfig,
        storage: impl AssetStore + 'static,
        repository: impl MetadataRepository + 'static,
    ) -> Self {
        Self {
            config: Arc::new(config),
            storage: Arc::new(storage),
            repository: Arc::new(repository),
        }
    }

    /// Server configuration.
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Asset store holding image bytes.
    pub fn storage(&self) -> &dyn AssetStore {
        self.storage.as_ref()
    }

    /// Repository holding image records.
    pub fn repository(&self) -> &dyn MetadataRepository {
        self.repository.as_ref()
    }
}
