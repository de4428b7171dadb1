//! StoreBackend - the record store selected for a resource at construction time.

use serde::{Deserialize, Serialize};
use tracing::info;

use super::{FileKeyValue, ListWindow, Listing, LocalRecordStore, RecordStore, StoreError};
#[cfg(feature = "http")]
use super::HttpRecordStore;
use crate::config::{ConfigError, ConsoleConfig};
use crate::record::{Record, RecordPatch};

/// Which kind of store backs a resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    /// The REST API.
    Remote,
    /// The local persisted key-value store.
    Local,
}

/// Either store implementation behind one `RecordStore`.
pub enum StoreBackend {
    Local(LocalRecordStore<FileKeyValue>),
    #[cfg(feature = "http")]
    Remote(HttpRecordStore),
}

impl StoreBackend {
    /// Open the store configured for `resource`.
    pub fn open(config: &ConsoleConfig, resource: &str) -> Result<Self, ConfigError> {
        let kind = config.backend_for(resource);
        info!(resource, backend = ?kind, "opening record store");
        match kind {
            BackendKind::Local => {
                let kv = FileKeyValue::open(&config.storage.dir)?;
                Ok(StoreBackend::Local(LocalRecordStore::new(
                    kv,
                    config.storage.namespace.clone(),
                )))
            }
            BackendKind::Remote => Self::open_remote(config, resource),
        }
    }

    /// Open the store configured for `R`'s resource.
    pub fn open_for<R: Record>(config: &ConsoleConfig) -> Result<Self, ConfigError> {
        Self::open(config, R::RESOURCE)
    }

    #[cfg(feature = "http")]
    fn open_remote(config: &ConsoleConfig, resource: &str) -> Result<Self, ConfigError> {
        let api = config
            .api
            .as_ref()
            .ok_or_else(|| ConfigError::MissingApi(resource.to_string()))?;
        Ok(StoreBackend::Remote(HttpRecordStore::from_config(api)?))
    }

    #[cfg(not(feature = "http"))]
    fn open_remote(_config: &ConsoleConfig, resource: &str) -> Result<Self, ConfigError> {
        Err(ConfigError::HttpDisabled(resource.to_string()))
    }

    pub fn kind(&self) -> BackendKind {
        match self {
            StoreBackend::Local(_) => BackendKind::Local,
            #[cfg(feature = "http")]
            StoreBackend::Remote(_) => BackendKind::Remote,
        }
    }
}

impl RecordStore for StoreBackend {
    fn list<R: Record>(&self, window: ListWindow) -> Result<Listing<R>, StoreError> {
        match self {
            StoreBackend::Local(store) => store.list(window),
            #[cfg(feature = "http")]
            StoreBackend::Remote(store) => store.list(window),
        }
    }

    fn get<R: Record>(&self, id: &str) -> Result<Option<R>, StoreError> {
        match self {
            StoreBackend::Local(store) => store.get(id),
            #[cfg(feature = "http")]
            StoreBackend::Remote(store) => store.get(id),
        }
    }

    fn create<R: Record>(&self, record: &R) -> Result<R, StoreError> {
        match self {
            StoreBackend::Local(store) => store.create(record),
            #[cfg(feature = "http")]
            StoreBackend::Remote(store) => store.create(record),
        }
    }

    fn update<R: Record>(&self, id: &str, patch: &RecordPatch) -> Result<R, StoreError> {
        match self {
            StoreBackend::Local(store) => store.update(id, patch),
            #[cfg(feature = "http")]
            StoreBackend::Remote(store) => store.update(id, patch),
        }
    }

    fn delete<R: Record>(&self, id: &str) -> Result<(), StoreError> {
        match self {
            StoreBackend::Local(store) => store.delete::<R>(id),
            #[cfg(feature = "http")]
            StoreBackend::Remote(store) => store.delete::<R>(id),
        }
    }
}
