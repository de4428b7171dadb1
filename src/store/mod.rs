//! Record stores - the authoritative owners of each resource's records.
//!
//! A page never talks to storage directly. It goes through a [`RecordStore`],
//! chosen at construction time:
//!
//! - [`HttpRecordStore`] (feature `http`): the REST backend
//! - [`LocalRecordStore`]: a JSON array per namespaced key in a
//!   [`KeyValueStore`], for resources without a backing endpoint
//! - [`StoreBackend`]: either of the above, picked from configuration
//!
//! ## Example
//!
//! ```ignore
//! use lfpm::{InMemoryKeyValue, LocalRecordStore, RecordsExt, ListWindow};
//!
//! let store = LocalRecordStore::new(InMemoryKeyValue::new(), "backoffice");
//! let created = store.records::<Customer>().create(&customer)?;
//! let listing = store.records::<Customer>().list(ListWindow::all())?;
//! ```

mod backend;
mod error;
mod kv;
mod local;
#[cfg(feature = "http")]
mod remote;
mod repository;

use crate::record::{Record, RecordPatch};

/// The `skip`/`take` window of a list request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListWindow {
    pub skip: usize,
    pub take: Option<usize>,
}

impl ListWindow {
    /// Everything the store has.
    pub fn all() -> Self {
        Self { skip: 0, take: None }
    }

    /// The first `take` records.
    pub fn first(take: usize) -> Self {
        Self {
            skip: 0,
            take: Some(take),
        }
    }

    pub fn new(skip: usize, take: usize) -> Self {
        Self {
            skip,
            take: Some(take),
        }
    }
}

impl Default for ListWindow {
    fn default() -> Self {
        Self::all()
    }
}

/// A window of records plus the store's total count.
#[derive(Debug, Clone, PartialEq)]
pub struct Listing<R> {
    pub items: Vec<R>,
    pub total: usize,
}

/// Abstract CRUD storage for records.
pub trait RecordStore: Send + Sync {
    /// List records in the given window, in store order.
    fn list<R: Record>(&self, window: ListWindow) -> Result<Listing<R>, StoreError>;

    /// Get a record by ID. Returns None if not found.
    fn get<R: Record>(&self, id: &str) -> Result<Option<R>, StoreError>;

    /// Create a record. Returns the stored record, including any id the store
    /// assigned.
    fn create<R: Record>(&self, record: &R) -> Result<R, StoreError>;

    /// Partially update a record. Fails with `NotFound` if it does not exist.
    fn update<R: Record>(&self, id: &str, patch: &RecordPatch) -> Result<R, StoreError>;

    /// Delete a record. Fails with `NotFound` if it does not exist.
    fn delete<R: Record>(&self, id: &str) -> Result<(), StoreError>;
}

pub use backend::{BackendKind, StoreBackend};
pub use error::StoreError;
pub use kv::{FileKeyValue, InMemoryKeyValue, KeyValueStore};
pub use local::LocalRecordStore;
#[cfg(feature = "http")]
pub use remote::HttpRecordStore;
pub use repository::{RecordsExt, ResourceRepository};
