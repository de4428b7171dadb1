//! ResourceRepository - Typed accessor for one resource on a record store.

use std::marker::PhantomData;

use super::{ListWindow, Listing, RecordStore, StoreError};
use crate::record::{Record, RecordPatch};

/// Typed repository wrapper for accessing records of a specific type.
///
/// Saves spelling the record type on every call:
/// `store.records::<Customer>().delete("7")`.
pub struct ResourceRepository<'a, S, R> {
    store: &'a S,
    _marker: PhantomData<R>,
}

impl<'a, S: RecordStore, R: Record> ResourceRepository<'a, S, R> {
    pub fn new(store: &'a S) -> Self {
        Self {
            store,
            _marker: PhantomData,
        }
    }

    /// The resource name requests are addressed to.
    pub fn resource(&self) -> &'static str {
        R::RESOURCE
    }

    pub fn list(&self, window: ListWindow) -> Result<Listing<R>, StoreError> {
        self.store.list(window)
    }

    /// List everything and drop the total.
    pub fn all(&self) -> Result<Vec<R>, StoreError> {
        Ok(self.store.list::<R>(ListWindow::all())?.items)
    }

    pub fn get(&self, id: &str) -> Result<Option<R>, StoreError> {
        self.store.get(id)
    }

    pub fn create(&self, record: &R) -> Result<R, StoreError> {
        self.store.create(record)
    }

    pub fn update(&self, id: &str, patch: &RecordPatch) -> Result<R, StoreError> {
        self.store.update(id, patch)
    }

    pub fn delete(&self, id: &str) -> Result<(), StoreError> {
        self.store.delete::<R>(id)
    }
}

/// Extension trait for typed record access on any RecordStore.
pub trait RecordsExt: RecordStore + Sized {
    /// Get a typed repository for one resource.
    fn records<R: Record>(&self) -> ResourceRepository<'_, Self, R> {
        ResourceRepository::new(self)
    }
}

impl<S: RecordStore> RecordsExt for S {}
