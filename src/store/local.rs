//! LocalRecordStore - JSON-array-per-resource store over a key-value backend.

use std::sync::Mutex;

use tracing::debug;
use uuid::Uuid;

use super::{KeyValueStore, ListWindow, Listing, RecordStore, StoreError};
use crate::record::{find_conflict, Record, RecordPatch};

/// Record store for resources without a backing endpoint.
///
/// Storage key is `"namespace:resource"`; the value is the JSON-serialized
/// array of records. The array is read on every call and rewritten on every
/// mutation, so separate instances over the same backend see each other's
/// writes (last write wins).
pub struct LocalRecordStore<K> {
    kv: K,
    namespace: String,
    write_lock: Mutex<()>,
}

impl<K: KeyValueStore> LocalRecordStore<K> {
    pub fn new(kv: K, namespace: impl Into<String>) -> Self {
        Self {
            kv,
            namespace: namespace.into(),
            write_lock: Mutex::new(()),
        }
    }

    /// Access the underlying key-value backend.
    pub fn kv(&self) -> &K {
        &self.kv
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    fn make_key<R: Record>(&self) -> String {
        format!("{}:{}", self.namespace, R::RESOURCE)
    }

    fn load<R: Record>(&self) -> Result<Vec<R>, StoreError> {
        match self.kv.read(&self.make_key::<R>())? {
            Some(json) if !json.trim().is_empty() => Ok(serde_json::from_str(&json)?),
            _ => Ok(Vec::new()),
        }
    }

    fn persist<R: Record>(&self, records: &[R]) -> Result<(), StoreError> {
        let json = serde_json::to_string(records)?;
        self.kv.write(&self.make_key::<R>(), &json)
    }

    /// Serialize read-modify-write cycles on this instance.
    fn mutate<R, T>(
        &self,
        f: impl FnOnce(&mut Vec<R>) -> Result<T, StoreError>,
    ) -> Result<T, StoreError>
    where
        R: Record,
    {
        let _guard = self
            .write_lock
            .lock()
            .map_err(|_| StoreError::Storage("lock poisoned".into()))?;
        let mut records = self.load::<R>()?;
        let result = f(&mut records)?;
        self.persist(&records)?;
        Ok(result)
    }

    /// Store `records` if the resource has no data yet (mock/demo data).
    /// Returns true if the seed was written.
    pub fn seed_if_empty<R: Record>(&self, records: &[R]) -> Result<bool, StoreError> {
        let _guard = self
            .write_lock
            .lock()
            .map_err(|_| StoreError::Storage("lock poisoned".into()))?;
        if !self.load::<R>()?.is_empty() {
            return Ok(false);
        }
        self.persist(records)?;
        debug!(resource = R::RESOURCE, count = records.len(), "seeded local store");
        Ok(true)
    }
}

impl<K: KeyValueStore> RecordStore for LocalRecordStore<K> {
    fn list<R: Record>(&self, window: ListWindow) -> Result<Listing<R>, StoreError> {
        let records = self.load::<R>()?;
        let total = records.len();
        let items: Vec<R> = records
            .into_iter()
            .skip(window.skip)
            .take(window.take.unwrap_or(usize::MAX))
            .collect();
        debug!(resource = R::RESOURCE, total, returned = items.len(), "local list");
        Ok(Listing { items, total })
    }

    fn get<R: Record>(&self, id: &str) -> Result<Option<R>, StoreError> {
        Ok(self.load::<R>()?.into_iter().find(|r| r.id() == id))
    }

    fn create<R: Record>(&self, record: &R) -> Result<R, StoreError> {
        self.mutate(|records: &mut Vec<R>| {
            let mut created = record.clone();
            if created.id().is_empty() {
                created.set_id(Uuid::new_v4().to_string());
            } else if records.iter().any(|r| r.id() == created.id()) {
                return Err(StoreError::conflict::<R>(format!(
                    "{} {} already exists",
                    R::RESOURCE,
                    created.id()
                )));
            }
            if let Some(message) = find_conflict(records, &created) {
                return Err(StoreError::conflict::<R>(message));
            }
            records.push(created.clone());
            debug!(resource = R::RESOURCE, id = created.id(), "local create");
            Ok(created)
        })
    }

    fn update<R: Record>(&self, id: &str, patch: &RecordPatch) -> Result<R, StoreError> {
        self.mutate(|records: &mut Vec<R>| {
            let index = records
                .iter()
                .position(|r| r.id() == id)
                .ok_or_else(|| StoreError::not_found::<R>(id))?;
            let updated = patch.apply(&records[index])?;
            if let Some(message) = find_conflict(records, &updated) {
                return Err(StoreError::conflict::<R>(message));
            }
            records[index] = updated.clone();
            debug!(resource = R::RESOURCE, id, fields = patch.len(), "local update");
            Ok(updated)
        })
    }

    fn delete<R: Record>(&self, id: &str) -> Result<(), StoreError> {
        self.mutate(|records: &mut Vec<R>| {
            let index = records
                .iter()
                .position(|r| r.id() == id)
                .ok_or_else(|| StoreError::not_found::<R>(id))?;
            records.remove(index);
            debug!(resource = R::RESOURCE, id, "local delete");
            Ok(())
        })
    }
}
