use std::collections::HashMap;
use std::sync::Mutex;

use super::MutationError;
use crate::notify::MutationKind;
use crate::store::StoreError;

/// A create/update/delete request that has been issued and not yet resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingMutation {
    pub kind: MutationKind,
    pub record_id: String,
}

/// Per-record in-flight registry.
///
/// At most one mutation per record id is pending at a time, so mutations on
/// one record resolve in the order they were issued. Different records do
/// not block each other.
#[derive(Debug, Default)]
pub(crate) struct PendingMutations {
    records: Mutex<HashMap<String, MutationKind>>,
}

/// Releases the record when dropped, whether the mutation succeeded or not.
pub(crate) struct PendingGuard<'a> {
    registry: &'a PendingMutations,
    id: String,
}

impl PendingMutations {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Mark `id` as having a pending `kind`, or fail with `InFlight`.
    pub(crate) fn begin(
        &self,
        resource: &str,
        id: &str,
        kind: MutationKind,
    ) -> Result<PendingGuard<'_>, MutationError> {
        let mut records = self
            .records
            .lock()
            .map_err(|_| StoreError::Storage("pending registry poisoned".into()))?;
        if let Some(existing) = records.get(id) {
            return Err(MutationError::InFlight {
                resource: resource.to_string(),
                id: id.to_string(),
                kind: *existing,
            });
        }
        records.insert(id.to_string(), kind);
        Ok(PendingGuard {
            registry: self,
            id: id.to_string(),
        })
    }

    pub(crate) fn is_pending(&self, id: &str) -> bool {
        self.records
            .lock()
            .map(|records| records.contains_key(id))
            .unwrap_or(false)
    }

    pub(crate) fn snapshot(&self) -> Vec<PendingMutation> {
        let mut pending: Vec<PendingMutation> = self
            .records
            .lock()
            .map(|records| {
                records
                    .iter()
                    .map(|(id, kind)| PendingMutation {
                        kind: *kind,
                        record_id: id.clone(),
                    })
                    .collect()
            })
            .unwrap_or_default();
        pending.sort_by(|a, b| a.record_id.cmp(&b.record_id));
        pending
    }
}

impl Drop for PendingGuard<'_> {
    fn drop(&mut self) {
        if let Ok(mut records) = self.registry.records.lock() {
            records.remove(&self.id);
        }
    }
}
