//! Mutation gateway - the one place create/update/delete requests are issued.
//!
//! The gateway owns a page's cached copy of a resource's records. Every
//! mutation goes through the same lifecycle:
//!
//! 1. validate locally (invalid input never reaches the store)
//! 2. mark the record as pending (a second mutation for it fails with `InFlight`)
//! 3. call the store
//! 4. on success, reconcile the cache, close the bound form, emit a success notice
//! 5. on failure, leave the cache untouched, keep the form open, emit an error notice
//!
//! ## Example
//!
//! ```ignore
//! let gateway = MutationGateway::<_, Customer>::new(store);
//! gateway.refresh()?;
//!
//! let mut form = Form::create(Customer::new("Ada", "Lovelace", "ada@example.com"));
//! match gateway.submit(&mut form) {
//!     Ok(_) => assert!(!form.is_open()),
//!     Err(err) => println!("{}", err.user_message()),
//! }
//! ```

mod error;
mod pending;

use std::sync::RwLock;

use tracing::{info, warn};

use crate::form::{Form, FormMode};
use crate::notify::{MutationKind, Notice, Notifier};
use crate::record::{Record, RecordPatch};
use crate::store::{ListWindow, RecordStore, StoreError};
use crate::validate::Validate;

pub use error::MutationError;
pub use pending::PendingMutation;
use pending::PendingMutations;

/// How the cache catches up with a successful mutation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Reconcile {
    /// Apply the record the store returned to the cached list.
    #[default]
    Patch,
    /// Reload the whole list from the store. Falls back to `Patch` if the
    /// reload fails.
    Refetch,
}

/// Issues mutations against a record store and keeps a cached list in step.
pub struct MutationGateway<S, R> {
    store: S,
    records: RwLock<Vec<R>>,
    pending: PendingMutations,
    notifier: Notifier,
    reconcile: Reconcile,
    window: ListWindow,
}

impl<S: RecordStore, R: Record> MutationGateway<S, R> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            records: RwLock::new(Vec::new()),
            pending: PendingMutations::new(),
            notifier: Notifier::new(),
            reconcile: Reconcile::default(),
            window: ListWindow::all(),
        }
    }

    pub fn with_reconcile(mut self, reconcile: Reconcile) -> Self {
        self.reconcile = reconcile;
        self
    }

    pub fn with_notifier(mut self, notifier: Notifier) -> Self {
        self.notifier = notifier;
        self
    }

    /// Load at most `limit` records on refresh (`take` of the list request).
    pub fn with_fetch_limit(mut self, limit: Option<usize>) -> Self {
        self.window = match limit {
            Some(take) => ListWindow::first(take),
            None => ListWindow::all(),
        };
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn notifier(&self) -> &Notifier {
        &self.notifier
    }

    /// Snapshot of the cached records, in store order.
    pub fn records(&self) -> Vec<R> {
        self.records
            .read()
            .map(|records| records.clone())
            .unwrap_or_default()
    }

    /// Cached record by id.
    pub fn record(&self, id: &str) -> Option<R> {
        self.records
            .read()
            .ok()
            .and_then(|records| records.iter().find(|r| r.id() == id).cloned())
    }

    /// Whether `id` has a mutation in flight (its actions should be disabled).
    pub fn is_pending(&self, id: &str) -> bool {
        self.pending.is_pending(id)
    }

    pub fn pending(&self) -> Vec<PendingMutation> {
        self.pending.snapshot()
    }

    /// Load the list from the store without touching the cache.
    pub fn fetch(&self) -> Result<Vec<R>, StoreError> {
        Ok(self.store.list::<R>(self.window)?.items)
    }

    /// Reload the cache from the store.
    pub fn refresh(&self) -> Result<Vec<R>, StoreError> {
        let records = self.fetch().map_err(|err| {
            warn!(resource = R::RESOURCE, error = %err, "refresh failed");
            err
        })?;
        self.replace_records(records.clone());
        Ok(records)
    }

    /// Replace the cache wholesale (e.g. with the result of a `fetch`).
    pub fn replace_records(&self, records: Vec<R>) {
        if let Ok(mut cached) = self.records.write() {
            *cached = records;
        }
    }

    /// Whether another cached record already uses `value` for the unique
    /// field `field` (case-insensitive). `except_id` skips the record being
    /// edited.
    pub fn is_taken(&self, field: &str, value: &str, except_id: Option<&str>) -> bool {
        let value = value.trim();
        if value.is_empty() {
            return false;
        }
        self.records
            .read()
            .map(|records| {
                records
                    .iter()
                    .filter(|r| Some(r.id()) != except_id)
                    .any(|r| {
                        r.unique_values()
                            .iter()
                            .any(|(f, v)| *f == field && v.trim().eq_ignore_ascii_case(value))
                    })
            })
            .unwrap_or(false)
    }

    // Cached copy first, then the store.
    fn current(&self, id: &str) -> Result<R, MutationError> {
        if let Some(record) = self.record(id) {
            return Ok(record);
        }
        self.store
            .get::<R>(id)?
            .ok_or_else(|| StoreError::not_found::<R>(id).into())
    }

    fn reconcile_with(&self, apply: impl FnOnce(&mut Vec<R>)) {
        if self.reconcile == Reconcile::Refetch {
            match self.fetch() {
                Ok(records) => {
                    self.replace_records(records);
                    return;
                }
                Err(err) => {
                    warn!(
                        resource = R::RESOURCE,
                        error = %err,
                        "refetch after mutation failed, patching cache"
                    );
                }
            }
        }
        if let Ok(mut records) = self.records.write() {
            apply(&mut records);
        }
    }

    fn fail(&self, kind: MutationKind, id: Option<&str>, err: MutationError) -> MutationError {
        warn!(resource = R::RESOURCE, id, ?kind, error = %err, "mutation failed");
        // Validation problems are shown inline next to the fields, not as a notice.
        if !matches!(err, MutationError::Validation(_)) {
            self.notifier
                .emit(&Notice::error(kind, R::RESOURCE, id, err.user_message()));
        }
        err
    }

    fn succeed(&self, kind: MutationKind, id: &str) {
        info!(resource = R::RESOURCE, id, ?kind, "mutation succeeded");
        self.notifier
            .emit(&Notice::success(kind, R::RESOURCE, Some(id)));
    }

    /// Delete a record. Deleting an id that no longer exists fails with
    /// `NotFound` and leaves the cache as it was.
    pub fn delete(&self, id: &str) -> Result<(), MutationError> {
        let _pending = self
            .pending
            .begin(R::RESOURCE, id, MutationKind::Delete)
            .map_err(|err| self.fail(MutationKind::Delete, Some(id), err))?;

        self.store
            .delete::<R>(id)
            .map_err(|err| self.fail(MutationKind::Delete, Some(id), err.into()))?;

        self.reconcile_with(|records| records.retain(|r| r.id() != id));
        self.succeed(MutationKind::Delete, id);
        Ok(())
    }
}

impl<S: RecordStore, R: Record + Validate> MutationGateway<S, R> {
    /// Validate and create a record.
    pub fn create(&self, draft: &R) -> Result<R, MutationError> {
        draft
            .validate()
            .map_err(|errors| self.fail(MutationKind::Create, None, errors.into()))?;

        let created = self
            .store
            .create(draft)
            .map_err(|err| self.fail(MutationKind::Create, None, err.into()))?;

        self.reconcile_with(|records| {
            records.retain(|r| r.id() != created.id());
            records.push(created.clone());
        });
        self.succeed(MutationKind::Create, created.id());
        Ok(created)
    }

    /// Validate the patched record and apply a partial update.
    ///
    /// The patch is checked against the cached record (or the store's copy
    /// when the record is not cached) before anything is sent.
    pub fn update(&self, id: &str, patch: &RecordPatch) -> Result<R, MutationError> {
        let _pending = self
            .pending
            .begin(R::RESOURCE, id, MutationKind::Update)
            .map_err(|err| self.fail(MutationKind::Update, Some(id), err))?;

        let fail = |err: MutationError| self.fail(MutationKind::Update, Some(id), err);

        let current = self.current(id).map_err(fail)?;
        let preview = patch.apply(&current).map_err(|err| fail(err.into()))?;
        preview.validate().map_err(|errors| fail(errors.into()))?;

        let updated = self
            .store
            .update::<R>(id, patch)
            .map_err(|err| fail(err.into()))?;

        self.reconcile_with(|records| match records.iter_mut().find(|r| r.id() == id) {
            Some(slot) => *slot = updated.clone(),
            None => records.push(updated.clone()),
        });
        self.succeed(MutationKind::Update, id);
        Ok(updated)
    }

    /// Drive a form through its mutation.
    ///
    /// On success the form closes and the resulting record (if any) is
    /// returned. On failure the form stays open with the user's input, plus
    /// field errors or an error message.
    pub fn submit(&self, form: &mut Form<R>) -> Result<Option<R>, MutationError> {
        let result = match form.mode().clone() {
            FormMode::Create => self.create(form.draft()).map(Some),
            FormMode::Edit { id } => self.submit_edit(&id, form),
            FormMode::Delete { id } => self.delete(&id).map(|()| None),
        };

        match &result {
            Ok(_) => form.close(),
            Err(err) => form.fail(err),
        }
        result
    }

    fn submit_edit(&self, id: &str, form: &Form<R>) -> Result<Option<R>, MutationError> {
        let fail = |err: MutationError| self.fail(MutationKind::Update, Some(id), err);

        form.draft().validate().map_err(|errors| fail(errors.into()))?;

        let original = match form.original() {
            Some(original) => original.clone(),
            None => self.current(id).map_err(fail)?,
        };
        let patch = RecordPatch::diff(&original, form.draft()).map_err(|err| fail(err.into()))?;
        if patch.is_empty() {
            return Ok(None);
        }
        self.update(id, &patch).map(Some)
    }
}
