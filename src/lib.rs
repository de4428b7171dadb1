//! List-Filter-Paginate-Mutate toolkit for back-office record pages.
//!
//! A page loads a resource's records from a [`RecordStore`], narrows and
//! orders them with the filter/sort [`engine`](query::engine), slices a
//! [`PageResult`] with [`paginate`], and sends create/update/delete requests
//! through a [`MutationGateway`] that validates first and keeps the cached
//! list in step.

extern crate self as lfpm;

pub mod config;
pub mod form;
pub mod gateway;
pub mod notify;
pub mod page;
pub mod pagination;
pub mod query;
pub mod record;
pub mod resources;
pub mod store;
#[cfg(feature = "async")]
pub mod uniqueness;
pub mod validate;
pub mod view;

pub use config::{ConfigError, ConsoleConfig};
pub use form::{Form, FormMode};
pub use gateway::{MutationError, MutationGateway, PendingMutation, Reconcile};
pub use notify::{MutationKind, Notice, NoticeLevel, Notifier};
pub use page::ResourcePage;
pub use pagination::{paginate, total_pages, PageResult};
pub use query::{PageSizePolicy, QueryController, QueryState, SortDirection, SortOrder};
pub use record::{
    find_conflict, FieldValue, Filterable, HasCreatedAt, HasId, Record, RecordPatch, SortKey,
    Timestamp,
};
pub use store::{
    BackendKind, FileKeyValue, InMemoryKeyValue, KeyValueStore, ListWindow, Listing,
    LocalRecordStore, RecordStore, RecordsExt, ResourceRepository, StoreBackend, StoreError,
};
#[cfg(feature = "http")]
pub use store::HttpRecordStore;
#[cfg(feature = "async")]
pub use uniqueness::{CheckOutcome, DebouncedCheck};
pub use validate::{Validate, ValidationErrors, Validator};
pub use view::{ListView, LoadOutcome, LoadTicket};

// Derive macro for `Record` (and `HasId`, `HasCreatedAt`, `Filterable`)
pub use lfpm_macros::Record;
