//! Records - typed entities owned by a record store.
//!
//! Every console resource (customers, field mappings, sync logs, assets, ...)
//! is an explicit struct implementing a small set of shared traits instead of
//! a loosely typed map:
//!
//! - [`HasId`]: opaque unique identifier
//! - [`HasCreatedAt`]: timestamp used for newest-first ordering
//! - [`Filterable`]: searchable fields, exact-match filters and sort keys
//! - [`Record`]: the resource name plus serde bounds, tying it all together
//!
//! All four are normally derived:
//!
//! ```ignore
//! use lfpm::Record;
//!
//! #[derive(Clone, Serialize, Deserialize, Record)]
//! #[record(resource = "customers")]
//! struct Customer {
//!     #[record(id)]
//!     pub id: String,
//!     #[record(search)]
//!     pub name: String,
//!     #[record(search, unique)]
//!     pub email: String,
//!     #[record(filter)]
//!     pub status: CustomerStatus,
//!     pub created_at: Option<DateTime<Utc>>,
//! }
//! ```

mod field;
pub mod id;
mod patch;

use std::borrow::Cow;

use serde::{de::DeserializeOwned, Serialize};

use crate::query::SortOrder;

pub use field::{FieldValue, IntoTimestamp, SortKey, Timestamp};
pub use patch::RecordPatch;

/// A record with an opaque unique identifier.
pub trait HasId {
    fn id(&self) -> &str;

    /// Replace the identifier. Used by stores that assign ids on create.
    fn set_id(&mut self, id: String);
}

/// A record with an optional creation timestamp.
pub trait HasCreatedAt {
    fn created_at(&self) -> Option<Timestamp>;
}

/// Field access used by the filter/sort engine.
pub trait Filterable {
    /// Names of the fields matched by free-text search.
    const SEARCH_FIELDS: &'static [&'static str];

    /// Keys accepted by [`Filterable::filter_value`].
    const FILTER_KEYS: &'static [&'static str];

    /// Current values of the search fields. Absent optional values are skipped.
    fn search_values(&self) -> Vec<Cow<'_, str>>;

    /// Value of the filterable field named `key`, or `None` if the record has
    /// no such filter or the value is absent.
    fn filter_value(&self, key: &str) -> Option<Cow<'_, str>>;

    /// Sort key for the field named `key`.
    fn sort_key(&self, key: &str) -> Option<SortKey>;

    /// Order used when the query does not specify one.
    fn default_sort() -> SortOrder {
        SortOrder::Newest
    }
}

/// Trait for types that can be stored in a record store.
pub trait Record:
    HasId + HasCreatedAt + Filterable + Serialize + DeserializeOwned + Clone + Send + Sync + 'static
{
    /// The resource name for this record type (e.g. "customers", "sync_logs").
    /// Maps to an endpoint path for the HTTP store and a key suffix for the
    /// local store.
    const RESOURCE: &'static str;

    /// Values that must be unique across the resource, paired with their
    /// field names. Compared trimmed and case-insensitively.
    fn unique_values(&self) -> Vec<(&'static str, Cow<'_, str>)> {
        Vec::new()
    }
}

/// Find the first unique field of `candidate` already used by another record.
///
/// Records sharing the candidate's id are ignored so an update does not
/// conflict with the version it replaces. Values are compared trimmed and
/// case-insensitively. Returns a user-facing message.
pub fn find_conflict<R: Record>(existing: &[R], candidate: &R) -> Option<String> {
    for (field, value) in candidate.unique_values() {
        let value = value.trim();
        if value.is_empty() {
            continue;
        }
        let taken = existing
            .iter()
            .filter(|other| other.id() != candidate.id() || candidate.id().is_empty())
            .any(|other| {
                other
                    .unique_values()
                    .iter()
                    .any(|(f, v)| *f == field && v.trim().eq_ignore_ascii_case(value))
            });
        if taken {
            return Some(format!("{} with {} '{}' already exists", R::RESOURCE, field, value));
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resources::Customer;

    #[test]
    fn conflict_is_case_insensitive() {
        let existing = vec![Customer::new("Ada", "Lovelace", "ada@example.com").with_id("1")];
        let candidate = Customer::new("Ada", "Byron", "ADA@example.com");

        let message = find_conflict(&existing, &candidate).unwrap();
        assert!(message.contains("email"));
        assert!(message.contains("ADA@example.com"));
    }

    #[test]
    fn conflict_ignores_surrounding_whitespace() {
        let existing = vec![Customer::new("Ada", "Lovelace", "ada@example.com").with_id("1")];
        let candidate = Customer::new("Ada", "Again", " ADA@example.com ");

        let message = find_conflict(&existing, &candidate).unwrap();
        assert!(message.contains("'ADA@example.com'"));

        let blank = Customer::new("Ada", "Blank", "   ");
        assert!(find_conflict(&existing, &blank).is_none());
    }

    #[test]
    fn record_does_not_conflict_with_itself() {
        let existing = vec![Customer::new("Ada", "Lovelace", "ada@example.com").with_id("1")];
        let same = existing[0].clone();

        assert!(find_conflict(&existing, &same).is_none());
    }

    #[test]
    fn derived_search_and_filter_fields() {
        let customer = Customer::new("Grace", "Hopper", "grace@example.com").with_id("9");

        assert_eq!(customer.id(), "9");
        assert!(Customer::SEARCH_FIELDS.contains(&"email"));
        assert!(customer
            .search_values()
            .iter()
            .any(|v| v.as_ref() == "grace@example.com"));
        assert_eq!(customer.filter_value("status").as_deref(), Some("active"));
        assert!(customer.filter_value("nope").is_none());
    }
}
