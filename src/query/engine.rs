//! Filter/sort engine: `(records, query) -> ordered subset`.
//!
//! Pure and deterministic. The same records and query always produce the
//! same members in the same order; sorting is stable, so records with equal
//! keys keep their store order.

use std::cmp::Ordering;

use super::{QueryState, SortDirection, SortOrder};
use crate::record::{Filterable, Record};

/// Filter and sort `records` for `query`.
pub fn apply<R: Record>(records: &[R], query: &QueryState) -> Vec<R> {
    let mut matched: Vec<R> = records
        .iter()
        .filter(|record| matches(*record, query))
        .cloned()
        .collect();

    let order = query.sort.clone().unwrap_or_else(R::default_sort);
    sort_records(&mut matched, &order);
    matched
}

/// Whether `record` satisfies the search text and every active filter.
///
/// An active filter on a key outside `R::FILTER_KEYS` matches nothing.
pub fn matches<R: Filterable>(record: &R, query: &QueryState) -> bool {
    matches_search(record, &query.search)
        && query.active_filters().all(|(key, value)| {
            R::FILTER_KEYS.contains(&key) && record.filter_value(key).as_deref() == Some(value)
        })
}

/// Active filter keys in `query` that `R` does not expose.
pub fn unknown_filters<'q, R: Filterable>(query: &'q QueryState) -> Vec<&'q str> {
    query
        .active_filters()
        .map(|(key, _)| key)
        .filter(|key| !R::FILTER_KEYS.contains(key))
        .collect()
}

/// Case-insensitive substring match against the record's search fields.
pub fn matches_search<R: Filterable>(record: &R, search: &str) -> bool {
    if search.is_empty() {
        return true;
    }
    let needle = search.to_lowercase();
    record
        .search_values()
        .iter()
        .any(|value| value.to_lowercase().contains(&needle))
}

/// Stable sort. Records without a value for the sort key go last in either
/// direction.
pub fn sort_records<R: Record>(records: &mut [R], order: &SortOrder) {
    match order {
        SortOrder::Newest => {
            records.sort_by(|a, b| missing_last(a.created_at(), b.created_at(), SortDirection::Desc))
        }
        SortOrder::Oldest => {
            records.sort_by(|a, b| missing_last(a.created_at(), b.created_at(), SortDirection::Asc))
        }
        SortOrder::Field { key, direction } => {
            records.sort_by(|a, b| missing_last(a.sort_key(key), b.sort_key(key), *direction))
        }
    }
}

fn missing_last<T: Ord>(a: Option<T>, b: Option<T>, direction: SortDirection) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => match direction {
            SortDirection::Asc => a.cmp(&b),
            SortDirection::Desc => b.cmp(&a),
        },
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}
