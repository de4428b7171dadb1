//! Query state - the user-controlled search, filter, sort and page parameters.
//!
//! [`QueryState`] is plain data. [`QueryController`] is the only thing that
//! mutates it and enforces the page invariants:
//!
//! - changing the search text, a filter or the sort order returns to page 1
//! - the current page is always clamped into `[1, total_pages]` of the
//!   current filtered result
//! - changing the page size re-derives the page count and then either clamps
//!   or resets the current page, per [`PageSizePolicy`]

pub mod engine;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::config::PaginationConfig;
use crate::pagination::total_pages;

/// Filter value meaning "no filter".
pub const ALL: &str = "all";

/// Whether a filter value is the "all" sentinel (or empty).
pub fn is_inactive_filter(value: &str) -> bool {
    value.is_empty() || value == ALL
}

/// Direction of a field sort.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

/// How a list is ordered.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    /// Most recent creation timestamp first.
    #[default]
    Newest,
    /// Oldest creation timestamp first.
    Oldest,
    /// By a record field.
    Field {
        key: String,
        direction: SortDirection,
    },
}

impl SortOrder {
    pub fn ascending(key: impl Into<String>) -> Self {
        SortOrder::Field {
            key: key.into(),
            direction: SortDirection::Asc,
        }
    }

    pub fn descending(key: impl Into<String>) -> Self {
        SortOrder::Field {
            key: key.into(),
            direction: SortDirection::Desc,
        }
    }
}

/// What happens to the current page when the page size changes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PageSizePolicy {
    /// Keep the current page, clamped to the new page count.
    #[default]
    Clamp,
    /// Go back to page 1.
    Reset,
}

/// Current search text, active filters, sort override and page position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryState {
    pub search: String,
    /// Filter key to selected value. Never holds the "all" sentinel.
    pub filters: BTreeMap<String, String>,
    /// 1-based page number.
    pub page: usize,
    pub page_size: usize,
    /// Overrides the record type's default order when set.
    pub sort: Option<SortOrder>,
}

impl Default for QueryState {
    fn default() -> Self {
        Self::new(10)
    }
}

impl QueryState {
    pub fn new(page_size: usize) -> Self {
        Self {
            search: String::new(),
            filters: BTreeMap::new(),
            page: 1,
            page_size: page_size.max(1),
            sort: None,
        }
    }

    /// Builder-style search text, for one-off queries.
    pub fn with_search(mut self, text: impl Into<String>) -> Self {
        self.search = text.into();
        self
    }

    /// Builder-style filter, for one-off queries.
    pub fn with_filter(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        let value = value.into();
        if !is_inactive_filter(&value) {
            self.filters.insert(key.into(), value);
        }
        self
    }

    pub fn with_sort(mut self, sort: SortOrder) -> Self {
        self.sort = Some(sort);
        self
    }

    /// Active (non-sentinel) filters.
    pub fn active_filters(&self) -> impl Iterator<Item = (&str, &str)> {
        self.filters
            .iter()
            .filter(|(_, value)| !is_inactive_filter(value))
            .map(|(key, value)| (key.as_str(), value.as_str()))
    }

    /// The selected value for a filter, or "all".
    pub fn filter(&self, key: &str) -> &str {
        self.filters.get(key).map(String::as_str).unwrap_or(ALL)
    }
}

/// Owner of a page's [`QueryState`].
#[derive(Debug, Clone)]
pub struct QueryController {
    state: QueryState,
    total_items: usize,
    policy: PageSizePolicy,
}

impl Default for QueryController {
    fn default() -> Self {
        Self::new(QueryState::default().page_size)
    }
}

impl QueryController {
    pub fn new(page_size: usize) -> Self {
        Self {
            state: QueryState::new(page_size),
            total_items: 0,
            policy: PageSizePolicy::default(),
        }
    }

    pub fn from_config(config: &PaginationConfig) -> Self {
        Self::new(config.page_size).with_policy(config.on_page_size_change)
    }

    pub fn with_policy(mut self, policy: PageSizePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn state(&self) -> &QueryState {
        &self.state
    }

    pub fn page(&self) -> usize {
        self.state.page
    }

    pub fn page_size(&self) -> usize {
        self.state.page_size
    }

    pub fn total_items(&self) -> usize {
        self.total_items
    }

    pub fn total_pages(&self) -> usize {
        total_pages(self.total_items, self.state.page_size)
    }

    pub fn set_search(&mut self, text: impl Into<String>) {
        self.state.search = text.into();
        self.state.page = 1;
    }

    /// Select a filter value. `"all"` (or an empty value) clears the filter.
    pub fn set_filter(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        if is_inactive_filter(&value) {
            self.state.filters.remove(&key);
        } else {
            self.state.filters.insert(key, value);
        }
        self.state.page = 1;
    }

    pub fn clear_filter(&mut self, key: &str) {
        self.state.filters.remove(key);
        self.state.page = 1;
    }

    /// Clear the search text and every filter.
    pub fn reset_filters(&mut self) {
        self.state.filters.clear();
        self.state.search.clear();
        self.state.page = 1;
    }

    pub fn set_sort(&mut self, sort: Option<SortOrder>) {
        self.state.sort = sort;
        self.state.page = 1;
    }

    /// Go to page `n`, clamped into the current page range.
    pub fn set_page(&mut self, n: usize) {
        self.state.page = n.clamp(1, self.total_pages());
    }

    pub fn next_page(&mut self) {
        self.set_page(self.state.page.saturating_add(1));
    }

    pub fn previous_page(&mut self) {
        self.set_page(self.state.page.saturating_sub(1));
    }

    pub fn set_page_size(&mut self, n: usize) {
        self.state.page_size = n.max(1);
        match self.policy {
            PageSizePolicy::Clamp => self.clamp_page(),
            PageSizePolicy::Reset => self.state.page = 1,
        }
    }

    /// Record the size of the current filtered result and re-clamp the page.
    pub fn sync_total(&mut self, total_items: usize) {
        self.total_items = total_items;
        self.clamp_page();
    }

    fn clamp_page(&mut self) {
        self.state.page = self.state.page.clamp(1, self.total_pages());
    }
}
