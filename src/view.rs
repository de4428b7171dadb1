//! List view state: cached records, the query controller, and load tracking.
//!
//! The view always recomputes the visible page from its records and query
//! through the filter/sort engine and the paginator, so the page shown can
//! never disagree with the data. Loads are tracked with tickets: completing a
//! superseded load, or any load after the view is unmounted, is discarded.

use tracing::{debug, warn};

use crate::pagination::{paginate, PageResult};
use crate::query::{engine, QueryController, QueryState, SortOrder};
use crate::record::Record;
use crate::store::StoreError;

/// Identifies one in-flight list load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadTicket(u64);

/// What happened to a completed load.
#[derive(Debug)]
pub enum LoadOutcome {
    /// The records replaced the view's list.
    Applied,
    /// The view was unmounted or a newer load started; nothing changed.
    Discarded,
    /// The load failed; the previous records are kept.
    Failed(StoreError),
}

#[derive(Debug, Clone)]
pub struct ListView<R> {
    records: Vec<R>,
    controller: QueryController,
    mounted: bool,
    generation: u64,
    loading: bool,
    last_error: Option<StoreError>,
}

impl<R: Record> Default for ListView<R> {
    fn default() -> Self {
        Self::new(QueryController::default())
    }
}

impl<R: Record> ListView<R> {
    pub fn new(controller: QueryController) -> Self {
        Self {
            records: Vec::new(),
            controller,
            mounted: true,
            generation: 0,
            loading: false,
            last_error: None,
        }
    }

    pub fn records(&self) -> &[R] {
        &self.records
    }

    pub fn query(&self) -> &QueryState {
        self.controller.state()
    }

    pub fn controller(&self) -> &QueryController {
        &self.controller
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    /// Error of the most recent failed load, cleared by the next success.
    pub fn last_error(&self) -> Option<&StoreError> {
        self.last_error.as_ref()
    }

    /// The filtered, sorted result for the current query (all pages).
    pub fn filtered(&self) -> Vec<R> {
        engine::apply(&self.records, self.controller.state())
    }

    /// The page currently on screen.
    pub fn current_page(&self) -> PageResult<R> {
        let state = self.controller.state();
        paginate(&self.filtered(), state.page, state.page_size)
    }

    pub fn replace_records(&mut self, records: Vec<R>) {
        self.records = records;
        self.sync();
    }

    pub fn set_search(&mut self, text: impl Into<String>) {
        self.controller.set_search(text);
        self.sync();
    }

    /// Filter keys the record type exposes.
    pub fn filter_keys(&self) -> &'static [&'static str] {
        R::FILTER_KEYS
    }

    /// Set a filter. A key the record type does not expose is kept, and
    /// while it is active the view is empty.
    pub fn set_filter(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        if !R::FILTER_KEYS.contains(&key.as_str()) {
            warn!(resource = R::RESOURCE, filter = %key, known = ?R::FILTER_KEYS, "unknown filter key");
        }
        self.controller.set_filter(key, value);
        self.sync();
    }

    pub fn clear_filter(&mut self, key: &str) {
        self.controller.clear_filter(key);
        self.sync();
    }

    pub fn reset_filters(&mut self) {
        self.controller.reset_filters();
        self.sync();
    }

    pub fn set_sort(&mut self, sort: Option<SortOrder>) {
        self.controller.set_sort(sort);
        self.sync();
    }

    pub fn set_page(&mut self, n: usize) {
        self.controller.set_page(n);
    }

    pub fn next_page(&mut self) {
        self.controller.next_page();
    }

    pub fn previous_page(&mut self) {
        self.controller.previous_page();
    }

    pub fn set_page_size(&mut self, n: usize) {
        self.controller.set_page_size(n);
    }

    /// Start a load. Any earlier ticket becomes stale.
    pub fn begin_load(&mut self) -> LoadTicket {
        self.generation += 1;
        self.loading = true;
        LoadTicket(self.generation)
    }

    /// Finish the load identified by `ticket`.
    pub fn complete_load(
        &mut self,
        ticket: LoadTicket,
        result: Result<Vec<R>, StoreError>,
    ) -> LoadOutcome {
        if !self.mounted || ticket.0 != self.generation {
            debug!(resource = R::RESOURCE, ticket = ticket.0, "discarding stale load");
            return LoadOutcome::Discarded;
        }
        self.loading = false;
        match result {
            Ok(records) => {
                self.last_error = None;
                self.replace_records(records);
                LoadOutcome::Applied
            }
            Err(err) => {
                warn!(resource = R::RESOURCE, error = %err, "load failed");
                self.last_error = Some(err.clone());
                LoadOutcome::Failed(err)
            }
        }
    }

    /// Detach the view. Loads still in flight will be discarded.
    pub fn unmount(&mut self) {
        self.mounted = false;
        self.loading = false;
    }

    fn sync(&mut self) {
        let total = engine::apply(&self.records, self.controller.state()).len();
        self.controller.sync_total(total);
    }
}
