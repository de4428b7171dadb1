//! ResourcePage - one back-office list page wired end to end.
//!
//! Record store → mutation gateway cache → list view (query, filter/sort,
//! pagination), with forms submitted back through the gateway.

use tracing::info;

use crate::config::{ConfigError, ConsoleConfig};
use crate::form::Form;
use crate::gateway::{MutationError, MutationGateway};
use crate::pagination::PageResult;
use crate::query::{QueryController, SortOrder};
use crate::record::Record;
use crate::store::{RecordStore, StoreBackend};
use crate::validate::Validate;
use crate::view::{ListView, LoadOutcome};

pub struct ResourcePage<S, R> {
    gateway: MutationGateway<S, R>,
    view: ListView<R>,
}

impl<R: Record> ResourcePage<StoreBackend, R> {
    /// Open the page for `R` with the store, page size and fetch limit from
    /// `config`.
    pub fn open_from_config(config: &ConsoleConfig) -> Result<Self, ConfigError> {
        let store = StoreBackend::open_for::<R>(config)?;
        info!(resource = R::RESOURCE, backend = ?store.kind(), "opening resource page");
        let gateway = MutationGateway::new(store).with_fetch_limit(config.fetch_limit());
        Ok(Self::with_gateway(
            gateway,
            QueryController::from_config(&config.pagination),
        ))
    }
}

impl<S: RecordStore, R: Record> ResourcePage<S, R> {
    pub fn new(store: S, controller: QueryController) -> Self {
        Self::with_gateway(MutationGateway::new(store), controller)
    }

    pub fn with_gateway(gateway: MutationGateway<S, R>, controller: QueryController) -> Self {
        Self {
            gateway,
            view: ListView::new(controller),
        }
    }

    pub fn gateway(&self) -> &MutationGateway<S, R> {
        &self.gateway
    }

    pub fn view(&self) -> &ListView<R> {
        &self.view
    }

    /// (Re)load the list from the store.
    pub fn load(&mut self) -> LoadOutcome {
        let ticket = self.view.begin_load();
        let result = self.gateway.refresh();
        self.view.complete_load(ticket, result)
    }

    /// The page currently on screen.
    pub fn page(&self) -> PageResult<R> {
        self.view.current_page()
    }

    pub fn set_search(&mut self, text: impl Into<String>) {
        self.view.set_search(text);
    }

    pub fn set_filter(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.view.set_filter(key, value);
    }

    pub fn reset_filters(&mut self) {
        self.view.reset_filters();
    }

    pub fn set_sort(&mut self, sort: Option<SortOrder>) {
        self.view.set_sort(sort);
    }

    pub fn set_page(&mut self, n: usize) {
        self.view.set_page(n);
    }

    pub fn set_page_size(&mut self, n: usize) {
        self.view.set_page_size(n);
    }

    /// Whether the row for `id` should have its actions disabled.
    pub fn is_pending(&self, id: &str) -> bool {
        self.gateway.is_pending(id)
    }

    pub fn unmount(&mut self) {
        self.view.unmount();
    }
}

impl<S: RecordStore, R: Record + Validate> ResourcePage<S, R> {
    /// Submit a form and bring the list up to date with the gateway's cache.
    pub fn submit(&mut self, form: &mut Form<R>) -> Result<Option<R>, MutationError> {
        let result = self.gateway.submit(form);
        if result.is_ok() {
            self.view.replace_records(self.gateway.records());
        }
        result
    }
}
