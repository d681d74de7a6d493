//! Test-only, in-memory `Gateway` implementation used by unit and behaviour
//! tests across the workspace. Compiled for this crate's own tests and
//! behind the `test-support` feature elsewhere.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;

use crate::gateway::{AreaGroupRecord, AreaRecord, DataPage, Gateway, GatewayError};
use crate::Dataset;

/// Base URL reported by [`StubGateway`].
pub const STUB_BASE_URL: &str = "http://example.test/v2";

/// Canned `Gateway` that records every request it serves.
///
/// Pages are keyed by their full URL. Requesting a URL with no registered
/// page yields an HTTP 404 error, which keeps accidental requests visible in
/// tests.
#[derive(Debug, Default)]
pub struct StubGateway {
    datasets: Vec<Dataset>,
    areas: Vec<AreaRecord>,
    area_groups: Vec<AreaGroupRecord>,
    pages: HashMap<String, Result<DataPage, GatewayError>>,
    area_failure: RefCell<Option<GatewayError>>,
    dataset_fetches: Cell<usize>,
    area_fetches: Cell<usize>,
    area_group_fetches: Cell<usize>,
    requested: RefCell<Vec<String>>,
}

impl StubGateway {
    /// Create a gateway with empty catalogs and no pages.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `datasets` from the dataset catalog.
    #[must_use]
    pub fn with_datasets(mut self, datasets: Vec<Dataset>) -> Self {
        self.datasets = datasets;
        self
    }

    /// Serve `areas` from the area catalog.
    #[must_use]
    pub fn with_areas(mut self, areas: Vec<AreaRecord>) -> Self {
        self.areas = areas;
        self
    }

    /// Serve `groups` from the area-group catalog.
    #[must_use]
    pub fn with_area_groups(mut self, groups: Vec<AreaGroupRecord>) -> Self {
        self.area_groups = groups;
        self
    }

    /// Make the next area catalog fetch fail with `error`.
    ///
    /// Later fetches succeed again.
    #[must_use]
    pub fn fail_next_area_fetch(self, error: GatewayError) -> Self {
        self.area_failure.replace(Some(error));
        self
    }

    /// Register `page` as the response for `url`.
    #[must_use]
    pub fn with_page(mut self, url: impl Into<String>, page: DataPage) -> Self {
        self.pages.insert(url.into(), Ok(page));
        self
    }

    /// Register `error` as the response for `url`.
    #[must_use]
    pub fn with_page_error(mut self, url: impl Into<String>, error: GatewayError) -> Self {
        self.pages.insert(url.into(), Err(error));
        self
    }

    /// Number of dataset catalog fetches served so far.
    #[must_use]
    pub fn dataset_fetches(&self) -> usize {
        self.dataset_fetches.get()
    }

    /// Number of area catalog fetches served so far, failures included.
    #[must_use]
    pub fn area_fetches(&self) -> usize {
        self.area_fetches.get()
    }

    /// Number of area-group catalog fetches served so far.
    #[must_use]
    pub fn area_group_fetches(&self) -> usize {
        self.area_group_fetches.get()
    }

    /// URLs of every data page requested, in request order.
    #[must_use]
    pub fn requested_pages(&self) -> Vec<String> {
        self.requested.borrow().clone()
    }
}

impl Gateway for StubGateway {
    fn base_url(&self) -> &str {
        STUB_BASE_URL
    }

    fn fetch_datasets(&self) -> Result<Vec<Dataset>, GatewayError> {
        self.dataset_fetches.set(self.dataset_fetches.get() + 1);
        Ok(self.datasets.clone())
    }

    fn fetch_areas(&self) -> Result<Vec<AreaRecord>, GatewayError> {
        self.area_fetches.set(self.area_fetches.get() + 1);
        if let Some(error) = self.area_failure.take() {
            return Err(error);
        }
        Ok(self.areas.clone())
    }

    fn fetch_area_groups(&self) -> Result<Vec<AreaGroupRecord>, GatewayError> {
        self.area_group_fetches
            .set(self.area_group_fetches.get() + 1);
        Ok(self.area_groups.clone())
    }

    fn fetch_page(&self, url: &str) -> Result<DataPage, GatewayError> {
        self.requested.borrow_mut().push(url.to_owned());
        self.pages.get(url).cloned().unwrap_or_else(|| {
            Err(GatewayError::Http {
                url: url.to_owned(),
                status: 404,
                message: "no page registered".to_owned(),
            })
        })
    }
}
