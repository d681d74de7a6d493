//! Outbound access to the remote statistics API.
//!
//! The [`Gateway`] trait is synchronous so the engine stays usable from plain
//! iterator code. HTTP implementations live in `kolada-data`; tests use the
//! `StubGateway` behind the `test-support` feature.

mod error;
mod records;

pub use error::GatewayError;
pub use records::{AreaGroupRecord, AreaRecord, Cursor, DataPage, DataRow, RowValue};

use crate::Dataset;

/// Read-only access to the four logical endpoints of the statistics API.
///
/// # Examples
///
/// ```rust
/// use kolada_core::{
///     AreaGroupRecord, AreaRecord, DataPage, Dataset, Gateway, GatewayError,
/// };
///
/// struct EmptyGateway;
///
/// impl Gateway for EmptyGateway {
///     fn base_url(&self) -> &str {
///         "http://example.test/v2"
///     }
///     fn fetch_datasets(&self) -> Result<Vec<Dataset>, GatewayError> {
///         Ok(Vec::new())
///     }
///     fn fetch_areas(&self) -> Result<Vec<AreaRecord>, GatewayError> {
///         Ok(Vec::new())
///     }
///     fn fetch_area_groups(&self) -> Result<Vec<AreaGroupRecord>, GatewayError> {
///         Ok(Vec::new())
///     }
///     fn fetch_page(&self, _url: &str) -> Result<DataPage, GatewayError> {
///         Ok(DataPage::default())
///     }
/// }
///
/// assert!(EmptyGateway.fetch_page("http://example.test/v2/data/kpi/N1")?.rows.is_empty());
/// # Ok::<(), GatewayError>(())
/// ```
pub trait Gateway {
    /// Base URL that data paths are built against, without a trailing slash.
    fn base_url(&self) -> &str;

    /// Fetch the complete dataset (KPI) catalog.
    fn fetch_datasets(&self) -> Result<Vec<Dataset>, GatewayError>;

    /// Fetch the complete area catalog.
    fn fetch_areas(&self) -> Result<Vec<AreaRecord>, GatewayError>;

    /// Fetch the complete area-group catalog.
    fn fetch_area_groups(&self) -> Result<Vec<AreaGroupRecord>, GatewayError>;

    /// Fetch one page of observation data from `url`.
    ///
    /// `url` is either a path built by [`crate::build_query_path`] or a
    /// continuation reference taken from a previous page.
    fn fetch_page(&self, url: &str) -> Result<DataPage, GatewayError>;
}
