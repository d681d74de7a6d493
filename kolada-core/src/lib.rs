//! Core engine for the Kolada statistics adapter.
//!
//! Responsibilities:
//! - Describe datasets, their dimensions and the values those dimensions
//!   accept.
//! - Validate caller queries and render them as remote data paths.
//! - Stream observations lazily across paginated responses.
//!
//! Boundaries:
//! - No transport code lives here. Remote access goes through the
//!   [`Gateway`] trait; HTTP implementations live in `kolada-data`.
//!
//! Invariants:
//! - Allowed values are fetched at most once per [`KoladaScraper`].
//! - Query validation completes before any data page is requested.

#![forbid(unsafe_code)]

mod cache;
mod dataset;
mod dimension;
mod error;
mod gateway;
mod pager;
mod query;
mod scraper;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use cache::{AllowedValueCache, GroupClass, classify_group_title};
pub use dataset::{AreaType, Dataset};
pub use dimension::{AllowedValue, Dimension, DimensionKind, dimensions_for};
pub use error::ScraperError;
pub use gateway::{
    AreaGroupRecord, AreaRecord, Cursor, DataPage, DataRow, Gateway, GatewayError, RowValue,
};
pub use pager::{Observation, ObservationAttributes, Observations};
pub use query::{
    NormalizedQuery, QueryDimension, QueryError, QueryPath, build_query_path, coerce_raw_query,
    normalize_query,
};
pub use scraper::{KoladaScraper, ObservationStream, Scraper};
