//! Top-level error returned by [`crate::Scraper`] operations.

use thiserror::Error;

use crate::{GatewayError, QueryError};

/// Fatal failure of a scraper operation.
///
/// Validation failures are raised before any data request is issued;
/// transport failures end the active pull.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScraperError {
    /// The caller's query was rejected.
    #[error(transparent)]
    Query(#[from] QueryError),
    /// The remote API could not be reached or answered badly.
    #[error(transparent)]
    Gateway(#[from] GatewayError),
    /// No dataset with the requested identifier exists in the catalog.
    #[error("unknown dataset '{id}'")]
    UnknownDataset {
        /// Requested dataset identifier.
        id: String,
    },
}
