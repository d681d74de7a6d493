//! The public scraper contract and its Kolada implementation.

use log::debug;
use serde_json::Value;

use crate::cache::AllowedValueCache;
use crate::gateway::Gateway;
use crate::pager::{Observation, Observations};
use crate::query::{NormalizedQuery, QueryPath, build_query_path, normalize_query};
use crate::{AllowedValue, Dataset, Dimension, DimensionKind, ScraperError, dimensions_for};

/// Boxed stream of observations returned by [`Scraper::fetch_data`].
pub type ObservationStream<'s> = Box<dyn Iterator<Item = Result<Observation, ScraperError>> + 's>;

/// Uniform access to a statistics source.
///
/// Implementations expose datasets, their dimensions, the values those
/// dimensions accept, and a lazy stream of observations for a query.
pub trait Scraper {
    /// List every dataset offered by the source.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::Gateway`] when the catalog cannot be fetched.
    fn list_datasets(&self) -> Result<Vec<Dataset>, ScraperError>;

    /// List the dimensions of `dataset`. Makes no network request.
    fn list_dimensions<'d>(&self, dataset: &'d Dataset) -> Vec<Dimension<'d>>;

    /// List the values `dimension` accepts in queries.
    ///
    /// Only area-like dimensions have an enumerated value set; every other
    /// dimension yields an empty list.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::Gateway`] when a catalog cannot be fetched.
    fn list_allowed_values(
        &self,
        dimension: &Dimension<'_>,
    ) -> Result<Vec<AllowedValue>, ScraperError>;

    /// Stream the observations of `dataset` matching `raw_query`.
    ///
    /// The query is validated before any data request is issued.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::Query`] for invalid queries and
    /// [`ScraperError::Gateway`] when allowed values cannot be fetched.
    /// Failures while paging surface as `Err` items of the stream.
    fn fetch_data<'s>(
        &'s self,
        dataset: &Dataset,
        raw_query: &Value,
    ) -> Result<ObservationStream<'s>, ScraperError>;
}

/// Scraper for the Kolada municipal statistics API.
///
/// Owns its allowed-value cache, so two scrapers never share fetched
/// catalogs.
///
/// # Examples
///
/// ```
/// use kolada_core::test_support::StubGateway;
/// use kolada_core::{AreaType, Dataset, KoladaScraper, Scraper};
///
/// let gateway = StubGateway::new().with_datasets(vec![Dataset::new(
///     "N00945",
///     "Invånare totalt",
///     AreaType::Municipality,
/// )]);
/// let scraper = KoladaScraper::new(gateway);
/// let datasets = scraper.list_datasets()?;
/// assert_eq!(datasets.len(), 1);
/// assert_eq!(scraper.list_dimensions(&datasets[0]).len(), 7);
/// # Ok::<(), kolada_core::ScraperError>(())
/// ```
#[derive(Debug)]
pub struct KoladaScraper<G> {
    gateway: G,
    cache: AllowedValueCache,
}

impl<G: Gateway> KoladaScraper<G> {
    /// Wrap `gateway` with a fresh, empty cache.
    #[must_use]
    pub fn new(gateway: G) -> Self {
        Self {
            gateway,
            cache: AllowedValueCache::new(),
        }
    }

    /// The underlying gateway.
    #[must_use]
    pub const fn gateway(&self) -> &G {
        &self.gateway
    }

    /// The allowed-value cache owned by this scraper.
    #[must_use]
    pub const fn cache(&self) -> &AllowedValueCache {
        &self.cache
    }

    /// Find a dataset by identifier in the remote catalog.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::UnknownDataset`] when no dataset matches and
    /// [`ScraperError::Gateway`] when the catalog cannot be fetched.
    pub fn dataset(&self, id: &str) -> Result<Dataset, ScraperError> {
        self.list_datasets()?
            .into_iter()
            .find(|dataset| dataset.id == id)
            .ok_or_else(|| ScraperError::UnknownDataset { id: id.to_owned() })
    }

    /// Validate `raw_query` against `dataset` without fetching any data.
    ///
    /// # Errors
    ///
    /// See [`crate::normalize_query`].
    pub fn normalize_query(
        &self,
        dataset: &Dataset,
        raw_query: &Value,
    ) -> Result<NormalizedQuery, ScraperError> {
        normalize_query(dataset, raw_query, &self.cache, &self.gateway)
    }

    /// Render the first data page URL for a validated query.
    #[must_use]
    pub fn query_path(&self, dataset: &Dataset, query: &NormalizedQuery) -> QueryPath {
        build_query_path(self.gateway.base_url(), &dataset.id, query)
    }
}

impl<G: Gateway> Scraper for KoladaScraper<G> {
    fn list_datasets(&self) -> Result<Vec<Dataset>, ScraperError> {
        Ok(self.gateway.fetch_datasets()?)
    }

    fn list_dimensions<'d>(&self, dataset: &'d Dataset) -> Vec<Dimension<'d>> {
        dimensions_for(dataset)
    }

    fn list_allowed_values(
        &self,
        dimension: &Dimension<'_>,
    ) -> Result<Vec<AllowedValue>, ScraperError> {
        let area_type = &dimension.dataset.area_type;
        let values = match dimension.kind {
            DimensionKind::Municipality => self.cache.allowed_areas(&self.gateway, area_type)?,
            DimensionKind::AreaGroup => {
                self.cache.allowed_area_groups(&self.gateway, area_type)?
            }
            DimensionKind::Kpi
            | DimensionKind::KpiLabel
            | DimensionKind::Gender
            | DimensionKind::Period
            | DimensionKind::Status => Vec::new(),
        };
        Ok(values)
    }

    fn fetch_data<'s>(
        &'s self,
        dataset: &Dataset,
        raw_query: &Value,
    ) -> Result<ObservationStream<'s>, ScraperError> {
        let query = self.normalize_query(dataset, raw_query)?;
        let path = self.query_path(dataset, &query);
        debug!("streaming {} from {path}", dataset.id);
        Ok(Box::new(Observations::new(&self.gateway, dataset, path)))
    }
}
