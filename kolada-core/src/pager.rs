//! Cursor-following iteration over paginated observation data.
//!
//! [`Observations`] requests one page at a time and yields each nested
//! observation as a flat [`Observation`]. Only the page being drained is held
//! in memory.

use std::iter::FusedIterator;
use std::mem;

use log::debug;
use serde::Serialize;

use crate::gateway::{Cursor, DataPage, DataRow, Gateway};
use crate::{Dataset, QueryPath, ScraperError};

/// Attributes describing one observation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ObservationAttributes {
    /// Indicator code.
    pub kpi: String,
    /// Indicator label.
    pub kpi_label: String,
    /// Area code.
    pub municipality: String,
    /// Period.
    pub period: String,
    /// Gender breakdown code.
    pub gender: String,
    /// Status flag.
    pub status: String,
}

/// A single observed value with its full attribute set.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Observation {
    /// Observed value; `None` when the source reports none.
    pub value: Option<f64>,
    /// Attributes locating the value.
    pub attributes: ObservationAttributes,
}

/// Lazy stream of observations for one query.
///
/// The iterator is finite and cannot be restarted. A gateway failure is
/// yielded once as `Err`, after which the iterator is exhausted. Dropping the
/// iterator early sends nothing to the server.
///
/// # Examples
///
/// ```
/// use kolada_core::test_support::StubGateway;
/// use kolada_core::{AreaType, Cursor, DataPage, DataRow, Dataset, Observations, QueryPath, RowValue};
///
/// let url = "http://example.test/v2/data/kpi/N00001";
/// let gateway = StubGateway::new().with_page(
///     url,
///     DataPage {
///         rows: vec![DataRow {
///             area: "0180".into(),
///             period: "2016".into(),
///             values: vec![RowValue { value: Some(1.5), gender: "T".into(), status: String::new() }],
///         }],
///         cursor: Cursor::Done,
///     },
/// );
/// let dataset = Dataset::new("N00001", "Example", AreaType::Municipality);
/// let observations: Vec<_> = Observations::new(&gateway, &dataset, QueryPath::new(url))
///     .collect::<Result<_, _>>()?;
/// assert_eq!(observations.len(), 1);
/// assert_eq!(observations[0].attributes.municipality, "0180");
/// # Ok::<(), kolada_core::ScraperError>(())
/// ```
pub struct Observations<'g, G: Gateway + ?Sized> {
    gateway: &'g G,
    kpi: String,
    kpi_label: String,
    buffered: std::vec::IntoIter<Observation>,
    cursor: Cursor,
}

impl<G: Gateway + ?Sized> std::fmt::Debug for Observations<'_, G> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Observations")
            .field("kpi", &self.kpi)
            .field("buffered", &self.buffered.len())
            .field("cursor", &self.cursor)
            .finish_non_exhaustive()
    }
}

impl<'g, G: Gateway + ?Sized> Observations<'g, G> {
    /// Start streaming `dataset` observations from `path`.
    ///
    /// No request is made until the first item is pulled.
    #[must_use]
    pub fn new(gateway: &'g G, dataset: &Dataset, path: QueryPath) -> Self {
        Self {
            gateway,
            kpi: dataset.id.clone(),
            kpi_label: dataset.label.clone(),
            buffered: Vec::new().into_iter(),
            cursor: Cursor::HasNext(path.into_inner()),
        }
    }

    fn flatten_rows(&self, rows: Vec<DataRow>) -> Vec<Observation> {
        rows.into_iter()
            .flat_map(|row| {
                let area = row.area;
                let period = row.period;
                row.values.into_iter().map(move |value| Observation {
                    value: value.value,
                    attributes: ObservationAttributes {
                        kpi: self.kpi.clone(),
                        kpi_label: self.kpi_label.clone(),
                        municipality: area.clone(),
                        period: period.clone(),
                        gender: value.gender,
                        status: value.status,
                    },
                })
            })
            .collect()
    }
}

impl<G: Gateway + ?Sized> Iterator for Observations<'_, G> {
    type Item = Result<Observation, ScraperError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(observation) = self.buffered.next() {
                return Some(Ok(observation));
            }
            let Cursor::HasNext(url) = mem::take(&mut self.cursor) else {
                return None;
            };
            debug!("GET {url}");
            match self.gateway.fetch_page(&url) {
                Ok(DataPage { rows, cursor }) => {
                    self.buffered = self.flatten_rows(rows).into_iter();
                    self.cursor = cursor;
                }
                Err(err) => return Some(Err(err.into())),
            }
        }
    }
}

impl<G: Gateway + ?Sized> FusedIterator for Observations<'_, G> {}
