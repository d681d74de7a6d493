//! Static dimension catalog shared by every dataset.

use serde::Serialize;
use serde::ser::{SerializeStruct, Serializer};

use crate::{Dataset, QueryDimension};

/// The fixed set of dimensions a dataset exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DimensionKind {
    /// Area (municipality or region) code.
    Municipality,
    /// Area-group code.
    AreaGroup,
    /// Indicator code.
    Kpi,
    /// Indicator name.
    KpiLabel,
    /// Gender breakdown.
    Gender,
    /// Observation period.
    Period,
    /// Status flag.
    Status,
}

impl DimensionKind {
    /// Every kind, in catalog order.
    pub const ALL: [Self; 7] = [
        Self::Municipality,
        Self::AreaGroup,
        Self::Kpi,
        Self::KpiLabel,
        Self::Gender,
        Self::Period,
        Self::Status,
    ];

    /// Stable identifier used in queries and output records.
    #[must_use]
    pub const fn id(self) -> &'static str {
        match self {
            Self::Municipality => "municipality",
            Self::AreaGroup => "area_group",
            Self::Kpi => "kpi",
            Self::KpiLabel => "kpi_label",
            Self::Gender => "gender",
            Self::Period => "period",
            Self::Status => "status",
        }
    }

    /// Human-readable label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Municipality => "municipality",
            Self::AreaGroup => "municipality group",
            Self::Kpi => "indicator",
            Self::KpiLabel => "indicator name",
            Self::Gender => "gender",
            Self::Period => "period",
            Self::Status => "status",
        }
    }

    /// Look a kind up by identifier.
    #[must_use]
    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.id() == id)
    }

    /// The query dimension this kind filters on, if it is queryable.
    #[must_use]
    pub const fn query_dimension(self) -> Option<QueryDimension> {
        match self {
            Self::Municipality => Some(QueryDimension::Municipality),
            Self::AreaGroup => Some(QueryDimension::AreaGroup),
            Self::Period => Some(QueryDimension::Period),
            Self::Kpi | Self::KpiLabel | Self::Gender | Self::Status => None,
        }
    }
}

/// A dimension bound to the dataset it describes.
///
/// The dataset reference tells allowed-value resolution which area-type
/// partition to read.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Dimension<'a> {
    /// Which dimension this is.
    pub kind: DimensionKind,
    /// Owning dataset.
    pub dataset: &'a Dataset,
}

impl<'a> Dimension<'a> {
    /// Bind `kind` to `dataset`.
    #[must_use]
    pub const fn new(kind: DimensionKind, dataset: &'a Dataset) -> Self {
        Self { kind, dataset }
    }

    /// Dimension identifier.
    #[must_use]
    pub const fn id(&self) -> &'static str {
        self.kind.id()
    }

    /// Dimension label.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        self.kind.label()
    }

    /// Whether the dimension may appear as a query key.
    #[must_use]
    pub const fn is_queryable(&self) -> bool {
        self.kind.query_dimension().is_some()
    }
}

impl Serialize for Dimension<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("Dimension", 4)?;
        state.serialize_field("id", self.id())?;
        state.serialize_field("label", self.label())?;
        state.serialize_field("dataset", &self.dataset.id)?;
        state.serialize_field("queryable", &self.is_queryable())?;
        state.end()
    }
}

/// A permitted `(code, label)` pair for an area-like dimension.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AllowedValue {
    /// Code accepted in queries.
    pub code: String,
    /// Display label.
    pub label: String,
}

impl AllowedValue {
    /// Construct an allowed value.
    #[must_use]
    pub fn new(code: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            label: label.into(),
        }
    }
}

/// List the dimensions of `dataset` in catalog order.
///
/// # Examples
///
/// ```
/// use kolada_core::{AreaType, Dataset, dimensions_for};
///
/// let dataset = Dataset::new("N00945", "Invånare", AreaType::Municipality);
/// let ids: Vec<_> = dimensions_for(&dataset).iter().map(|d| d.id()).collect();
/// assert_eq!(
///     ids,
///     ["municipality", "area_group", "kpi", "kpi_label", "gender", "period", "status"]
/// );
/// ```
#[must_use]
pub fn dimensions_for(dataset: &Dataset) -> Vec<Dimension<'_>> {
    DimensionKind::ALL
        .into_iter()
        .map(|kind| Dimension::new(kind, dataset))
        .collect()
}
