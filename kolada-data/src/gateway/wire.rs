//! Kolada v2 response types.
//!
//! Every endpoint wraps its entries in the same envelope: a `values` array and
//! an optional `next_page` link pointing at the continuation.
//!
//! See: <http://api.kolada.se/v2/>

use kolada_core::{AreaGroupRecord, AreaRecord, AreaType, DataRow, Dataset, RowValue};
use serde::Deserialize;
use serde_json::{Map, Value};

/// Paginated response envelope shared by all endpoints.
#[derive(Debug, Deserialize)]
pub struct Envelope<T> {
    /// Entries on this page.
    #[serde(default = "Vec::new")]
    pub values: Vec<T>,
    /// Absolute or relative link to the next page, when one exists.
    #[serde(default)]
    pub next_page: Option<String>,
}

/// One KPI entry from `/kpi`.
#[derive(Debug, Deserialize)]
pub struct KpiEntry {
    /// KPI code.
    pub id: String,
    /// Display title.
    pub title: String,
    /// Area-type code (`K`, `L`, or anything else).
    #[serde(default)]
    pub municipality_type: String,
    /// Every other attribute, kept verbatim.
    #[serde(flatten)]
    pub rest: Map<String, Value>,
}

impl KpiEntry {
    /// Convert into the core dataset type.
    pub fn into_dataset(self) -> Dataset {
        Dataset::new(
            self.id,
            self.title,
            AreaType::from_code(&self.municipality_type),
        )
        .with_blob(self.rest)
    }
}

/// One entry from `/municipality`.
#[derive(Debug, Deserialize)]
pub struct MunicipalityEntry {
    id: String,
    title: String,
    #[serde(rename = "type", default)]
    kind: String,
}

impl From<MunicipalityEntry> for AreaRecord {
    fn from(entry: MunicipalityEntry) -> Self {
        Self::new(entry.id, entry.title, entry.kind)
    }
}

/// One entry from `/municipality_groups`. Member lists are ignored.
#[derive(Debug, Deserialize)]
pub struct GroupEntry {
    id: String,
    title: String,
}

impl From<GroupEntry> for AreaGroupRecord {
    fn from(entry: GroupEntry) -> Self {
        Self::new(entry.id, entry.title)
    }
}

/// Period as reported by the data endpoint: usually a year number.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Period {
    Number(i64),
    Text(String),
}

impl Period {
    fn into_string(self) -> String {
        match self {
            Self::Number(year) => year.to_string(),
            Self::Text(text) => text,
        }
    }
}

/// One row from `/data/kpi/...`.
#[derive(Debug, Deserialize)]
pub struct DataEntry {
    municipality: String,
    period: Period,
    #[serde(default)]
    values: Vec<ValueEntry>,
}

/// A nested observation inside a [`DataEntry`].
#[derive(Debug, Deserialize)]
struct ValueEntry {
    #[serde(default)]
    gender: Option<String>,
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    value: Option<f64>,
}

impl From<DataEntry> for DataRow {
    fn from(entry: DataEntry) -> Self {
        Self {
            area: entry.municipality,
            period: entry.period.into_string(),
            values: entry
                .values
                .into_iter()
                .map(|value| RowValue {
                    value: value.value,
                    gender: value.gender.unwrap_or_default(),
                    status: value.status.unwrap_or_default(),
                })
                .collect(),
        }
    }
}
