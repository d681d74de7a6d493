//! Datasets (KPIs) and the area-type that scopes their geography.

use std::fmt;

use serde::{Serialize, Serializer};
use serde_json::{Map, Value};

/// Area-type code attached to a dataset and to each area.
///
/// Only [`AreaType::Municipality`] (`K`) and [`AreaType::Region`] (`L`) have
/// allowed-value partitions; any other code resolves to no allowed values.
///
/// # Examples
///
/// ```
/// use kolada_core::AreaType;
///
/// assert_eq!(AreaType::from_code("K"), AreaType::Municipality);
/// assert_eq!(AreaType::from_code("L").code(), "L");
/// assert!(!AreaType::from_code("A").is_partitioned());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum AreaType {
    /// Municipalities, code `K`.
    Municipality,
    /// Regions (county councils), code `L`.
    Region,
    /// Any other code reported by the catalog.
    Other(String),
}

impl AreaType {
    /// Parse a raw catalog code.
    #[must_use]
    pub fn from_code(code: &str) -> Self {
        match code {
            "K" => Self::Municipality,
            "L" => Self::Region,
            other => Self::Other(other.to_owned()),
        }
    }

    /// The raw catalog code.
    #[must_use]
    pub fn code(&self) -> &str {
        match self {
            Self::Municipality => "K",
            Self::Region => "L",
            Self::Other(code) => code,
        }
    }

    /// Whether allowed values are partitioned under this type.
    #[must_use]
    pub const fn is_partitioned(&self) -> bool {
        matches!(self, Self::Municipality | Self::Region)
    }
}

impl fmt::Display for AreaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl Serialize for AreaType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.code())
    }
}

/// One indicator series exposed by the statistics API.
///
/// # Examples
///
/// ```
/// use kolada_core::{AreaType, Dataset};
///
/// let dataset = Dataset::new("N00945", "Invånare totalt", AreaType::Municipality);
/// assert_eq!(dataset.id, "N00945");
/// assert!(dataset.blob.is_empty());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dataset {
    /// Dataset identifier (KPI code).
    pub id: String,
    /// Display label.
    pub label: String,
    /// Area-type scoping which areas apply to this dataset.
    pub area_type: AreaType,
    /// Remaining catalog attributes, passed through untouched.
    pub blob: Map<String, Value>,
}

impl Dataset {
    /// Construct a dataset with an empty attribute blob.
    #[must_use]
    pub fn new(id: impl Into<String>, label: impl Into<String>, area_type: AreaType) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            area_type,
            blob: Map::new(),
        }
    }

    /// Attach the raw catalog attributes.
    #[must_use]
    pub fn with_blob(mut self, blob: Map<String, Value>) -> Self {
        self.blob = blob;
        self
    }
}
