//! Caller queries: parsing, normalisation and remote path construction.
//!
//! Raw queries arrive as loosely typed JSON objects. [`normalize_query`]
//! turns them into a [`NormalizedQuery`] keyed by the closed
//! [`QueryDimension`] enumeration and checks area codes against the allowed
//! values of the dataset. [`build_query_path`] renders a normalised query as
//! the remote data path.

mod normalize;
mod path;

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use thiserror::Error;

pub use normalize::{coerce_raw_query, normalize_query};
pub use path::{QueryPath, build_query_path};

/// Dimensions that may be used as query keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum QueryDimension {
    /// Plain area codes. Also accepted under the name `area`.
    Municipality,
    /// Area-group codes.
    AreaGroup,
    /// Periods (years). Never validated.
    Period,
}

impl QueryDimension {
    /// Canonical query key.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Municipality => "municipality",
            Self::AreaGroup => "area_group",
            Self::Period => "period",
        }
    }

    /// Whether the dimension carries area codes.
    #[must_use]
    pub const fn is_area_like(self) -> bool {
        matches!(self, Self::Municipality | Self::AreaGroup)
    }
}

impl fmt::Display for QueryDimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for QueryDimension {
    type Err = QueryError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        match name {
            "municipality" | "area" => Ok(Self::Municipality),
            "area_group" => Ok(Self::AreaGroup),
            "period" => Ok(Self::Period),
            other => Err(QueryError::UnknownDimension {
                name: other.to_owned(),
            }),
        }
    }
}

/// Validation failures raised while normalising a query.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    /// The key is not a queryable dimension.
    #[error("you cannot query on dimension '{name}'")]
    UnknownDimension {
        /// Key as supplied by the caller.
        name: String,
    },
    /// The value cannot be rendered as a query string.
    #[error("unsupported value {value} for dimension '{dimension}'")]
    UnsupportedValue {
        /// Dimension the value was supplied for.
        dimension: QueryDimension,
        /// JSON rendering of the offending value.
        value: String,
    },
    /// An empty list was supplied where at least one value is needed.
    #[error("no values given for dimension '{dimension}'")]
    EmptyValues {
        /// Dimension supplied with an empty list.
        dimension: QueryDimension,
    },
    /// The value is not among the allowed values for the dataset.
    #[error("'{value}' is not an allowed value for dimension '{dimension}'")]
    DisallowedValue {
        /// Dimension the value was supplied for.
        dimension: QueryDimension,
        /// Offending value.
        value: String,
    },
}

/// A validated query: each present dimension maps to its values in caller
/// order.
///
/// # Examples
///
/// ```
/// use kolada_core::{NormalizedQuery, QueryDimension};
///
/// let query = NormalizedQuery::new()
///     .with_values(QueryDimension::Municipality, ["0180", "0181"])
///     .with_values(QueryDimension::Period, ["2016"]);
/// assert_eq!(query.values(QueryDimension::Municipality), ["0180", "0181"]);
/// assert!(!query.contains(QueryDimension::AreaGroup));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NormalizedQuery(BTreeMap<QueryDimension, Vec<String>>);

impl NormalizedQuery {
    /// Create an empty query.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `values` to `dimension`, preserving order.
    #[must_use]
    pub fn with_values<I, S>(mut self, dimension: QueryDimension, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.extend(dimension, values.into_iter().map(Into::into));
        self
    }

    /// Append `values` to `dimension`, preserving order.
    pub fn extend(&mut self, dimension: QueryDimension, values: impl IntoIterator<Item = String>) {
        self.0.entry(dimension).or_default().extend(values);
    }

    /// Replace the values of `dimension`.
    pub fn insert(&mut self, dimension: QueryDimension, values: Vec<String>) {
        self.0.insert(dimension, values);
    }

    /// Values for `dimension`; empty when absent.
    #[must_use]
    pub fn values(&self, dimension: QueryDimension) -> &[String] {
        self.0.get(&dimension).map_or(&[], Vec::as_slice)
    }

    /// Whether `dimension` was supplied.
    #[must_use]
    pub fn contains(&self, dimension: QueryDimension) -> bool {
        self.0.contains_key(&dimension)
    }

    /// Whether no dimension was supplied.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over dimensions and their values.
    pub fn iter(&self) -> impl Iterator<Item = (QueryDimension, &[String])> {
        self.0
            .iter()
            .map(|(dimension, values)| (*dimension, values.as_slice()))
    }
}
