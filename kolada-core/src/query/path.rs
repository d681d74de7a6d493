//! Render normalised queries as remote data paths.

use std::{fmt, ops::Deref};

use super::{NormalizedQuery, QueryDimension};

const DATA_SEGMENT: &str = "data/kpi";
const AREA_SEGMENT: &str = "municipality";
const PERIOD_SEGMENT: &str = "year";

/// Fully qualified URL of the first data page for a query.
///
/// # Examples
/// ```
/// # use kolada_core::QueryPath;
/// let path = QueryPath::new("http://api.kolada.se/v2/data/kpi/N00945");
/// assert!(path.ends_with("/N00945"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryPath(String);

impl QueryPath {
    /// Wrap an already rendered path.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Consume the wrapper and return the inner [`String`].
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl AsRef<str> for QueryPath {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Deref for QueryPath {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl fmt::Display for QueryPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Build the data path for `dataset_id` filtered by `query`.
///
/// Area codes and area-group codes share one `municipality` segment, areas
/// first, each in caller order and without deduplication. Periods form a
/// `year` segment. Absent or empty dimensions add no segment, which the
/// server reads as "all".
///
/// # Examples
/// ```
/// use kolada_core::{NormalizedQuery, QueryDimension, build_query_path};
///
/// let query = NormalizedQuery::new()
///     .with_values(QueryDimension::Municipality, ["0180", "0181"])
///     .with_values(QueryDimension::Period, ["2015", "2016"]);
/// let path = build_query_path("http://api.kolada.se/v2/", "N00001", &query);
/// assert_eq!(
///     path.as_ref(),
///     "http://api.kolada.se/v2/data/kpi/N00001/municipality/0180,0181/year/2015,2016"
/// );
/// ```
#[must_use]
pub fn build_query_path(base_url: &str, dataset_id: &str, query: &NormalizedQuery) -> QueryPath {
    let mut path = format!(
        "{}/{DATA_SEGMENT}/{dataset_id}",
        base_url.trim_end_matches('/')
    );

    let areas: Vec<&str> = query
        .values(QueryDimension::Municipality)
        .iter()
        .chain(query.values(QueryDimension::AreaGroup))
        .map(String::as_str)
        .collect();
    if !areas.is_empty() {
        path.push_str(&format!("/{AREA_SEGMENT}/{}", areas.join(",")));
    }

    let periods = query.values(QueryDimension::Period);
    if !periods.is_empty() {
        path.push_str(&format!("/{PERIOD_SEGMENT}/{}", periods.join(",")));
    }

    QueryPath(path)
}
