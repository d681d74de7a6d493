//! Turn raw JSON queries into validated [`NormalizedQuery`] values.

use serde_json::Value;

use super::{NormalizedQuery, QueryDimension, QueryError};
use crate::cache::AllowedValueCache;
use crate::gateway::Gateway;
use crate::{AllowedValue, Dataset, ScraperError};

/// Parse keys and coerce values of a raw query without consulting any
/// allowed-value set.
///
/// Non-object input is treated as an empty query. Scalars become singleton
/// lists; strings are kept verbatim, numbers and booleans use their JSON
/// rendering.
///
/// # Errors
///
/// Returns [`QueryError::UnknownDimension`] for keys outside the queryable
/// set, [`QueryError::EmptyValues`] for an empty list, and
/// [`QueryError::UnsupportedValue`] for `null`, nested arrays, and objects.
///
/// # Examples
///
/// ```
/// use kolada_core::{QueryDimension, coerce_raw_query};
/// use serde_json::json;
///
/// let query = coerce_raw_query(&json!({ "municipality": "0180", "period": 2016 }))?;
/// assert_eq!(query.values(QueryDimension::Municipality), ["0180"]);
/// assert_eq!(query.values(QueryDimension::Period), ["2016"]);
/// # Ok::<(), kolada_core::QueryError>(())
/// ```
pub fn coerce_raw_query(raw: &Value) -> Result<NormalizedQuery, QueryError> {
    let mut query = NormalizedQuery::new();
    let Value::Object(entries) = raw else {
        return Ok(query);
    };
    for (key, value) in entries {
        let dimension: QueryDimension = key.parse()?;
        let values = match value {
            Value::Array(items) if items.is_empty() => {
                return Err(QueryError::EmptyValues { dimension });
            }
            Value::Array(items) => items
                .iter()
                .map(|item| stringify(dimension, item))
                .collect::<Result<Vec<_>, _>>()?,
            scalar => vec![stringify(dimension, scalar)?],
        };
        query.extend(dimension, values);
    }
    Ok(query)
}

fn stringify(dimension: QueryDimension, value: &Value) -> Result<String, QueryError> {
    match value {
        Value::String(text) => Ok(text.clone()),
        Value::Number(number) => Ok(number.to_string()),
        Value::Bool(flag) => Ok(flag.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => Err(QueryError::UnsupportedValue {
            dimension,
            value: value.to_string(),
        }),
    }
}

/// Normalise and validate `raw` against the allowed values of `dataset`.
///
/// When neither an area-like dimension nor `period` is supplied, the area
/// dimension defaults to every allowed area of the dataset's area-type.
///
/// # Errors
///
/// Returns [`ScraperError::Query`] for unknown keys, unsupported values, or
/// area codes outside the allowed set, and [`ScraperError::Gateway`] when the
/// allowed values cannot be fetched.
pub fn normalize_query<G: Gateway + ?Sized>(
    dataset: &Dataset,
    raw: &Value,
    cache: &AllowedValueCache,
    gateway: &G,
) -> Result<NormalizedQuery, ScraperError> {
    let mut query = coerce_raw_query(raw)?;

    if query.is_empty() {
        let everywhere = cache
            .allowed_areas(gateway, &dataset.area_type)?
            .into_iter()
            .map(|value| value.code)
            .collect();
        query.insert(QueryDimension::Municipality, everywhere);
    }

    for dimension in [QueryDimension::Municipality, QueryDimension::AreaGroup] {
        if !query.contains(dimension) {
            continue;
        }
        let allowed = match dimension {
            QueryDimension::AreaGroup => cache.allowed_area_groups(gateway, &dataset.area_type)?,
            _ => cache.allowed_areas(gateway, &dataset.area_type)?,
        };
        ensure_allowed(dimension, query.values(dimension), &allowed)?;
    }

    Ok(query)
}

fn ensure_allowed(
    dimension: QueryDimension,
    values: &[String],
    allowed: &[AllowedValue],
) -> Result<(), QueryError> {
    match values
        .iter()
        .find(|value| !allowed.iter().any(|candidate| &candidate.code == *value))
    {
        Some(value) => Err(QueryError::DisallowedValue {
            dimension,
            value: value.clone(),
        }),
        None => Ok(()),
    }
}
