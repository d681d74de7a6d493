//! Catalog browsing commands: `datasets`, `dimensions` and `values`.

use std::io::Write;

use clap::Parser;
use kolada_core::DimensionKind;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::{
    ARG_BASE_URL, ARG_DATASET, ARG_DIMENSION, ARG_TIMEOUT_SECS, CliError, ENV_DIMENSIONS_DATASET,
    ENV_VALUES_DATASET, ENV_VALUES_DIMENSION, GatewaySettings, ScraperBuilder, find_dataset,
    write_json_line,
};

/// CLI arguments for the `datasets` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(name = "datasets", about = "List every dataset in the Kolada catalog")]
#[ortho_config(prefix = "KOLADA")]
pub(crate) struct DatasetsArgs {
    /// Kolada API root (e.g. "http://api.kolada.se/v2").
    #[arg(long = ARG_BASE_URL, value_name = "url")]
    #[serde(default)]
    pub(crate) base_url: Option<String>,
    /// Per-request timeout in seconds.
    #[arg(long = ARG_TIMEOUT_SECS, value_name = "secs")]
    #[serde(default)]
    pub(crate) timeout_secs: Option<u64>,
}

impl DatasetsArgs {
    pub(crate) fn into_config(self) -> Result<DatasetsConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        Ok(DatasetsConfig::from(merged))
    }
}

/// Resolved `datasets` command configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct DatasetsConfig {
    pub(crate) gateway: GatewaySettings,
}

impl From<DatasetsArgs> for DatasetsConfig {
    fn from(args: DatasetsArgs) -> Self {
        Self {
            gateway: GatewaySettings::resolve(args.base_url, args.timeout_secs),
        }
    }
}

/// CLI arguments for the `dimensions` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    name = "dimensions",
    long_about = "List the dimensions of a dataset. Only the area, area \
                 group and period dimensions can be filtered in queries.",
    about = "List the dimensions of one dataset"
)]
#[ortho_config(prefix = "KOLADA")]
pub(crate) struct DimensionsArgs {
    /// Dataset (KPI) identifier, e.g. "N00945".
    #[arg(long = ARG_DATASET, value_name = "id")]
    #[serde(default)]
    pub(crate) dataset: Option<String>,
    /// Kolada API root (e.g. "http://api.kolada.se/v2").
    #[arg(long = ARG_BASE_URL, value_name = "url")]
    #[serde(default)]
    pub(crate) base_url: Option<String>,
    /// Per-request timeout in seconds.
    #[arg(long = ARG_TIMEOUT_SECS, value_name = "secs")]
    #[serde(default)]
    pub(crate) timeout_secs: Option<u64>,
}

impl DimensionsArgs {
    pub(crate) fn into_config(self) -> Result<DimensionsConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        DimensionsConfig::try_from(merged)
    }
}

/// Resolved `dimensions` command configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct DimensionsConfig {
    pub(crate) dataset: String,
    pub(crate) gateway: GatewaySettings,
}

impl TryFrom<DimensionsArgs> for DimensionsConfig {
    type Error = CliError;

    fn try_from(args: DimensionsArgs) -> Result<Self, Self::Error> {
        let dataset = args.dataset.ok_or(CliError::MissingArgument {
            field: ARG_DATASET,
            env: ENV_DIMENSIONS_DATASET,
        })?;
        Ok(Self {
            dataset,
            gateway: GatewaySettings::resolve(args.base_url, args.timeout_secs),
        })
    }
}

/// CLI arguments for the `values` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    name = "values",
    long_about = "List the codes a dimension accepts in queries. Only the \
                 municipality and area_group dimensions enumerate their \
                 values; every other dimension prints nothing.",
    about = "List the values a dimension accepts"
)]
#[ortho_config(prefix = "KOLADA")]
pub(crate) struct ValuesArgs {
    /// Dataset (KPI) identifier, e.g. "N00945".
    #[arg(long = ARG_DATASET, value_name = "id")]
    #[serde(default)]
    pub(crate) dataset: Option<String>,
    /// Dimension identifier, e.g. "municipality".
    #[arg(long = ARG_DIMENSION, value_name = "name")]
    #[serde(default)]
    pub(crate) dimension: Option<String>,
    /// Kolada API root (e.g. "http://api.kolada.se/v2").
    #[arg(long = ARG_BASE_URL, value_name = "url")]
    #[serde(default)]
    pub(crate) base_url: Option<String>,
    /// Per-request timeout in seconds.
    #[arg(long = ARG_TIMEOUT_SECS, value_name = "secs")]
    #[serde(default)]
    pub(crate) timeout_secs: Option<u64>,
}

impl ValuesArgs {
    pub(crate) fn into_config(self) -> Result<ValuesConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        ValuesConfig::try_from(merged)
    }
}

/// Resolved `values` command configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ValuesConfig {
    pub(crate) dataset: String,
    pub(crate) dimension: DimensionKind,
    pub(crate) gateway: GatewaySettings,
}

impl TryFrom<ValuesArgs> for ValuesConfig {
    type Error = CliError;

    fn try_from(args: ValuesArgs) -> Result<Self, Self::Error> {
        let dataset = args.dataset.ok_or(CliError::MissingArgument {
            field: ARG_DATASET,
            env: ENV_VALUES_DATASET,
        })?;
        let name = args.dimension.ok_or(CliError::MissingArgument {
            field: ARG_DIMENSION,
            env: ENV_VALUES_DIMENSION,
        })?;
        let dimension =
            DimensionKind::from_id(&name).ok_or(CliError::UnknownDimension { name })?;
        Ok(Self {
            dataset,
            dimension,
            gateway: GatewaySettings::resolve(args.base_url, args.timeout_secs),
        })
    }
}

pub(crate) fn run_datasets_with(
    args: DatasetsArgs,
    builder: &dyn ScraperBuilder,
    writer: &mut dyn Write,
) -> Result<(), CliError> {
    let config = args.into_config()?;
    let scraper = builder.build(&config.gateway)?;
    let datasets = scraper.list_datasets()?;
    info!(count = datasets.len(), "listing datasets");
    for dataset in &datasets {
        write_json_line(writer, dataset)?;
    }
    Ok(())
}

pub(crate) fn run_dimensions_with(
    args: DimensionsArgs,
    builder: &dyn ScraperBuilder,
    writer: &mut dyn Write,
) -> Result<(), CliError> {
    let config = args.into_config()?;
    let scraper = builder.build(&config.gateway)?;
    let dataset = find_dataset(scraper.as_ref(), &config.dataset)?;
    for dimension in scraper.list_dimensions(&dataset) {
        write_json_line(writer, &dimension)?;
    }
    Ok(())
}

pub(crate) fn run_values_with(
    args: ValuesArgs,
    builder: &dyn ScraperBuilder,
    writer: &mut dyn Write,
) -> Result<(), CliError> {
    let config = args.into_config()?;
    let scraper = builder.build(&config.gateway)?;
    let dataset = find_dataset(scraper.as_ref(), &config.dataset)?;
    let dimensions = scraper.list_dimensions(&dataset);
    let Some(dimension) = dimensions
        .iter()
        .find(|dimension| dimension.kind == config.dimension)
    else {
        return Err(CliError::UnknownDimension {
            name: config.dimension.id().to_owned(),
        });
    };
    let values = scraper.list_allowed_values(dimension)?;
    debug!(
        dataset = %dataset.id,
        dimension = dimension.id(),
        count = values.len(),
        "listing allowed values"
    );
    for value in &values {
        write_json_line(writer, value)?;
    }
    Ok(())
}

#[cfg(test)]
pub(crate) fn values_config_from_layers_for_test(
    layers: Vec<ortho_config::MergeLayer<'static>>,
) -> Result<ValuesConfig, CliError> {
    let merged = ValuesArgs::merge_from_layers(layers).map_err(CliError::from)?;
    ValuesConfig::try_from(merged)
}
