//! Fetch command implementation for the Kolada CLI.

use std::io::Write;

use clap::Parser;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::info;

use crate::{
    ARG_BASE_URL, ARG_DATASET, ARG_QUERY, ARG_TIMEOUT_SECS, CliError, ENV_FETCH_DATASET,
    GatewaySettings, ScraperBuilder, find_dataset, write_json_line,
};

/// CLI arguments for the `fetch` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    name = "fetch",
    long_about = "Stream the observations of a dataset as JSON lines. The \
                 query is a JSON object mapping municipality, area_group or \
                 period to a value or a list of values. An empty query \
                 fetches every area the dataset covers.",
    about = "Stream the observations matching a query"
)]
#[ortho_config(prefix = "KOLADA")]
pub(crate) struct FetchArgs {
    /// Dataset (KPI) identifier, e.g. "N00945".
    #[arg(long = ARG_DATASET, value_name = "id")]
    #[serde(default)]
    pub(crate) dataset: Option<String>,
    /// JSON query, e.g. '{"municipality": ["0180"], "period": 2016}'.
    #[arg(long = ARG_QUERY, value_name = "json")]
    #[serde(default)]
    pub(crate) query: Option<String>,
    /// Kolada API root (e.g. "http://api.kolada.se/v2").
    #[arg(long = ARG_BASE_URL, value_name = "url")]
    #[serde(default)]
    pub(crate) base_url: Option<String>,
    /// Per-request timeout in seconds.
    #[arg(long = ARG_TIMEOUT_SECS, value_name = "secs")]
    #[serde(default)]
    pub(crate) timeout_secs: Option<u64>,
}

impl FetchArgs {
    pub(crate) fn into_config(self) -> Result<FetchConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        FetchConfig::try_from(merged)
    }
}

/// Resolved `fetch` command configuration.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct FetchConfig {
    pub(crate) dataset: String,
    /// Raw query, validated by the scraper before any data request.
    pub(crate) query: Value,
    pub(crate) gateway: GatewaySettings,
}

impl TryFrom<FetchArgs> for FetchConfig {
    type Error = CliError;

    fn try_from(args: FetchArgs) -> Result<Self, Self::Error> {
        let dataset = args.dataset.ok_or(CliError::MissingArgument {
            field: ARG_DATASET,
            env: ENV_FETCH_DATASET,
        })?;
        let query = match args.query {
            Some(raw) => serde_json::from_str(&raw).map_err(CliError::ParseQuery)?,
            None => Value::Object(serde_json::Map::new()),
        };
        Ok(Self {
            dataset,
            query,
            gateway: GatewaySettings::resolve(args.base_url, args.timeout_secs),
        })
    }
}

/// Stream every observation to `writer`.
///
/// Observations already written stay written when a later page fails; the
/// failure is returned after the last good record.
pub(crate) fn run_fetch_with(
    args: FetchArgs,
    builder: &dyn ScraperBuilder,
    writer: &mut dyn Write,
) -> Result<(), CliError> {
    let config = args.into_config()?;
    let scraper = builder.build(&config.gateway)?;
    let dataset = find_dataset(scraper.as_ref(), &config.dataset)?;
    info!(dataset = %dataset.id, query = %config.query, "fetching observations");
    let mut written = 0_usize;
    for observation in scraper.fetch_data(&dataset, &config.query)? {
        write_json_line(writer, &observation?)?;
        written += 1;
    }
    info!(dataset = %dataset.id, written, "fetch complete");
    Ok(())
}

#[cfg(test)]
pub(crate) fn fetch_config_from_layers_for_test(
    layers: Vec<ortho_config::MergeLayer<'static>>,
) -> Result<FetchConfig, CliError> {
    let merged = FetchArgs::merge_from_layers(layers).map_err(CliError::from)?;
    FetchConfig::try_from(merged)
}
