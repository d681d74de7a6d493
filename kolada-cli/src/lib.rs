//! Command-line interface for the Kolada statistics adapter.
//!
//! Every subcommand writes one JSON document per line to stdout so the output
//! can be piped into `jq` or loaded line by line.
#![forbid(unsafe_code)]

use std::io::Write;
use std::time::Duration;

use clap::{Parser, Subcommand};
use kolada_core::{Dataset, KoladaScraper, Scraper, ScraperError};
use kolada_data::{HttpGateway, HttpGatewayConfig};
use serde::Serialize;

mod catalog;
mod error;
mod fetch;

pub use error::CliError;

use catalog::{DatasetsArgs, DimensionsArgs, ValuesArgs};
use fetch::FetchArgs;

pub(crate) const ARG_BASE_URL: &str = "base-url";
pub(crate) const ARG_TIMEOUT_SECS: &str = "timeout-secs";
pub(crate) const ARG_DATASET: &str = "dataset";
pub(crate) const ARG_DIMENSION: &str = "dimension";
pub(crate) const ARG_QUERY: &str = "query";
pub(crate) const ENV_DIMENSIONS_DATASET: &str = "KOLADA_CMDS_DIMENSIONS_DATASET";
pub(crate) const ENV_VALUES_DATASET: &str = "KOLADA_CMDS_VALUES_DATASET";
pub(crate) const ENV_VALUES_DIMENSION: &str = "KOLADA_CMDS_VALUES_DIMENSION";
pub(crate) const ENV_FETCH_DATASET: &str = "KOLADA_CMDS_FETCH_DATASET";

/// Run the Kolada CLI with the current process arguments and environment.
///
/// # Errors
///
/// Returns a [`CliError`] when arguments or configuration are invalid, the
/// remote API fails, or output cannot be written.
pub fn run() -> Result<(), CliError> {
    let cli = Cli::try_parse().map_err(CliError::ArgumentParsing)?;
    let builder = HttpScraperBuilder;
    let mut stdout = std::io::stdout().lock();
    dispatch(cli.command, &builder, &mut stdout)
}

fn dispatch(
    command: Command,
    builder: &dyn ScraperBuilder,
    writer: &mut dyn Write,
) -> Result<(), CliError> {
    match command {
        Command::Datasets(args) => catalog::run_datasets_with(args, builder, writer),
        Command::Dimensions(args) => catalog::run_dimensions_with(args, builder, writer),
        Command::Values(args) => catalog::run_values_with(args, builder, writer),
        Command::Fetch(args) => fetch::run_fetch_with(args, builder, writer),
    }
}

#[derive(Debug, Parser)]
#[command(
    name = "kolada",
    about = "Browse and download Kolada municipal statistics",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List every dataset in the catalog.
    Datasets(DatasetsArgs),
    /// List the dimensions of one dataset.
    Dimensions(DimensionsArgs),
    /// List the values a dimension accepts in queries.
    Values(ValuesArgs),
    /// Stream the observations matching a query.
    Fetch(FetchArgs),
}

/// Connection settings shared by every subcommand.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct GatewaySettings {
    /// API root, e.g. `"http://api.kolada.se/v2"`.
    pub(crate) base_url: String,
    /// Per-request timeout.
    pub(crate) timeout: Duration,
}

impl GatewaySettings {
    /// Fill unset options from the gateway defaults.
    pub(crate) fn resolve(base_url: Option<String>, timeout_secs: Option<u64>) -> Self {
        let defaults = HttpGatewayConfig::default();
        Self {
            base_url: base_url.unwrap_or(defaults.base_url),
            timeout: timeout_secs.map_or(defaults.timeout, Duration::from_secs),
        }
    }

    fn gateway_config(&self) -> HttpGatewayConfig {
        HttpGatewayConfig::new(self.base_url.clone()).with_timeout(self.timeout)
    }
}

/// Builds a scraper for the current invocation.
pub(crate) trait ScraperBuilder {
    fn build(&self, settings: &GatewaySettings) -> Result<Box<dyn Scraper>, CliError>;
}

/// Builds scrapers talking to the Kolada HTTP API.
pub(crate) struct HttpScraperBuilder;

impl ScraperBuilder for HttpScraperBuilder {
    fn build(&self, settings: &GatewaySettings) -> Result<Box<dyn Scraper>, CliError> {
        let gateway = HttpGateway::with_config(settings.gateway_config()).map_err(|source| {
            CliError::BuildGateway {
                base_url: settings.base_url.clone(),
                source,
            }
        })?;
        Ok(Box::new(KoladaScraper::new(gateway)))
    }
}

/// Look up `id` in the scraper's dataset catalog.
pub(crate) fn find_dataset(scraper: &dyn Scraper, id: &str) -> Result<Dataset, CliError> {
    scraper
        .list_datasets()?
        .into_iter()
        .find(|dataset| dataset.id == id)
        .ok_or_else(|| {
            CliError::Scraper(ScraperError::UnknownDataset { id: id.to_owned() })
        })
}

/// Write `record` as a single line of JSON.
pub(crate) fn write_json_line<T: Serialize + ?Sized>(
    writer: &mut dyn Write,
    record: &T,
) -> Result<(), CliError> {
    let payload = serde_json::to_string(record).map_err(CliError::Serialize)?;
    writer
        .write_all(payload.as_bytes())
        .map_err(CliError::WriteOutput)?;
    writer.write_all(b"\n").map_err(CliError::WriteOutput)?;
    Ok(())
}

#[cfg(test)]
mod tests;
