//! Error types emitted by the Kolada CLI.
//!
//! Keep this error type reasonably small, as many CLI helpers return
//! `Result<_, CliError>` and the workspace enables `clippy::result_large_err`.

use std::sync::Arc;

use kolada_core::ScraperError;
use kolada_data::GatewayBuildError;
use thiserror::Error;

/// Errors emitted by the Kolada CLI.
#[derive(Debug, Error)]
pub enum CliError {
    /// Provided arguments failed Clap validation.
    #[error(transparent)]
    ArgumentParsing(#[from] clap::Error),
    /// Configuration layering failed (files, env, CLI).
    #[error("failed to load configuration: {0}")]
    Configuration(#[from] Arc<ortho_config::OrthoError>),
    /// A required option is missing after configuration merging.
    #[error("missing {field} (set --{field} or {env})")]
    MissingArgument {
        /// Flag name of the missing option.
        field: &'static str,
        /// Environment variable that can supply it.
        env: &'static str,
    },
    /// The requested dimension is not part of the catalog.
    #[error("unknown dimension '{name}'")]
    UnknownDimension {
        /// Name as given on the command line.
        name: String,
    },
    /// The `--query` option is not valid JSON.
    #[error("failed to parse query JSON: {0}")]
    ParseQuery(#[source] serde_json::Error),
    /// Constructing the HTTP gateway failed.
    #[error("failed to build gateway for {base_url:?}: {source}")]
    BuildGateway {
        /// API root the gateway was configured with.
        base_url: String,
        /// Underlying construction failure.
        #[source]
        source: GatewayBuildError,
    },
    /// The scraper rejected the request or the remote API failed.
    #[error(transparent)]
    Scraper(#[from] ScraperError),
    /// Serializing an output record failed.
    #[error("failed to serialize output record: {0}")]
    Serialize(#[source] serde_json::Error),
    /// Writing to the output stream failed.
    #[error("failed to write output: {0}")]
    WriteOutput(#[source] std::io::Error),
}
