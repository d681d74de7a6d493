//! HTTP implementation of [`Gateway`] backed by `reqwest`.

use std::future::Future;
use std::time::Duration;

use kolada_core::{
    AreaGroupRecord, AreaRecord, Cursor, DataPage, Dataset, Gateway, GatewayError,
};
use log::debug;
use reqwest::Client;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tokio::runtime::{Handle, Runtime, RuntimeFlavor};
use url::Url;

use super::wire::{DataEntry, Envelope, GroupEntry, KpiEntry, MunicipalityEntry};

/// Default user agent for Kolada requests.
pub const DEFAULT_USER_AGENT: &str = "kolada-engine/0.1";

/// Default Kolada API root.
pub const DEFAULT_BASE_URL: &str = "http://api.kolada.se/v2";

/// Default request timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

const KPI_ENDPOINT: &str = "kpi";
const AREA_ENDPOINT: &str = "municipality";
const AREA_GROUP_ENDPOINT: &str = "municipality_groups";

/// Error type for [`HttpGateway`] construction failures.
#[derive(Debug, Error)]
pub enum GatewayBuildError {
    /// The base URL is not an absolute URL.
    #[error("invalid base URL '{url}': {source}")]
    BaseUrl {
        /// Offending URL.
        url: String,
        /// Parser diagnostic.
        source: url::ParseError,
    },
    /// Failed to build the HTTP client.
    #[error("failed to build HTTP client: {0}")]
    HttpClient(#[source] reqwest::Error),
    /// Failed to build the Tokio runtime.
    #[error("failed to build Tokio runtime: {0}")]
    Runtime(#[source] std::io::Error),
}

/// Configuration for [`HttpGateway`].
#[derive(Debug, Clone)]
pub struct HttpGatewayConfig {
    /// API root, e.g. `"http://api.kolada.se/v2"`.
    pub base_url: String,
    /// Per-request timeout.
    pub timeout: Duration,
    /// User agent string for requests.
    pub user_agent: String,
}

impl Default for HttpGatewayConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_owned(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            user_agent: DEFAULT_USER_AGENT.to_owned(),
        }
    }
}

impl HttpGatewayConfig {
    /// Create a configuration for the given API root.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    /// Set the request timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the user agent string.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }
}

/// Kolada gateway speaking HTTP.
///
/// The [`Gateway`] trait is synchronous. This gateway owns a current-thread
/// Tokio runtime and blocks on it for each request. When called from inside a
/// multi-threaded Tokio runtime it blocks on that runtime's handle through
/// [`tokio::task::block_in_place`] instead, which avoids nested-runtime
/// panics. Inside a `current_thread` runtime it falls back to its own
/// runtime, which can deadlock if the caller's runtime drives IO this request
/// depends on.
///
/// Catalog endpoints are followed through every `next_page` link and returned
/// whole. Data pages are returned one at a time with their continuation.
pub struct HttpGateway {
    client: Client,
    base_url: String,
    timeout: Duration,
    runtime: Runtime,
}

impl std::fmt::Debug for HttpGateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpGateway")
            .field("client", &self.client)
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .field("runtime", &"<tokio::runtime::Runtime>")
            .finish()
    }
}

impl HttpGateway {
    /// Create a gateway for `base_url` with default settings.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is invalid or the HTTP client or Tokio
    /// runtime fails to build.
    pub fn new(base_url: impl Into<String>) -> Result<Self, GatewayBuildError> {
        Self::with_config(HttpGatewayConfig::new(base_url))
    }

    /// Create a gateway with explicit configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is invalid or the HTTP client or Tokio
    /// runtime fails to build.
    pub fn with_config(config: HttpGatewayConfig) -> Result<Self, GatewayBuildError> {
        let base_url = config.base_url.trim_end_matches('/').to_owned();
        Url::parse(&base_url).map_err(|source| GatewayBuildError::BaseUrl {
            url: config.base_url.clone(),
            source,
        })?;
        let client = Client::builder()
            .user_agent(&config.user_agent)
            .connect_timeout(config.timeout)
            .timeout(config.timeout)
            .build()
            .map_err(GatewayBuildError::HttpClient)?;
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(GatewayBuildError::Runtime)?;
        Ok(Self {
            client,
            base_url,
            timeout: config.timeout,
            runtime,
        })
    }

    fn endpoint_url(&self, endpoint: &str) -> String {
        format!("{}/{endpoint}", self.base_url)
    }

    fn block_on<F: Future>(&self, future: F) -> F::Output {
        match Handle::try_current() {
            Ok(handle) if handle.runtime_flavor() == RuntimeFlavor::MultiThread => {
                tokio::task::block_in_place(|| handle.block_on(future))
            }
            _ => self.runtime.block_on(future),
        }
    }

    /// Fetch and decode one envelope.
    async fn get_envelope<T: DeserializeOwned>(
        &self,
        url: &str,
    ) -> Result<Envelope<T>, GatewayError> {
        let body = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|err| self.convert_reqwest_error(&err, url))?
            .error_for_status()
            .map_err(|err| self.convert_reqwest_error(&err, url))?
            .text()
            .await
            .map_err(|err| self.convert_reqwest_error(&err, url))?;
        serde_json::from_str(&body).map_err(|err| GatewayError::Parse {
            url: url.to_owned(),
            message: err.to_string(),
        })
    }

    /// Fetch every page of a catalog endpoint.
    async fn get_catalog<T: DeserializeOwned>(
        &self,
        endpoint: &str,
    ) -> Result<Vec<T>, GatewayError> {
        let mut entries = Vec::new();
        let mut cursor = Cursor::HasNext(self.endpoint_url(endpoint));
        while let Cursor::HasNext(url) = cursor {
            debug!("GET {url}");
            let page: Envelope<T> = self.get_envelope(&url).await?;
            entries.extend(page.values);
            cursor = Cursor::from_next(resolve_next(&url, page.next_page));
        }
        Ok(entries)
    }

    /// Convert a reqwest error to a [`GatewayError`].
    fn convert_reqwest_error(&self, error: &reqwest::Error, url: &str) -> GatewayError {
        if error.is_timeout() {
            return GatewayError::Timeout {
                url: url.to_owned(),
                timeout_secs: self.timeout.as_secs(),
            };
        }

        if let Some(status) = error.status() {
            return GatewayError::Http {
                url: url.to_owned(),
                status: status.as_u16(),
                message: error.to_string(),
            };
        }

        if error.is_decode() {
            return GatewayError::Parse {
                url: url.to_owned(),
                message: error.to_string(),
            };
        }

        GatewayError::Network {
            url: url.to_owned(),
            message: error.to_string(),
        }
    }
}

/// Resolve a `next_page` link against the URL of the page that carried it.
///
/// Relative links are joined onto `current`; links that cannot be resolved
/// end the sequence.
fn resolve_next(current: &str, next: Option<String>) -> Option<String> {
    let link = next?;
    if link.trim().is_empty() || Url::parse(&link).is_ok() {
        return Some(link);
    }
    match Url::parse(current).and_then(|base| base.join(&link)) {
        Ok(resolved) => Some(resolved.into()),
        Err(err) => {
            debug!("ignoring unresolvable next_page {link:?}: {err}");
            None
        }
    }
}

impl Gateway for HttpGateway {
    fn base_url(&self) -> &str {
        &self.base_url
    }

    fn fetch_datasets(&self) -> Result<Vec<Dataset>, GatewayError> {
        let entries: Vec<KpiEntry> = self.block_on(self.get_catalog(KPI_ENDPOINT))?;
        Ok(entries.into_iter().map(KpiEntry::into_dataset).collect())
    }

    fn fetch_areas(&self) -> Result<Vec<AreaRecord>, GatewayError> {
        let entries: Vec<MunicipalityEntry> = self.block_on(self.get_catalog(AREA_ENDPOINT))?;
        Ok(entries.into_iter().map(Into::into).collect())
    }

    fn fetch_area_groups(&self) -> Result<Vec<AreaGroupRecord>, GatewayError> {
        let entries: Vec<GroupEntry> = self.block_on(self.get_catalog(AREA_GROUP_ENDPOINT))?;
        Ok(entries.into_iter().map(Into::into).collect())
    }

    fn fetch_page(&self, url: &str) -> Result<DataPage, GatewayError> {
        let page: Envelope<DataEntry> = self.block_on(self.get_envelope(url))?;
        Ok(DataPage {
            rows: page.values.into_iter().map(Into::into).collect(),
            cursor: Cursor::from_next(resolve_next(url, page.next_page)),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn config_defaults_target_public_api() {
        let config = HttpGatewayConfig::default();
        assert_eq!(config.base_url, "http://api.kolada.se/v2");
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert_eq!(config.user_agent, DEFAULT_USER_AGENT);
    }

    #[rstest]
    fn config_builder_overrides_fields() {
        let config = HttpGatewayConfig::new("http://localhost:8080/v2")
            .with_timeout(Duration::from_secs(5))
            .with_user_agent("tests/1.0");
        assert_eq!(config.base_url, "http://localhost:8080/v2");
        assert_eq!(config.timeout, Duration::from_secs(5));
        assert_eq!(config.user_agent, "tests/1.0");
    }

    #[rstest]
    #[case("http://api.kolada.se/v2")]
    #[case("http://api.kolada.se/v2/")]
    #[case("http://api.kolada.se/v2//")]
    fn base_url_is_trimmed(#[case] base: &str) {
        let gateway = HttpGateway::new(base).expect("gateway should build");
        assert_eq!(gateway.base_url(), "http://api.kolada.se/v2");
        assert_eq!(
            gateway.endpoint_url(AREA_GROUP_ENDPOINT),
            "http://api.kolada.se/v2/municipality_groups"
        );
    }

    #[rstest]
    fn relative_base_url_is_rejected() {
        let err = HttpGateway::new("api.kolada.se/v2").expect_err("relative URL should fail");
        assert!(matches!(err, GatewayBuildError::BaseUrl { .. }));
    }

    #[rstest]
    #[case(None, None)]
    #[case(Some(""), Some(""))]
    #[case(
        Some("http://api.kolada.se/v2/kpi?page=2"),
        Some("http://api.kolada.se/v2/kpi?page=2")
    )]
    #[case(Some("kpi?page=3"), Some("http://api.kolada.se/v2/kpi?page=3"))]
    #[case(Some("/v2/kpi?page=4"), Some("http://api.kolada.se/v2/kpi?page=4"))]
    fn resolves_next_links(#[case] next: Option<&str>, #[case] expected: Option<&str>) {
        let resolved = resolve_next(
            "http://api.kolada.se/v2/kpi?page=1",
            next.map(str::to_owned),
        );
        assert_eq!(resolved.as_deref(), expected);
    }
}
