//! HTTP gateway to the Kolada v2 API.
//!
//! [`HttpGateway`] implements [`kolada_core::Gateway`] over `reqwest`, so a
//! [`kolada_core::KoladaScraper`] can talk to the live service.
//!
//! # Example
//!
//! ```no_run
//! use std::time::Duration;
//! use kolada_core::{KoladaScraper, Scraper};
//! use kolada_data::gateway::{HttpGateway, HttpGatewayConfig};
//!
//! let config = HttpGatewayConfig::default()
//!     .with_timeout(Duration::from_secs(60))
//!     .with_user_agent("my-app/1.0");
//! let scraper = KoladaScraper::new(HttpGateway::with_config(config)?);
//!
//! let dataset = scraper.dataset("N00945")?;
//! for observation in scraper.fetch_data(&dataset, &serde_json::json!({ "period": 2016 }))? {
//!     println!("{:?}", observation?);
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod http;
mod wire;

pub use http::{
    DEFAULT_BASE_URL, DEFAULT_USER_AGENT, GatewayBuildError, HttpGateway, HttpGatewayConfig,
};
