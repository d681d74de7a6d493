//! Facade crate for the Kolada statistics adapter.
//!
//! This crate re-exports the core domain types and exposes the HTTP gateway
//! behind the `http` feature flag.

#![forbid(unsafe_code)]

pub use kolada_core::{
    AllowedValue, AreaType, Dataset, Dimension, DimensionKind, Gateway, GatewayError,
    KoladaScraper, Observation, ObservationAttributes, ObservationStream, QueryError, Scraper,
    ScraperError,
};

#[cfg(feature = "http")]
pub use kolada_data::{GatewayBuildError, HttpGateway, HttpGatewayConfig};
