//! Data access for the Kolada engine.
//!
//! Responsibilities:
//! - Speak HTTP to the Kolada v2 API.
//! - Decode its JSON envelopes into `kolada-core` records.
//!
//! Boundaries:
//! - Do not encode query or caching rules (live in `kolada-core`).
//! - Keep blocking I/O off async executors; the gateway bridges to async
//!   `reqwest` internally.

#![forbid(unsafe_code)]

pub mod gateway;

pub use gateway::{
    DEFAULT_BASE_URL, DEFAULT_USER_AGENT, GatewayBuildError, HttpGateway, HttpGatewayConfig,
};
