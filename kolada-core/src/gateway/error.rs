use thiserror::Error;

/// Errors from [`crate::gateway::Gateway`] calls.
///
/// Every variant is fatal for the operation that triggered it. Nothing in
/// this crate retries a failed request.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GatewayError {
    /// The server answered with a non-success status.
    #[error("request to {url} failed with status {status}: {message}")]
    Http {
        /// Fully qualified request URL.
        url: String,
        /// HTTP status code.
        status: u16,
        /// Short error description.
        message: String,
    },
    /// The request could not be delivered.
    #[error("network error contacting {url}: {message}")]
    Network {
        /// Fully qualified request URL.
        url: String,
        /// Transport error description.
        message: String,
    },
    /// The request did not complete within the configured timeout.
    #[error("request to {url} timed out after {timeout_secs}s")]
    Timeout {
        /// Fully qualified request URL.
        url: String,
        /// Configured timeout in seconds.
        timeout_secs: u64,
    },
    /// The response body could not be decoded.
    #[error("failed to parse response from {url}: {message}")]
    Parse {
        /// Fully qualified request URL.
        url: String,
        /// Decoder error description.
        message: String,
    },
}
