//! Error types for price source adapters.
//!
//! Every failure a single fetch can produce maps onto one [`FetchError`]
//! variant. Adapters never retry; the caller decides what to do with the error.

use thiserror::Error;

/// Errors that can occur while fetching a price from an external provider.
#[derive(Error, Debug)]
pub enum FetchError {
    /// The request never produced an HTTP response (DNS, connect, TLS, timeout, body read).
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The provider answered with a non-success HTTP status.
    #[error("Upstream returned HTTP status {code}")]
    UpstreamStatus {
        /// The HTTP status code
        code: u16,
    },

    /// The body was well-formed but its embedded status code signals a failure.
    #[error("Upstream returned application code {code}")]
    UpstreamApp {
        /// The provider's application-level code
        code: String,
    },

    /// The body did not match the expected structure.
    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    /// The price field was present but not a valid number.
    #[error("Invalid price value: {0}")]
    PriceFormat(String),
}

impl FetchError {
    /// Short, stable label for logs and aggregate reports.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Transport(_) => "transport",
            Self::UpstreamStatus { .. } => "upstream_status",
            Self::UpstreamApp { .. } => "upstream_app",
            Self::MalformedResponse(_) => "malformed_response",
            Self::PriceFormat(_) => "price_format",
        }
    }
}
