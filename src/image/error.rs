//! Error definitions for the image responder.

use thiserror::Error;

/// Reasons a proxied fetch can fail.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The decoded target could not be turned into a request.
    #[error("invalid url: {0}")]
    InvalidUrl(String),

    /// The origin did not answer within the per-request timeout.
    #[error("timed out after {0} seconds")]
    Timeout(u64),

    /// The origin answered with a non-success status.
    #[error("upstream returned {0}")]
    Status(reqwest::StatusCode),

    /// Connection, TLS, or protocol failure.
    #[error("transport error: {0}")]
    Transport(String),

    /// The response body could not be read in full.
    #[error("failed to read body: {0}")]
    Body(String),
}

/// Terminal outcomes of a request that produce an error payload.
#[derive(Debug, Error)]
pub enum ProxyError {
    /// No `url` parameter was supplied.
    #[error("Invalid url")]
    MissingUrl,

    /// The target path does not end in an allowed image extension.
    #[error("Invalid extension")]
    InvalidExtension,

    /// The origin fetch failed.
    #[error("Fetch failed: {0}")]
    Fetch(#[from] FetchError),
}

impl ProxyError {
    /// Short label used in logs and metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            ProxyError::MissingUrl => "missing_url",
            ProxyError::InvalidExtension => "invalid_extension",
            ProxyError::Fetch(_) => "fetch_failed",
        }
    }
}
