//! Client error types

use thiserror::Error;

/// Client error type
///
/// Business failures reported by the adapter inside a 200 envelope are not
/// errors at this level; callers read those off the envelope itself.
#[derive(Debug, Error)]
pub enum ClientError {
    /// No token in the store, the request was never built
    #[error("token not set")]
    MissingCredential,

    /// Rejected on `TokenStore::set`
    #[error("token must not be empty")]
    EmptyToken,

    /// Deadline elapsed on the initial attempt and on the single retry
    #[error("request timed out")]
    Timeout,

    /// Adapter rejected the bearer token
    #[error("authentication token rejected")]
    Unauthorized,

    /// Resource not found
    #[error("not found: {0}")]
    NotFound(String),

    /// Request payload rejected by the adapter
    #[error("validation failed: {0}")]
    ValidationFailed(String),

    /// Adapter-side failure
    #[error("server error: HTTP {status}")]
    ServerError { status: u16 },

    /// Network-level failure, the adapter was never reached
    #[error("adapter unreachable: {0}")]
    Unreachable(String),

    /// Body did not decode as an adapter envelope
    #[error("invalid response: {0}")]
    InvalidResponse(String),

    /// Malformed caller input, rejected before the wire
    #[error("invalid input: {0}")]
    InvalidInput(#[from] shared::RequestError),

    /// Transport failure that is neither a timeout nor a connect error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Serialization error
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Token file I/O failure
    #[error("token storage error: {0}")]
    Storage(#[from] std::io::Error),
}

/// Result type for client operations
pub type ClientResult<T> = Result<T, ClientError>;
