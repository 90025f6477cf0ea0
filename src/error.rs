use reqwest::StatusCode;
use thiserror::Error;

/// Result type alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced by the typed call API.
///
/// Transient failures are retried internally and only reach the caller once
/// every attempt is exhausted.
#[derive(Debug, Error)]
pub enum Error {
    /// Missing or invalid client configuration, such as an absent environment variable.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The identity endpoint rejected the client credentials.
    #[error("Authentication failed: {0}")]
    Authentication(String),

    /// Network failure, 5xx, or 429 that survived every retry attempt.
    #[error("Transient failure after {attempts} attempts: {message}")]
    Transient { attempts: u32, message: String },

    /// Non-retryable 4xx response.
    #[error("Request rejected ({status}): {body}")]
    ClientHttp { status: StatusCode, body: String },

    /// An `error` object returned in an otherwise successful response body.
    #[error("Service error {code}: {message}")]
    Api { code: String, message: String },

    /// A follow-up page request failed; partial results are discarded.
    #[error("Pagination aborted: {0}")]
    Pagination(#[source] Box<Error>),

    /// Underlying HTTP client error.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Response body could not be parsed as JSON.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Filesystem error while handling the token cache.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
