//! Fetch error types.

use std::time::Duration;
use thiserror::Error;

// ============================================================================
// Main Fetch Error
// ============================================================================

/// Error type for fetch, walk, and extraction operations.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Network or connection failure.
    #[error("Transport error: {0}")]
    Transport(String),

    /// Request did not complete within the configured timeout.
    #[error("Request to \"{url}\" timed out after {timeout:?}")]
    Timeout {
        /// Request URL.
        url: String,
        /// Timeout that elapsed.
        timeout: Duration,
    },

    /// Upstream answered with a non-200 status.
    #[error("Response from url \"{url}\" has status code {code}, expected 200")]
    UpstreamStatus {
        /// HTTP status code.
        code: u16,
        /// Request URL.
        url: String,
    },

    /// Body was not valid JSON, or was empty where content was expected.
    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    /// A field resolved to a value that cannot be read as a number.
    #[error("Field '{field}' at path '{path}' is not numeric: {value}")]
    MalformedNumericField {
        /// Field name.
        field: String,
        /// Path the field was read from.
        path: String,
        /// The offending JSON value.
        value: String,
    },

    /// The listing kept returning continuation tokens past the page limit.
    #[error("Pagination exceeded the limit of {max_pages} pages")]
    PaginationLimit {
        /// Configured page limit.
        max_pages: usize,
    },

    /// The gather cycle was cancelled.
    #[error("Gather cycle cancelled")]
    Cancelled,

    /// Request could not be built (bad URL, header, or parameter).
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Domain not in the transport's allowlist.
    #[error("Domain not allowed: {0}")]
    DomainNotAllowed(String),
}

impl FetchError {
    /// Returns true if this error, raised while assembling one item, only
    /// concerns that item.
    ///
    /// A malformed numeric field always stays with its item. A malformed
    /// detail body does too when detail fetches run in `parallel`; on a
    /// sequential cycle it aborts. Every other error aborts the cycle.
    pub fn is_item_scoped(&self, parallel: bool) -> bool {
        match self {
            Self::MalformedNumericField { .. } => true,
            Self::MalformedResponse(_) => parallel,
            _ => false,
        }
    }

    /// Returns true if retrying the same request later might succeed.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Transport(_) | Self::Timeout { .. } => true,
            Self::UpstreamStatus { code, .. } => *code >= 500 || *code == 429,
            _ => false,
        }
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_builder() {
            return FetchError::InvalidRequest(err.to_string());
        }
        FetchError::Transport(err.to_string())
    }
}

impl From<url::ParseError> for FetchError {
    fn from(err: url::ParseError) -> Self {
        FetchError::InvalidRequest(format!("invalid URL: {err}"))
    }
}
