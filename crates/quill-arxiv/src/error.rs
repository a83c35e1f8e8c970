//! Search error types.

use thiserror::Error;

/// Errors that can occur when querying the paper search service.
///
/// These never escape [`crate::PaperSearch::search`]; they are logged and
/// collapsed into an empty result set there.
#[derive(Debug, Error)]
pub enum SearchError {
    /// HTTP transport error (connect failure, timeout, body read).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The service returned a non-success status code.
    #[error("API error ({status}): {message}")]
    Api {
        /// HTTP status code returned by the service.
        status: u16,
        /// Error message or response body.
        message: String,
    },

    /// The service returned a 429 Too Many Requests response.
    #[error("rate limited, retry after {retry_after_secs}s")]
    RateLimited {
        /// Seconds to wait before retrying.
        retry_after_secs: u64,
    },

    /// The feed reported a query error instead of results.
    #[error("feed error: {0}")]
    Feed(String),
}
