//! Language-model error types.

use thiserror::Error;

/// Errors from a language-model call.
#[derive(Debug, Error)]
pub enum LlmError {
    /// The endpoint is missing a base URL, API key, or model.
    #[error("language model is not configured (set QUILL_LLM__API_KEY)")]
    NotConfigured,

    /// HTTP transport error (connect failure, timeout, body read).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The endpoint returned a non-success status code.
    #[error("API error ({status}): {message}")]
    Api {
        /// HTTP status code returned by the endpoint.
        status: u16,
        /// Error message extracted from the body, or the raw body.
        message: String,
    },

    /// The response body was not valid JSON.
    #[error("invalid response JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// The response JSON had no choice to read a reply from.
    #[error("response contained no choices")]
    EmptyResponse,
}
