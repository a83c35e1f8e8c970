//! Cross-cutting error types for Quill.
//!
//! This module defines errors that can originate from any crate in the system.
//! Domain-specific errors (e.g., `StoreError`, `SearchError`) are defined in
//! their respective crates. Errors converge into `anyhow` in `quill-cli`.

use thiserror::Error;

/// Errors that can be raised by any Quill crate.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A caller-supplied value is malformed (workspace id, phase name).
    #[error("validation error: {0}")]
    Validation(String),

    /// Platform failure outside Quill's control (e.g. no random source).
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
