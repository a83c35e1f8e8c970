//! Engine error types.

use quill_core::errors::CoreError;
use quill_db::StoreError;
use quill_llm::LlmError;
use thiserror::Error;

/// Errors from handling a turn or running a workflow step.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The inbound request is malformed (missing message, bad workspace id).
    /// Rejected before any state is read or written.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// The workspace store failed.
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// A language-model call failed where no typed fallback exists.
    #[error("language model error: {0}")]
    Llm(#[from] LlmError),

    /// A workspace expected to exist was not found in the store.
    #[error("workspace not found: {0}")]
    WorkspaceNotFound(String),

    #[error(transparent)]
    Core(#[from] CoreError),
}
