//! Store error types for quill-db.

use thiserror::Error;

/// Errors from workspace store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A stored row held a value that does not parse (timestamp, phase).
    #[error("invalid stored value: {0}")]
    Query(String),

    /// Schema migration failed.
    #[error("schema migration failed: {0}")]
    Migration(String),

    /// Workspace state could not be encoded or decoded.
    #[error("invalid workspace document: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The database file's parent directory could not be created.
    #[error("cannot prepare database path: {0}")]
    Io(#[from] std::io::Error),

    /// Underlying libSQL error.
    #[error("libsql: {0}")]
    LibSql(#[from] libsql::Error),
}
