//! Errors raised while assembling [`crate::QuillConfig`].

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    /// A provider (TOML file or `QUILL_*` environment) could not be parsed
    /// into the config shape.
    #[error("failed to load quill config: {0}")]
    Figment(#[from] figment::Error),

    /// A loaded value would leave the research workflow unable to progress.
    #[error("invalid value for '{field}': {reason}")]
    InvalidValue { field: String, reason: String },
}
