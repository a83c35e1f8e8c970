//! ID prefix constants and generation.
//!
//! Workspace identifiers are opaque to the engine. Generated ones follow the
//! `{prefix}-{8 hex chars}` shape, e.g. `wsp-a3f8b2c1`.

use crate::errors::CoreError;

/// Prefix for generated workspace identifiers.
pub const PREFIX_WORKSPACE: &str = "wsp";

/// Generate a prefixed random ID, e.g. `wsp-a3f8b2c1`.
///
/// # Errors
///
/// Returns [`CoreError::Other`] if the OS random source is unavailable.
pub fn generate_id(prefix: &str) -> Result<String, CoreError> {
    let mut bytes = [0_u8; 4];
    getrandom::fill(&mut bytes)
        .map_err(|e| CoreError::Other(anyhow::anyhow!("random source unavailable: {e}")))?;
    let hex: String = bytes.iter().map(|b| format!("{b:02x}")).collect();
    Ok(format!("{prefix}-{hex}"))
}

/// Validate a caller-supplied workspace identifier.
///
/// Identifiers are opaque but must be non-empty, at most 128 characters, and
/// limited to ASCII alphanumerics, `-`, `_` and `.`.
///
/// # Errors
///
/// Returns [`CoreError::Validation`] describing the first violated rule.
pub fn validate_workspace_id(id: &str) -> Result<(), CoreError> {
    if id.is_empty() {
        return Err(CoreError::Validation("workspace id is empty".into()));
    }
    if id.len() > 128 {
        return Err(CoreError::Validation(format!(
            "workspace id is {} characters long (max 128)",
            id.len()
        )));
    }
    if let Some(bad) = id
        .chars()
        .find(|c| !(c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.')))
    {
        return Err(CoreError::Validation(format!(
            "workspace id contains invalid character {bad:?}"
        )));
    }
    Ok(())
}
