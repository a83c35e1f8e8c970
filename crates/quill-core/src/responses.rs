//! Inbound turn request and response types.
//!
//! These structs define the wire shape of one chat turn: what a caller sends
//! to the workflow engine and what it gets back.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::Phase;

/// Exact message that asks the engine to leave clarification and build a plan.
pub const PLAN_SENTINEL: &str = "/generate-plan";

/// One inbound chat turn.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TurnRequest {
    /// Omitted on the first turn; a new workspace id is generated.
    pub workspace_id: Option<String>,
    pub message: Option<String>,
}

impl TurnRequest {
    #[must_use]
    pub fn new(workspace_id: Option<String>, message: impl Into<String>) -> Self {
        Self {
            workspace_id,
            message: Some(message.into()),
        }
    }
}

/// Reply to one chat turn.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TurnResponse {
    pub message: String,
    pub workspace_id: String,
    pub phase: Phase,
    pub source_count: usize,
}

/// Summary of one background refresh pass.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RefreshReport {
    pub scanned: usize,
    pub eligible: usize,
    pub notified: Vec<String>,
    pub failed: Vec<String>,
}
