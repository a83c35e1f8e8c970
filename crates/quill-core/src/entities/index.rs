use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::Phase;

/// Side-channel index record used to enumerate workspaces.
///
/// Not authoritative: the full workspace document is the source of truth.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct IndexEntry {
    pub id: String,
    pub topic: Option<String>,
    pub phase: Phase,
    pub updated_at: DateTime<Utc>,
}
