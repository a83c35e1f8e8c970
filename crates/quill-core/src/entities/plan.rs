use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A structured research plan. Created once, read-only afterwards.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Plan {
    pub subtopics: Vec<String>,
    pub keywords: Vec<String>,
    pub outline: Vec<String>,
    pub created_at: DateTime<Utc>,
}
