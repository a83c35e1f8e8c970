use chrono::NaiveDate;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Normalized representation of one externally discovered paper.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PaperRecord {
    /// Stable paper identifier (e.g. `2401.01234v2`). Deduplication key.
    pub id: String,
    pub title: String,
    pub authors: Vec<String>,
    #[serde(rename = "abstract")]
    pub abstract_text: String,
    pub link: String,
    pub published_date: Option<NaiveDate>,
    pub categories: Vec<String>,
}

impl PaperRecord {
    /// Published date formatted as `YYYY-MM-DD`, or `"n.d."` when unknown.
    #[must_use]
    pub fn published_label(&self) -> String {
        self.published_date
            .map_or_else(|| "n.d.".to_string(), |d| d.format("%Y-%m-%d").to_string())
    }
}

/// Per-paper analysis produced by the paper analyzer.
///
/// A failed analysis is stored with all fields empty so that every analyzed
/// source still has an entry.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PaperInsight {
    pub relevance_summary: String,
    pub key_findings: String,
    pub research_impact: String,
}

impl PaperInsight {
    /// Whether the analysis produced no content at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.relevance_summary.is_empty()
            && self.key_findings.is_empty()
            && self.research_impact.is_empty()
    }
}
