use std::collections::{BTreeMap, HashSet};

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::entities::{ChatTurn, IndexEntry, PaperInsight, PaperRecord, PendingExchange, Plan};
use crate::enums::{ClarificationKey, Phase};

/// Soft facts collected during clarification. Each key is written at most once.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Clarifications {
    pub academic_level: Option<String>,
    pub purpose: Option<String>,
    pub focus_area: Option<String>,
}

impl Clarifications {
    #[must_use]
    pub fn get(&self, key: ClarificationKey) -> Option<&str> {
        match key {
            ClarificationKey::AcademicLevel => self.academic_level.as_deref(),
            ClarificationKey::Purpose => self.purpose.as_deref(),
            ClarificationKey::FocusArea => self.focus_area.as_deref(),
        }
    }

    /// Set `key` to `value` unless it already has a value.
    ///
    /// Returns `true` if the value was written.
    pub fn set_if_absent(&mut self, key: ClarificationKey, value: impl Into<String>) -> bool {
        let slot = match key {
            ClarificationKey::AcademicLevel => &mut self.academic_level,
            ClarificationKey::Purpose => &mut self.purpose,
            ClarificationKey::FocusArea => &mut self.focus_area,
        };
        if slot.is_some() {
            return false;
        }
        *slot = Some(value.into());
        true
    }

    /// Keys that have not been answered yet, in canonical order.
    #[must_use]
    pub fn missing(&self) -> Vec<ClarificationKey> {
        ClarificationKey::ALL
            .into_iter()
            .filter(|key| self.get(*key).is_none())
            .collect()
    }

    /// `(key, value)` pairs for every answered key, in canonical order.
    #[must_use]
    pub fn answered(&self) -> Vec<(ClarificationKey, &str)> {
        ClarificationKey::ALL
            .into_iter()
            .filter_map(|key| self.get(key).map(|value| (key, value)))
            .collect()
    }
}

/// The persisted state of one research session.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Workspace {
    pub id: String,
    /// Set verbatim from the first message, never overwritten.
    pub topic: Option<String>,
    pub phase: Phase,
    #[serde(default)]
    pub clarifications: Clarifications,
    pub plan: Option<Plan>,
    /// Deduplicated by paper id, in first-seen order.
    #[serde(default)]
    pub sources: Vec<PaperRecord>,
    #[serde(default)]
    pub paper_insights: BTreeMap<String, PaperInsight>,
    #[serde(default)]
    pub chat_history: Vec<ChatTurn>,
    pub pending: Option<PendingExchange>,
    /// Plan keywords already used for source searches.
    #[serde(default)]
    pub searched_keywords: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub last_updated: DateTime<Utc>,
}

impl Workspace {
    /// A fresh workspace in the `clarification` phase with empty collections.
    #[must_use]
    pub fn new(id: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self {
            id: id.into(),
            topic: None,
            phase: Phase::Clarification,
            clarifications: Clarifications::default(),
            plan: None,
            sources: Vec::new(),
            paper_insights: BTreeMap::new(),
            chat_history: Vec::new(),
            pending: None,
            searched_keywords: Vec::new(),
            created_at: now,
            last_updated: now,
        }
    }

    #[must_use]
    pub fn topic_str(&self) -> &str {
        self.topic.as_deref().unwrap_or_default()
    }

    #[must_use]
    pub fn has_source(&self, paper_id: &str) -> bool {
        self.sources.iter().any(|p| p.id == paper_id)
    }

    /// Append papers whose id is not already present, preserving order.
    ///
    /// Returns the number of papers added.
    pub fn merge_sources(&mut self, papers: impl IntoIterator<Item = PaperRecord>) -> usize {
        let mut seen: HashSet<String> = self.sources.iter().map(|p| p.id.clone()).collect();
        let before = self.sources.len();
        for paper in papers {
            if seen.insert(paper.id.clone()) {
                self.sources.push(paper);
            }
        }
        self.sources.len() - before
    }

    /// Sources without an insight, in source order, at most `limit` of them.
    #[must_use]
    pub fn unanalyzed_sources(&self, limit: usize) -> Vec<PaperRecord> {
        self.sources
            .iter()
            .filter(|p| !self.paper_insights.contains_key(&p.id))
            .take(limit)
            .cloned()
            .collect()
    }

    /// Whether every source in the first `window` sources has an insight.
    ///
    /// `false` when there are no sources at all.
    #[must_use]
    pub fn analysis_window_complete(&self, window: usize) -> bool {
        !self.sources.is_empty()
            && self
                .sources
                .iter()
                .take(window)
                .all(|p| self.paper_insights.contains_key(&p.id))
    }

    /// The history as it will read once the pending exchange is committed.
    #[must_use]
    pub fn materialized_history(&self) -> Vec<ChatTurn> {
        let mut history = self.chat_history.clone();
        if let Some(pending) = &self.pending {
            history.push(ChatTurn::user(pending.user_msg.clone()));
            history.push(ChatTurn::assistant(pending.assistant_msg.clone()));
        }
        history
    }

    #[must_use]
    pub fn index_entry(&self) -> IndexEntry {
        IndexEntry {
            id: self.id.clone(),
            topic: self.topic.clone(),
            phase: self.phase,
            updated_at: self.last_updated,
        }
    }
}
