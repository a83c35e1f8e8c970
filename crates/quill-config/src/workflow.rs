//! Workflow limits.
//!
//! Defaults match the engine's documented behavior: four plan keywords per
//! gathering run, five results per keyword, eight analyses per run, and a
//! ten-turn history window for free-form questions.

use serde::{Deserialize, Serialize};

const fn default_max_keywords() -> usize {
    4
}

const fn default_results_per_keyword() -> usize {
    5
}

const fn default_max_analyses() -> usize {
    8
}

const fn default_history_window() -> usize {
    10
}

const fn default_context_sources() -> usize {
    8
}

const fn default_refresh_results() -> usize {
    10
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct WorkflowConfig {
    /// Plan keywords searched per gathering run.
    #[serde(default = "default_max_keywords")]
    pub max_keywords: usize,

    /// Search results requested per keyword.
    #[serde(default = "default_results_per_keyword")]
    pub results_per_keyword: usize,

    /// Papers analyzed per gathering run.
    #[serde(default = "default_max_analyses")]
    pub max_analyses: usize,

    /// Chat turns included with a free-form question.
    #[serde(default = "default_history_window")]
    pub history_window: usize,

    /// Sources summarized in the free-form question context.
    #[serde(default = "default_context_sources")]
    pub context_sources: usize,

    /// Results requested by topic searches (refresher and keyword exhaustion).
    #[serde(default = "default_refresh_results")]
    pub refresh_results: usize,
}

impl Default for WorkflowConfig {
    fn default() -> Self {
        Self {
            max_keywords: default_max_keywords(),
            results_per_keyword: default_results_per_keyword(),
            max_analyses: default_max_analyses(),
            history_window: default_history_window(),
            context_sources: default_context_sources(),
            refresh_results: default_refresh_results(),
        }
    }
}
