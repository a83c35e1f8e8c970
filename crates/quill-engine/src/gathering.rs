//! Source gathering and analysis.
//!
//! A run searches, deduplicates, checkpoints, then analyzes unanalyzed
//! sources one at a time with a checkpoint after each, and finally advances
//! to `ongoing`. Checkpoints are durable writes made outside the turn's
//! draft so a crash mid-run keeps whatever was already found and analyzed.
//!
//! Runs are re-entrant: every run starts from the workspace it is handed,
//! skips keywords it already searched, never re-adds a known source, and
//! never re-analyzes a paper that already has an insight.

use chrono::Utc;
use quill_core::entities::{PaperRecord, Workspace};
use quill_core::enums::Phase;

use crate::analyzer::PaperAnalyzer;
use crate::context::research_context;
use crate::engine::Engine;
use crate::error::EngineError;
use crate::replies::GatheringSummary;

/// How a run persists its checkpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Persist {
    /// The caller holds the workspace key lock for the whole run and the run
    /// owns the latest state; each checkpoint writes the run's copy whole.
    Held,
    /// The run executes outside any turn. Each checkpoint takes the key lock,
    /// reads the latest state, merges the run's gathering-owned fields into
    /// it, and writes the result.
    Merge,
}

/// One search to issue: query text and result count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct SearchQuery {
    pub text: String,
    pub max_results: usize,
    pub keyword: Option<String>,
}

/// Move `ws` to `target` if the transition table allows it.
fn advance(ws: &mut Workspace, target: Phase) {
    if ws.phase.can_transition_to(target) {
        ws.phase = target;
    }
}

/// Merge the gathering-owned fields of `run` into `latest`.
fn merge_progress(latest: &mut Workspace, run: &Workspace) {
    latest.merge_sources(run.sources.iter().cloned());
    for (id, insight) in &run.paper_insights {
        latest
            .paper_insights
            .entry(id.clone())
            .or_insert_with(|| insight.clone());
    }
    for keyword in &run.searched_keywords {
        if !latest.searched_keywords.contains(keyword) {
            latest.searched_keywords.push(keyword.clone());
        }
    }
    if run.phase > latest.phase {
        advance(latest, run.phase);
    }
    latest.last_updated = Utc::now();
}

impl Engine {
    /// Searches for the next run: up to `max_keywords` plan keywords not yet
    /// searched, or the topic itself once every keyword has been used.
    pub(crate) fn next_queries(&self, ws: &Workspace) -> Vec<SearchQuery> {
        let fresh: Vec<SearchQuery> = ws
            .plan
            .iter()
            .flat_map(|plan| plan.keywords.iter())
            .filter(|k| !ws.searched_keywords.contains(k))
            .take(self.workflow.max_keywords)
            .map(|k| SearchQuery {
                text: k.clone(),
                max_results: self.workflow.results_per_keyword,
                keyword: Some(k.clone()),
            })
            .collect();
        if !fresh.is_empty() {
            return fresh;
        }
        let topic = ws.topic_str().trim();
        if topic.is_empty() {
            return Vec::new();
        }
        vec![SearchQuery {
            text: topic.to_string(),
            max_results: self.workflow.refresh_results,
            keyword: None,
        }]
    }

    async fn checkpoint(&self, ws: Workspace, persist: Persist) -> Result<Workspace, EngineError> {
        match persist {
            Persist::Held => {
                self.store.write(&ws).await?;
                Ok(ws)
            }
            Persist::Merge => {
                let _guard = self.locks.acquire(&ws.id).await;
                let merged = match self.store.read(&ws.id).await? {
                    Some(mut latest) => {
                        merge_progress(&mut latest, &ws);
                        latest
                    }
                    None => ws,
                };
                self.store.write(&merged).await?;
                Ok(merged)
            }
        }
    }

    /// Run one gathering pass starting from `ws`.
    ///
    /// With `search_first` false the run only analyzes sources already
    /// present (resume after an interruption).
    ///
    /// # Errors
    ///
    /// Returns `EngineError::Store` if a checkpoint write fails. Search and
    /// analysis failures degrade and never abort the run.
    pub(crate) async fn gather(
        &self,
        mut ws: Workspace,
        persist: Persist,
        search_first: bool,
    ) -> Result<(Workspace, GatheringSummary), EngineError> {
        let mut summary = GatheringSummary::default();

        if search_first {
            let queries = self.next_queries(&ws);
            let mut found: Vec<PaperRecord> = Vec::new();
            for query in &queries {
                let results = self.search.search(&query.text, query.max_results).await;
                tracing::debug!(workspace = %ws.id, query = %query.text, results = results.len(), "search complete");
                found.extend(results);
            }
            summary.added = ws.merge_sources(found);
            for keyword in queries.into_iter().filter_map(|q| q.keyword) {
                if !ws.searched_keywords.contains(&keyword) {
                    ws.searched_keywords.push(keyword);
                }
            }
        }

        advance(&mut ws, Phase::Summarizing);
        ws.last_updated = Utc::now();
        ws = self.checkpoint(ws, persist).await?;
        tracing::info!(workspace = %ws.id, added = summary.added, total = ws.sources.len(), "sources persisted");

        let analyzer = PaperAnalyzer::new(self.model.clone());
        let context = research_context(&ws);
        for paper in ws.unanalyzed_sources(self.workflow.max_analyses) {
            let insight = analyzer.analyze(&paper, &context).await;
            ws.paper_insights.insert(paper.id.clone(), insight);
            ws.last_updated = Utc::now();
            ws = self.checkpoint(ws, persist).await?;
            summary.analyzed += 1;
        }

        advance(&mut ws, Phase::Ongoing);
        ws.last_updated = Utc::now();
        ws = self.checkpoint(ws, persist).await?;
        tracing::info!(
            workspace = %ws.id,
            analyzed = summary.analyzed,
            phase = %ws.phase,
            "gathering complete"
        );
        Ok((ws, summary))
    }

    /// Spawn a gathering run for `id` that continues after the current turn.
    ///
    /// The run's first read waits for the workspace key, so it sees the state
    /// flushed by the turn that spawned it.
    pub(crate) async fn spawn_more_sources(&self, id: String) {
        let engine = self.clone();
        let owner = id.clone();
        let handle = tokio::spawn(async move {
            match engine.gather_in_background(&id).await {
                Ok(summary) => tracing::info!(
                    workspace = %id,
                    added = summary.added,
                    analyzed = summary.analyzed,
                    "background gathering complete"
                ),
                Err(error) => {
                    tracing::warn!(workspace = %id, %error, "background gathering failed");
                }
            }
        });
        self.track(owner, handle).await;
    }

    async fn gather_in_background(&self, id: &str) -> Result<GatheringSummary, EngineError> {
        let base = {
            let _guard = self.locks.acquire(id).await;
            self.store
                .read(id)
                .await?
                .ok_or_else(|| EngineError::WorkspaceNotFound(id.to_string()))?
        };
        let (_, summary) = self.gather(base, Persist::Merge, true).await?;
        Ok(summary)
    }
}
