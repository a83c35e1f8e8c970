//! Background refresh pass over every indexed workspace.
//!
//! For each workspace in `ongoing`, the topic is searched again and papers
//! not already among its sources are announced through a synthetic turn,
//! processed exactly like a user message. Scheduling the pass is left to the
//! caller.

use quill_core::entities::{IndexEntry, PaperRecord};
use quill_core::enums::Phase;
use quill_core::responses::{RefreshReport, TurnRequest};

use crate::engine::Engine;
use crate::error::EngineError;
use crate::replies::refresher_message;

/// What happened to one workspace during a refresh pass.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Outcome {
    Skipped,
    NothingNew,
    Notified(usize),
}

impl Engine {
    /// Run one refresh pass.
    ///
    /// A failure on one workspace is logged and recorded in the report; the
    /// pass continues with the rest.
    ///
    /// # Errors
    ///
    /// Returns `EngineError::Store` only if the workspace index cannot be
    /// listed.
    pub async fn refresh_all(&self) -> Result<RefreshReport, EngineError> {
        let entries = self.store.list_index().await?;
        let mut report = RefreshReport {
            scanned: entries.len(),
            ..RefreshReport::default()
        };

        for entry in &entries {
            match self.refresh_workspace(entry).await {
                Ok(Outcome::Skipped) => {}
                Ok(Outcome::NothingNew) => report.eligible += 1,
                Ok(Outcome::Notified(count)) => {
                    report.eligible += 1;
                    report.notified.push(entry.id.clone());
                    tracing::info!(workspace = %entry.id, new_papers = count, "refresh delivered new papers");
                }
                Err(error) => {
                    report.eligible += 1;
                    report.failed.push(entry.id.clone());
                    tracing::warn!(workspace = %entry.id, %error, "refresh failed; continuing");
                }
            }
        }
        Ok(report)
    }

    async fn refresh_workspace(&self, entry: &IndexEntry) -> Result<Outcome, EngineError> {
        // The index is only a hint; phase and topic come from the store.
        let Some(ws) = self.store.read(&entry.id).await? else {
            tracing::debug!(workspace = %entry.id, "indexed workspace missing from store");
            return Ok(Outcome::Skipped);
        };
        if ws.phase != Phase::Ongoing || ws.topic_str().trim().is_empty() {
            return Ok(Outcome::Skipped);
        }

        let fresh: Vec<PaperRecord> = self
            .search
            .search(ws.topic_str(), self.workflow.refresh_results)
            .await
            .into_iter()
            .filter(|paper| !ws.has_source(&paper.id))
            .collect();
        if fresh.is_empty() {
            return Ok(Outcome::NothingNew);
        }

        let message = refresher_message(ws.topic_str(), &fresh);
        self.handle_turn(TurnRequest::new(Some(ws.id.clone()), message))
            .await?;
        Ok(Outcome::Notified(fresh.len()))
    }
}
