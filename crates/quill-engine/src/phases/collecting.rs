//! Turns that arrive while a workspace is still `gathering` or
//! `summarizing`, which only happens after an interrupted run.
//!
//! If every source in the analysis window already has an insight the
//! workspace is recovered straight to `ongoing` and the message is handled
//! there. Otherwise the interrupted run is resumed before replying.

use quill_core::enums::Phase;

use crate::draft::{Draft, WorkspacePatchBuilder};
use crate::engine::Engine;
use crate::error::EngineError;
use crate::phases::{gather_in_turn, ongoing};
use crate::replies::{gathering_reply, recovery_note};

pub async fn handle(engine: &Engine, draft: &mut Draft, message: &str) -> Result<String, EngineError> {
    if draft
        .state()
        .analysis_window_complete(engine.workflow.max_analyses)
    {
        tracing::info!(workspace = %draft.state().id, from = %draft.state().phase, "auto-recovering to ongoing");
        draft.patch(WorkspacePatchBuilder::new().phase(Phase::Ongoing).build());
        let note = recovery_note(draft.state().sources.len());
        let answer = ongoing::handle(engine, draft, message).await?;
        return Ok(format!("{note}\n\n{answer}"));
    }

    let search_first = draft.state().sources.is_empty();
    tracing::info!(workspace = %draft.state().id, search_first, "resuming interrupted gathering");
    let summary = gather_in_turn(engine, draft, search_first).await?;
    Ok(gathering_reply(summary, draft.state().sources.len()))
}
