//! Planning phase: generate the plan (once), then gather sources before
//! replying so the plan and the first sources arrive together.

use quill_core::enums::Phase;

use crate::draft::{Draft, WorkspacePatchBuilder};
use crate::engine::Engine;
use crate::error::EngineError;
use crate::history;
use crate::phases::gather_in_turn;
use crate::plan::PlanGenerator;
use crate::replies::plan_reply;

pub async fn handle(engine: &Engine, draft: &mut Draft) -> Result<String, EngineError> {
    let plan = if let Some(existing) = &draft.state().plan {
        existing.clone()
    } else {
        let ws = draft.state();
        let transcript = history::transcript(&ws.chat_history);
        let plan = PlanGenerator::new(engine.model.clone())
            .generate(ws.topic_str(), &transcript)
            .await;
        tracing::info!(
            workspace = %ws.id,
            subtopics = plan.subtopics.len(),
            keywords = plan.keywords.len(),
            "plan created"
        );
        draft.patch(WorkspacePatchBuilder::new().plan(plan.clone()).build());
        plan
    };
    draft.patch(WorkspacePatchBuilder::new().phase(Phase::Gathering).build());

    let summary = gather_in_turn(engine, draft, true).await?;
    Ok(plan_reply(&plan, summary, draft.state().sources.len()))
}
