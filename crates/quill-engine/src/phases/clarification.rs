//! Clarification phase: record the topic, collect soft facts, ask one
//! question per turn. Only the planning sentinel leaves this phase.

use quill_core::entities::{ChatTurn, Workspace};
use quill_core::enums::Phase;
use quill_core::responses::PLAN_SENTINEL;

use crate::draft::{Draft, WorkspacePatchBuilder};
use crate::engine::Engine;
use crate::error::EngineError;
use crate::heuristics::extract_facts;
use crate::phases::planning;
use crate::prompts::{CLARIFICATION_MAX_TOKENS, clarification_messages, fallback_question};
use crate::{history, replies};

pub async fn handle(engine: &Engine, draft: &mut Draft, message: &str) -> Result<String, EngineError> {
    if message.trim() == PLAN_SENTINEL {
        if draft.state().topic.is_none() {
            return Ok(replies::NEED_TOPIC.to_string());
        }
        draft.patch(WorkspacePatchBuilder::new().phase(Phase::Planning).build());
        return planning::handle(engine, draft).await;
    }

    let mut patch = WorkspacePatchBuilder::new();
    if draft.state().topic.is_none() {
        patch = patch.topic(message);
    }
    for (key, value) in extract_facts(message) {
        patch = patch.clarification(key, value);
    }
    draft.patch(patch.build());

    let ws = draft.state();
    let mut history_now = ws.chat_history.clone();
    history_now.push(ChatTurn::user(message));
    let transcript = history::transcript(&history_now);
    let asked = history::asked_questions(&ws.chat_history);

    let question = match engine
        .model
        .complete(
            clarification_messages(ws.topic_str(), &transcript, &asked, message),
            CLARIFICATION_MAX_TOKENS,
        )
        .await
    {
        Ok(text) if !text.trim().is_empty() => text.trim().to_string(),
        Ok(_) => {
            tracing::warn!(workspace = %ws.id, "clarification question was blank; using fallback");
            fallback(ws, &asked)
        }
        Err(error) => {
            tracing::warn!(workspace = %ws.id, %error, "clarification question failed; using fallback");
            fallback(ws, &asked)
        }
    };
    Ok(question)
}

/// Fixed question for the first unset clarification whose question has not
/// been asked yet.
fn fallback(ws: &Workspace, asked: &[&str]) -> String {
    let missing = ws
        .clarifications
        .missing()
        .into_iter()
        .find(|key| !asked.contains(&fallback_question(Some(*key))));
    fallback_question(missing).to_string()
}
