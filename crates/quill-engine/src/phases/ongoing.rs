//! Ongoing phase: fixed commands first, free-form Q&A otherwise.

use quill_core::entities::Workspace;
use quill_llm::ChatMessage;

use crate::commands::{Command, match_command};
use crate::context::qa_system_prompt;
use crate::draft::Draft;
use crate::engine::Engine;
use crate::error::EngineError;
use crate::history;
use crate::prompts::QA_MAX_TOKENS;
use crate::replies::{listing_reply, more_sources_ack, more_sources_busy, progress_reply};

pub async fn handle(engine: &Engine, draft: &Draft, message: &str) -> Result<String, EngineError> {
    let ws = draft.state();
    match match_command(message) {
        Some(Command::Progress) => Ok(progress_reply(ws)),
        Some(Command::ListSources) => Ok(listing_reply(ws)),
        Some(Command::MoreSources) => {
            if engine.has_background(&ws.id).await {
                return Ok(more_sources_busy(ws.topic_str()));
            }
            let ack = more_sources_ack(ws.topic_str());
            engine.spawn_more_sources(ws.id.clone()).await;
            Ok(ack)
        }
        None => answer(engine, ws, message).await,
    }
}

async fn answer(engine: &Engine, ws: &Workspace, message: &str) -> Result<String, EngineError> {
    let mut messages = vec![ChatMessage::system(qa_system_prompt(
        ws,
        engine.workflow.context_sources,
    ))];
    messages.extend(
        history::recent(&ws.chat_history, engine.workflow.history_window)
            .iter()
            .map(|turn| ChatMessage {
                role: turn.role,
                content: turn.content.clone(),
            }),
    );
    messages.push(ChatMessage::user(message));

    Ok(engine.model.complete(messages, QA_MAX_TOKENS).await?)
}
