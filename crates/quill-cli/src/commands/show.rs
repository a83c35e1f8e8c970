use std::fmt::Write as _;

use anyhow::Context;
use quill_core::entities::Workspace;
use quill_engine::replies::{listing_reply, progress_reply};

use crate::cli::GlobalFlags;
use crate::context::AppContext;
use crate::output::output;

/// The workspace as a reader sees it: any pending exchange is shown as part
/// of the history. Nothing is written back.
fn read_out(mut ws: Workspace) -> Workspace {
    ws.chat_history = ws.materialized_history();
    ws.pending = None;
    ws
}

fn workspace_text(ws: &Workspace) -> String {
    let mut out = format!("Workspace {}\n\n{}\n\n{}", ws.id, progress_reply(ws), listing_reply(ws));
    let _ = write!(out, "\n\nConversation ({} turns):", ws.chat_history.len());
    for turn in &ws.chat_history {
        let _ = write!(out, "\n\n[{}]\n{}", turn.role, turn.content);
    }
    out
}

pub async fn handle(id: &str, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let ws = ctx
        .engine
        .store()
        .read(id)
        .await
        .with_context(|| format!("failed to read workspace '{id}'"))?
        .with_context(|| format!("workspace '{id}' not found"))?;
    output(&read_out(ws), flags.format, workspace_text)
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use pretty_assertions::assert_eq;
    use quill_core::entities::{ChatTurn, PendingExchange, Workspace};

    use super::{read_out, workspace_text};

    #[test]
    fn pending_exchange_is_shown_as_history() {
        let mut ws = Workspace::new("wsp-1", Utc::now());
        ws.topic = Some("diffusion models".into());
        ws.chat_history.push(ChatTurn::user("diffusion models"));
        ws.chat_history.push(ChatTurn::assistant("What is your level?"));
        ws.pending = Some(PendingExchange {
            user_msg: "PhD".into(),
            assistant_msg: "What is it for?".into(),
        });

        let shown = read_out(ws);
        assert!(shown.pending.is_none());
        assert_eq!(shown.chat_history.len(), 4);
        assert_eq!(shown.chat_history[3], ChatTurn::assistant("What is it for?"));

        let text = workspace_text(&shown);
        assert!(text.starts_with("Workspace wsp-1"));
        assert!(text.contains("Conversation (4 turns):"));
        assert!(text.contains("[user]\nPhD"));
    }
}
