//! Deferred history commit.
//!
//! A turn never appends to `chat_history` directly. It stages its
//! `(user, assistant)` pair as the workspace's pending exchange, and the next
//! turn commits that pair into history before building any context. Readers
//! that need the history "as of now" without a turn use
//! [`Workspace::materialized_history`](quill_core::entities::Workspace::materialized_history).

use quill_core::entities::{ChatTurn, PendingExchange};
use quill_core::enums::Role;
use quill_core::responses::PLAN_SENTINEL;

use crate::draft::{Draft, WorkspacePatchBuilder};

/// One clarification question and the user's answer to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QaPair {
    pub question: String,
    pub answer: String,
}

/// Move the staged exchange into `chat_history`. A no-op when nothing is
/// staged (first turn of a workspace).
///
/// Returns `true` if an exchange was committed.
pub fn commit_pending(draft: &mut Draft) -> bool {
    if draft.state().pending.is_none() {
        return false;
    }
    let history = draft.state().materialized_history();
    draft.patch(
        WorkspacePatchBuilder::new()
            .chat_history(history)
            .pending(None)
            .build(),
    );
    true
}

/// Stage this turn's exchange for commit at the start of the next turn.
pub fn stage_pending(draft: &mut Draft, user_msg: &str, assistant_msg: &str) {
    // Never drop an exchange that is somehow still staged.
    commit_pending(draft);
    draft.patch(
        WorkspacePatchBuilder::new()
            .pending(Some(PendingExchange {
                user_msg: user_msg.to_string(),
                assistant_msg: assistant_msg.to_string(),
            }))
            .build(),
    );
}

/// Question/answer pairs: each assistant turn paired with the user turn that
/// immediately follows it.
///
/// The opening topic message has no preceding question and is skipped, as
/// are planning-sentinel messages.
#[must_use]
pub fn transcript(history: &[ChatTurn]) -> Vec<QaPair> {
    history
        .windows(2)
        .filter_map(|pair| match pair {
            [q, a]
                if q.role == Role::Assistant
                    && a.role == Role::User
                    && a.content.trim() != PLAN_SENTINEL =>
            {
                Some(QaPair {
                    question: q.content.clone(),
                    answer: a.content.clone(),
                })
            }
            _ => None,
        })
        .collect()
}

/// Every assistant message so far, in order.
#[must_use]
pub fn asked_questions(history: &[ChatTurn]) -> Vec<&str> {
    history
        .iter()
        .filter(|turn| turn.role == Role::Assistant)
        .map(|turn| turn.content.as_str())
        .collect()
}

/// The last `window` turns.
#[must_use]
pub fn recent(history: &[ChatTurn], window: usize) -> &[ChatTurn] {
    &history[history.len().saturating_sub(window)..]
}
