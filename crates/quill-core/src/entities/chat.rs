use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::Role;

/// One committed message in a workspace's conversation.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct ChatTurn {
    pub role: Role,
    pub content: String,
}

impl ChatTurn {
    #[must_use]
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    #[must_use]
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// The (user, assistant) exchange produced by the turn in flight.
///
/// Staged on the workspace at the end of a turn and appended to the history
/// at the start of the next one. Both halves are always present together.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PendingExchange {
    pub user_msg: String,
    pub assistant_msg: String,
}
