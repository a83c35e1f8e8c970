//! # quill-llm
//!
//! The language-model seam for Quill: an ordered list of role-tagged
//! messages in, a single text blob out.
//!
//! [`OpenAiClient`] talks to any OpenAI-compatible `/chat/completions`
//! endpoint. Callers in `quill-engine` depend only on the [`LanguageModel`]
//! trait so tests can script replies.

mod error;
mod openai;

pub use error::LlmError;
pub use openai::OpenAiClient;

use async_trait::async_trait;
use quill_core::enums::Role;
use serde::{Deserialize, Serialize};

/// One message sent to the model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// A text-completion service.
#[async_trait]
pub trait LanguageModel: Send + Sync {
    /// Complete `messages`, producing at most `max_tokens` tokens of output.
    ///
    /// # Errors
    ///
    /// Returns [`LlmError`] when the call cannot be made or its reply cannot
    /// be read. Callers are expected to recover with a typed fallback.
    async fn complete(&self, messages: Vec<ChatMessage>, max_tokens: u32)
    -> Result<String, LlmError>;
}
