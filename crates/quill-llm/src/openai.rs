//! OpenAI-compatible chat-completions client.

use std::time::Duration;

use async_trait::async_trait;
use quill_config::LlmConfig;
use serde_json::{Value, json};

use crate::{ChatMessage, LanguageModel, LlmError};

/// Maximum length of a raw error body carried into [`LlmError::Api`].
const MAX_ERROR_BODY: usize = 512;

/// Client for a `/chat/completions` endpoint.
pub struct OpenAiClient {
    http: reqwest::Client,
    config: LlmConfig,
}

impl OpenAiClient {
    /// Create a client from LLM configuration.
    ///
    /// # Panics
    ///
    /// Panics if the underlying `reqwest::Client` fails to build.
    #[must_use]
    pub fn new(config: LlmConfig) -> Self {
        Self {
            http: reqwest::Client::builder()
                .user_agent("quill/0.1")
                .timeout(Duration::from_secs(config.timeout_secs))
                .build()
                .expect("reqwest client should build"),
            config,
        }
    }

    #[must_use]
    pub fn model(&self) -> &str {
        &self.config.model
    }

    fn request_body(&self, messages: &[ChatMessage], max_tokens: u32) -> Value {
        json!({
            "model": self.config.model,
            "messages": messages,
            "max_tokens": max_tokens,
            "temperature": self.config.temperature,
        })
    }
}

#[async_trait]
impl LanguageModel for OpenAiClient {
    async fn complete(
        &self,
        messages: Vec<ChatMessage>,
        max_tokens: u32,
    ) -> Result<String, LlmError> {
        if !self.config.is_configured() {
            return Err(LlmError::NotConfigured);
        }

        let body = self.request_body(&messages, max_tokens);
        tracing::debug!(
            model = %self.config.model,
            messages = messages.len(),
            max_tokens,
            "sending completion request"
        );

        let resp = self
            .http
            .post(self.config.completions_url())
            .bearer_auth(&self.config.api_key)
            .json(&body)
            .send()
            .await?;

        let status = resp.status();
        let text = resp.text().await?;
        if !status.is_success() {
            return Err(LlmError::Api {
                status: status.as_u16(),
                message: error_message(&text),
            });
        }

        let value: Value = serde_json::from_str(&text)?;
        reply_text(&value)
    }
}

/// Pull the reply out of a completions response.
///
/// `choices[0].message.content` is normally a string. Content-part arrays are
/// joined by their `text` fields, a missing or null content is an empty reply,
/// and any other JSON value is serialized to text.
pub(crate) fn reply_text(response: &Value) -> Result<String, LlmError> {
    let choice = response
        .get("choices")
        .and_then(Value::as_array)
        .and_then(|choices| choices.first())
        .ok_or(LlmError::EmptyResponse)?;

    let content = choice
        .get("message")
        .and_then(|m| m.get("content"))
        .unwrap_or(&Value::Null);

    Ok(match content {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Array(parts) if parts.iter().all(|p| p.get("text").is_some()) => parts
            .iter()
            .filter_map(|p| p.get("text").and_then(Value::as_str))
            .collect::<Vec<_>>()
            .join(""),
        other => other.to_string(),
    })
}

/// Best error message from a failed response body: `error.message` when the
/// body is an OpenAI-style error object, else the body truncated.
fn error_message(body: &str) -> String {
    if let Some(message) = serde_json::from_str::<Value>(body)
        .ok()
        .as_ref()
        .and_then(|v| v.pointer("/error/message"))
        .and_then(Value::as_str)
    {
        return message.to_string();
    }
    if body.len() <= MAX_ERROR_BODY {
        return body.to_string();
    }
    let mut end = MAX_ERROR_BODY;
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...", &body[..end])
}
