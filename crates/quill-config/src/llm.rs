//! Language-model endpoint configuration.

use serde::{Deserialize, Serialize};

fn default_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_model() -> String {
    "gpt-4o-mini".to_string()
}

/// Default request timeout in seconds.
const fn default_timeout_secs() -> u64 {
    60
}

const fn default_temperature() -> f32 {
    0.4
}

/// OpenAI-compatible chat-completions endpoint.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LlmConfig {
    /// API base URL, without the `/chat/completions` suffix.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Bearer token sent as `Authorization: Bearer <api_key>`.
    #[serde(default)]
    pub api_key: String,

    /// Model identifier passed through to the endpoint.
    #[serde(default = "default_model")]
    pub model: String,

    /// Upper bound on a single completion request, in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Sampling temperature.
    #[serde(default = "default_temperature")]
    pub temperature: f32,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            api_key: String::new(),
            model: default_model(),
            timeout_secs: default_timeout_secs(),
            temperature: default_temperature(),
        }
    }
}

impl LlmConfig {
    /// Check if the endpoint has the minimum required fields to be called.
    pub fn is_configured(&self) -> bool {
        !self.base_url.is_empty() && !self.api_key.is_empty() && !self.model.is_empty()
    }

    /// Full URL of the chat-completions endpoint.
    pub fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.base_url.trim_end_matches('/'))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_not_configured() {
        let config = LlmConfig::default();
        assert!(!config.is_configured());
        assert_eq!(config.timeout_secs, 60);
        assert_eq!(config.model, "gpt-4o-mini");
    }

    #[test]
    fn configured_with_api_key() {
        let config = LlmConfig {
            api_key: "sk-test".into(),
            ..LlmConfig::default()
        };
        assert!(config.is_configured());
    }

    #[test]
    fn completions_url_strips_trailing_slash() {
        let config = LlmConfig {
            base_url: "http://localhost:11434/v1/".into(),
            ..LlmConfig::default()
        };
        assert_eq!(
            config.completions_url(),
            "http://localhost:11434/v1/chat/completions"
        );
    }
}
