//! # quill-config
//!
//! Layered configuration loading for Quill using figment.
//!
//! Configuration sources (in priority order, highest wins):
//! 1. Environment variables (`QUILL_*` prefix, `__` as separator)
//! 2. Project-level `.quill/config.toml`
//! 3. User-level `~/.config/quill/config.toml`
//! 4. Built-in defaults
//!
//! # Environment Variable Mapping
//!
//! Figment maps `QUILL_LLM__API_KEY` -> `llm.api_key`, `QUILL_WORKFLOW__MAX_ANALYSES`
//! -> `workflow.max_analyses`, etc. The `__` (double underscore) separates nested
//! config sections.
//!
//! # Usage
//!
//! ```no_run
//! use quill_config::QuillConfig;
//!
//! // Load from all sources (dotenvy + TOML + env):
//! let config = QuillConfig::load_with_dotenv().expect("config");
//!
//! if config.llm.is_configured() {
//!     println!("Model: {}", config.llm.model);
//! }
//! ```

mod error;
mod llm;
mod search;
mod storage;
mod workflow;

pub use error::ConfigError;
pub use llm::LlmConfig;
pub use search::SearchConfig;
pub use storage::StorageConfig;
pub use workflow::WorkflowConfig;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct QuillConfig {
    #[serde(default)]
    pub llm: LlmConfig,
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub workflow: WorkflowConfig,
}

impl QuillConfig {
    /// Load configuration from all sources (TOML files + environment variables).
    ///
    /// Does NOT call `dotenvy` -- use [`Self::load_with_dotenv`] if you need `.env` file loading.
    ///
    /// Precedence (highest to lowest):
    /// 1. Environment variables (`QUILL_*` prefix)
    /// 2. `.quill/config.toml` (project-local)
    /// 3. `~/.config/quill/config.toml` (user-global)
    /// 4. Default values
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if a provider fails to parse or a limit is invalid.
    pub fn load() -> Result<Self, ConfigError> {
        let config: Self = Self::figment().extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration with `.env` file support.
    ///
    /// Calls `dotenvy` to load the `.env` file from the workspace root before
    /// building the figment. This is the typical entry point for the CLI.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] under the same conditions as [`Self::load`].
    pub fn load_with_dotenv() -> Result<Self, ConfigError> {
        Self::load_dotenv_from_workspace();
        Self::load()
    }

    /// Build the figment provider chain.
    ///
    /// This is public so tests can inspect the figment directly or add
    /// additional providers on top.
    pub fn figment() -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        // Layer 1: User-global config
        if let Some(global_path) = Self::global_config_path() {
            if global_path.exists() {
                figment = figment.merge(Toml::file(global_path));
            }
        }

        // Layer 2: Project-local config
        let local_path = PathBuf::from(".quill/config.toml");
        if local_path.exists() {
            figment = figment.merge(Toml::file(local_path));
        }

        // Layer 3: Environment variables (highest priority)
        figment = figment.merge(Env::prefixed("QUILL_").split("__"));

        figment
    }

    /// Reject limits that would make the workflow unable to progress.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] naming the first zero-valued limit.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let limits = [
            ("workflow.max_keywords", self.workflow.max_keywords),
            ("workflow.results_per_keyword", self.workflow.results_per_keyword),
            ("workflow.max_analyses", self.workflow.max_analyses),
        ];
        if let Some((field, _)) = limits.iter().find(|(_, value)| *value == 0) {
            return Err(ConfigError::InvalidValue {
                field: (*field).to_string(),
                reason: "must be greater than zero".to_string(),
            });
        }
        if self.search.timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "search.timeout_secs".to_string(),
                reason: "must be greater than zero".to_string(),
            });
        }
        Ok(())
    }

    /// Path to the user-global config file.
    fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("quill").join("config.toml"))
    }

    /// Load `.env` from the workspace root.
    ///
    /// Walks up from `CARGO_MANIFEST_DIR` (if available) or current dir looking
    /// for a `.env` file. Silently does nothing if no `.env` is found.
    fn load_dotenv_from_workspace() {
        if let Ok(manifest_dir) = std::env::var("CARGO_MANIFEST_DIR") {
            let mut dir = PathBuf::from(manifest_dir);
            // Walk up at most 3 levels (crate -> crates/ -> workspace root)
            for _ in 0..3 {
                let env_path = dir.join(".env");
                if env_path.exists() {
                    let _ = dotenvy::from_path(&env_path);
                    return;
                }
                if !dir.pop() {
                    break;
                }
            }
        }

        let _ = dotenvy::dotenv();
    }
}
