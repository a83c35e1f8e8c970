use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use quill_arxiv::ArxivClient;
use quill_config::{QuillConfig, StorageConfig};
use quill_db::QuillDb;
use quill_engine::Engine;
use quill_llm::OpenAiClient;

/// Shared application resources initialized once at startup.
pub struct AppContext {
    pub engine: Engine,
    pub project_root: PathBuf,
}

impl AppContext {
    /// Open the store and wire the engine's collaborators from `config`.
    pub async fn init(project_root: PathBuf, config: &QuillConfig) -> anyhow::Result<Self> {
        let storage = resolve_storage(&project_root, &config.storage);
        let db = QuillDb::open(&storage)
            .await
            .with_context(|| format!("failed to open workspace store at {}", storage.db_path))?;
        tracing::debug!(db_path = %storage.db_path, "workspace store ready");

        let engine = Engine::new(
            Arc::new(OpenAiClient::new(config.llm.clone())),
            Arc::new(ArxivClient::new(&config.search)),
            Arc::new(db),
            config.workflow.clone(),
        );

        Ok(Self {
            engine,
            project_root,
        })
    }
}

/// Relative database paths are taken from the project root, not the cwd.
fn resolve_storage(project_root: &Path, storage: &StorageConfig) -> StorageConfig {
    if storage.is_in_memory() || Path::new(&storage.db_path).is_absolute() {
        return storage.clone();
    }
    StorageConfig {
        db_path: project_root
            .join(&storage.db_path)
            .to_string_lossy()
            .into_owned(),
    }
}
