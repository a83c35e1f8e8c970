//! In-memory workspace store.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use quill_core::entities::{IndexEntry, Workspace};
use tokio::sync::RwLock;

use crate::{StoreError, WorkspaceStore};

/// A [`WorkspaceStore`] held in process memory. Nothing survives a restart.
#[derive(Default)]
pub struct MemoryStore {
    workspaces: RwLock<HashMap<String, Workspace>>,
    index: RwLock<HashMap<String, IndexEntry>>,
    writes: AtomicUsize,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of workspace writes performed so far.
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl WorkspaceStore for MemoryStore {
    async fn read(&self, id: &str) -> Result<Option<Workspace>, StoreError> {
        Ok(self.workspaces.read().await.get(id).cloned())
    }

    async fn write(&self, workspace: &Workspace) -> Result<(), StoreError> {
        self.workspaces
            .write()
            .await
            .insert(workspace.id.clone(), workspace.clone());
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn upsert_index(&self, entry: &IndexEntry) -> Result<(), StoreError> {
        self.index
            .write()
            .await
            .insert(entry.id.clone(), entry.clone());
        Ok(())
    }

    async fn list_index(&self) -> Result<Vec<IndexEntry>, StoreError> {
        let mut entries: Vec<IndexEntry> = self.index.read().await.values().cloned().collect();
        entries.sort_by(|a, b| b.updated_at.cmp(&a.updated_at).then_with(|| a.id.cmp(&b.id)));
        Ok(entries)
    }
}
