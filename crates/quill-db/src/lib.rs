//! # quill-db
//!
//! Durable state for Quill workspaces.
//!
//! Each workspace is stored whole as one JSON document keyed by its id
//! (`workspaces` table). Writes are full-state, last-write-wins per key.
//! A separate `workspace_index` table maps ids to `{topic, phase}` so the
//! background refresher can enumerate sessions without loading them.
//!
//! [`QuillDb`] is the libSQL implementation; [`MemoryStore`] backs tests and
//! ephemeral runs. Both sit behind the [`WorkspaceStore`] trait.

pub mod error;
pub mod helpers;
mod memory;
mod migrations;

pub use error::StoreError;
pub use memory::MemoryStore;

use std::path::Path;

use async_trait::async_trait;
use libsql::Builder;
use quill_config::StorageConfig;
use quill_core::entities::{IndexEntry, Workspace};

use helpers::{get_opt_string, parse_datetime, parse_enum};

// ── Trait ──────────────────────────────────────────────────────────

/// Keyed full-state workspace persistence plus the workspace index.
#[async_trait]
pub trait WorkspaceStore: Send + Sync {
    /// Read the full state of one workspace.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the read fails or the stored document is invalid.
    async fn read(&self, id: &str) -> Result<Option<Workspace>, StoreError>;

    /// Write the full state of one workspace, replacing any previous state.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the write fails.
    async fn write(&self, workspace: &Workspace) -> Result<(), StoreError>;

    /// Insert or replace one workspace index entry.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the write fails.
    async fn upsert_index(&self, entry: &IndexEntry) -> Result<(), StoreError>;

    /// All index entries, most recently updated first.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the query fails or a row is invalid.
    async fn list_index(&self) -> Result<Vec<IndexEntry>, StoreError>;
}

// ── libSQL ─────────────────────────────────────────────────────────

/// libSQL-backed workspace store.
pub struct QuillDb {
    #[allow(dead_code)]
    db: libsql::Database,
    conn: libsql::Connection,
}

impl QuillDb {
    /// Open a local database at the given path. `":memory:"` opens a
    /// throwaway in-memory database.
    ///
    /// Runs migrations automatically on first open.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the database cannot be opened or
    /// migrations fail.
    pub async fn open_local(path: &str) -> Result<Self, StoreError> {
        let db = Builder::new_local(path).build().await?;
        let conn = db.connect()?;

        conn.execute("PRAGMA busy_timeout = 5000", ())
            .await
            .map_err(|e| StoreError::Migration(format!("PRAGMA busy_timeout: {e}")))?;

        let quill_db = Self { db, conn };
        quill_db.run_migrations().await?;
        Ok(quill_db)
    }

    /// Open the database named by the storage config, creating its parent
    /// directory if needed.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the directory cannot be created or the
    /// database cannot be opened.
    pub async fn open(config: &StorageConfig) -> Result<Self, StoreError> {
        if !config.is_in_memory()
            && let Some(parent) = Path::new(&config.db_path).parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }
        tracing::debug!(path = %config.db_path, "opening workspace store");
        Self::open_local(&config.db_path).await
    }

    /// Access the underlying libSQL connection for direct queries.
    #[must_use]
    pub const fn conn(&self) -> &libsql::Connection {
        &self.conn
    }
}

#[async_trait]
impl WorkspaceStore for QuillDb {
    async fn read(&self, id: &str) -> Result<Option<Workspace>, StoreError> {
        let mut rows = self
            .conn
            .query("SELECT state FROM workspaces WHERE id = ?1", [id])
            .await?;
        let Some(row) = rows.next().await? else {
            return Ok(None);
        };
        let state: String = row.get(0)?;
        Ok(Some(serde_json::from_str(&state)?))
    }

    async fn write(&self, workspace: &Workspace) -> Result<(), StoreError> {
        let state = serde_json::to_string(workspace)?;
        self.conn
            .execute(
                "INSERT INTO workspaces (id, state, created_at, updated_at) VALUES (?1, ?2, ?3, ?4)
                 ON CONFLICT(id) DO UPDATE SET state = excluded.state, updated_at = excluded.updated_at",
                libsql::params![
                    workspace.id.as_str(),
                    state,
                    workspace.created_at.to_rfc3339(),
                    workspace.last_updated.to_rfc3339()
                ],
            )
            .await?;
        tracing::debug!(id = %workspace.id, phase = %workspace.phase, "workspace written");
        Ok(())
    }

    async fn upsert_index(&self, entry: &IndexEntry) -> Result<(), StoreError> {
        self.conn
            .execute(
                "INSERT INTO workspace_index (id, topic, phase, updated_at) VALUES (?1, ?2, ?3, ?4)
                 ON CONFLICT(id) DO UPDATE SET
                    topic = excluded.topic, phase = excluded.phase, updated_at = excluded.updated_at",
                libsql::params![
                    entry.id.as_str(),
                    entry.topic.as_deref(),
                    entry.phase.as_str(),
                    entry.updated_at.to_rfc3339()
                ],
            )
            .await?;
        Ok(())
    }

    async fn list_index(&self) -> Result<Vec<IndexEntry>, StoreError> {
        let mut rows = self
            .conn
            .query(
                "SELECT id, topic, phase, updated_at FROM workspace_index
                 ORDER BY updated_at DESC, id",
                (),
            )
            .await?;
        let mut entries = Vec::new();
        while let Some(row) = rows.next().await? {
            entries.push(IndexEntry {
                id: row.get(0)?,
                topic: get_opt_string(&row, 1)?,
                phase: parse_enum(&row.get::<String>(2)?)?,
                updated_at: parse_datetime(&row.get::<String>(3)?)?,
            });
        }
        Ok(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use pretty_assertions::assert_eq;
    use quill_core::entities::{ChatTurn, PendingExchange};
    use quill_core::enums::Phase;

    async fn test_db() -> QuillDb {
        QuillDb::open_local(":memory:").await.unwrap()
    }

    #[tokio::test]
    async fn open_local_creates_schema() {
        let db = test_db().await;
        for table in ["workspaces", "workspace_index"] {
            let mut rows = db
                .conn()
                .query(
                    "SELECT name FROM sqlite_master WHERE type='table' AND name=?1",
                    [table],
                )
                .await
                .unwrap();
            assert!(rows.next().await.unwrap().is_some(), "table '{table}' should exist");
        }
    }

    #[tokio::test]
    async fn migrations_are_idempotent() {
        let db = test_db().await;
        db.run_migrations().await.unwrap();
    }

    #[tokio::test]
    async fn read_missing_workspace_is_none() {
        let db = test_db().await;
        assert!(db.read("wsp-missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn write_then_read_full_state() {
        let db = test_db().await;
        let mut ws = Workspace::new("wsp-0000abcd", Utc::now());
        ws.topic = Some("graph neural networks".into());
        ws.chat_history.push(ChatTurn::user("graph neural networks"));
        ws.pending = Some(PendingExchange {
            user_msg: "PhD".into(),
            assistant_msg: "What is the purpose?".into(),
        });
        db.write(&ws).await.unwrap();

        let loaded = db.read("wsp-0000abcd").await.unwrap().unwrap();
        assert_eq!(loaded, ws);
    }

    #[tokio::test]
    async fn write_replaces_previous_state() {
        let db = test_db().await;
        let mut ws = Workspace::new("wsp-0000abcd", Utc::now());
        db.write(&ws).await.unwrap();
        ws.phase = Phase::Planning;
        ws.last_updated += Duration::seconds(5);
        db.write(&ws).await.unwrap();

        let loaded = db.read("wsp-0000abcd").await.unwrap().unwrap();
        assert_eq!(loaded.phase, Phase::Planning);

        let mut rows = db
            .conn()
            .query("SELECT COUNT(*) FROM workspaces", ())
            .await
            .unwrap();
        let count: i64 = rows.next().await.unwrap().unwrap().get(0).unwrap();
        assert_eq!(count, 1);
    }

    #[tokio::test]
    async fn corrupt_state_is_an_error() {
        let db = test_db().await;
        db.conn()
            .execute(
                "INSERT INTO workspaces (id, state, created_at, updated_at)
                 VALUES ('wsp-bad', 'not json', datetime('now'), datetime('now'))",
                (),
            )
            .await
            .unwrap();
        assert!(matches!(
            db.read("wsp-bad").await,
            Err(StoreError::Serialization(_))
        ));
    }

    #[tokio::test]
    async fn index_upsert_and_list() {
        let db = test_db().await;
        let now = Utc::now();
        let older = IndexEntry {
            id: "wsp-a".into(),
            topic: Some("transformers".into()),
            phase: Phase::Ongoing,
            updated_at: now - Duration::hours(1),
        };
        let newer = IndexEntry {
            id: "wsp-b".into(),
            topic: None,
            phase: Phase::Clarification,
            updated_at: now,
        };
        db.upsert_index(&older).await.unwrap();
        db.upsert_index(&newer).await.unwrap();

        let listed = db.list_index().await.unwrap();
        let ids: Vec<_> = listed.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["wsp-b", "wsp-a"]);
        assert_eq!(listed[1].topic.as_deref(), Some("transformers"));
        assert_eq!(listed[0].topic, None);

        let moved = IndexEntry {
            phase: Phase::Planning,
            topic: Some("diffusion".into()),
            updated_at: now + Duration::hours(1),
            ..newer
        };
        db.upsert_index(&moved).await.unwrap();
        let listed = db.list_index().await.unwrap();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].phase, Phase::Planning);
        assert_eq!(listed[0].topic.as_deref(), Some("diffusion"));
    }
}
