//! Request-scoped working copy of a workspace.
//!
//! A turn loads the persisted workspace once into a [`Draft`], applies every
//! intended mutation through [`Draft::patch`], and persists with a single
//! [`Draft::flush`], which consumes the draft. Patches compose in order
//! against the same in-memory value, so no mutation made earlier in the turn
//! can be lost to a later one.

use chrono::Utc;
use quill_core::entities::{ChatTurn, PendingExchange, Plan, Workspace};
use quill_core::enums::{ClarificationKey, Phase};
use quill_db::{StoreError, WorkspaceStore};

use crate::error::EngineError;

// ---------------------------------------------------------------------------
// WorkspacePatch
// ---------------------------------------------------------------------------

/// A partial update to a draft. Only `Some` fields are applied.
///
/// Write-once fields (`topic`, `plan`, each clarification) are applied only
/// while unset. `phase` is applied only along an allowed transition.
#[derive(Debug, Clone, Default)]
pub struct WorkspacePatch {
    pub topic: Option<String>,
    pub phase: Option<Phase>,
    pub clarifications: Vec<(ClarificationKey, String)>,
    pub plan: Option<Plan>,
    pub chat_history: Option<Vec<ChatTurn>>,
    pub pending: Option<Option<PendingExchange>>,
}

pub struct WorkspacePatchBuilder(WorkspacePatch);

impl Default for WorkspacePatchBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl WorkspacePatchBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self(WorkspacePatch::default())
    }

    #[must_use]
    pub fn topic(mut self, topic: impl Into<String>) -> Self {
        self.0.topic = Some(topic.into());
        self
    }

    #[must_use]
    pub const fn phase(mut self, phase: Phase) -> Self {
        self.0.phase = Some(phase);
        self
    }

    #[must_use]
    pub fn clarification(mut self, key: ClarificationKey, value: impl Into<String>) -> Self {
        self.0.clarifications.push((key, value.into()));
        self
    }

    #[must_use]
    pub fn plan(mut self, plan: Plan) -> Self {
        self.0.plan = Some(plan);
        self
    }

    #[must_use]
    pub fn chat_history(mut self, history: Vec<ChatTurn>) -> Self {
        self.0.chat_history = Some(history);
        self
    }

    #[must_use]
    pub fn pending(mut self, pending: Option<PendingExchange>) -> Self {
        self.0.pending = Some(pending);
        self
    }

    #[must_use]
    pub fn build(self) -> WorkspacePatch {
        self.0
    }
}

// ---------------------------------------------------------------------------
// Draft
// ---------------------------------------------------------------------------

/// In-memory working copy of one workspace for the current turn.
#[derive(Debug)]
pub struct Draft {
    state: Workspace,
    is_new: bool,
}

impl Draft {
    /// Load the persisted workspace `id`, or start a fresh one if none exists.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the read fails.
    pub async fn load(store: &dyn WorkspaceStore, id: &str) -> Result<Self, StoreError> {
        match store.read(id).await? {
            Some(state) => Ok(Self {
                state,
                is_new: false,
            }),
            None => {
                tracing::debug!(id, "creating workspace");
                Ok(Self {
                    state: Workspace::new(id, Utc::now()),
                    is_new: true,
                })
            }
        }
    }

    #[must_use]
    pub const fn state(&self) -> &Workspace {
        &self.state
    }

    /// Whether this draft started from an empty workspace.
    #[must_use]
    pub const fn is_new(&self) -> bool {
        self.is_new
    }

    /// Merge `patch` into the draft and stamp `last_updated`.
    pub fn patch(&mut self, patch: WorkspacePatch) {
        let ws = &mut self.state;

        if let Some(topic) = patch.topic
            && ws.topic.is_none()
        {
            ws.topic = Some(topic);
        }

        if let Some(next) = patch.phase
            && next != ws.phase
        {
            if ws.phase.can_transition_to(next) {
                tracing::info!(id = %ws.id, from = %ws.phase, to = %next, "phase transition");
                ws.phase = next;
            } else {
                tracing::warn!(id = %ws.id, from = %ws.phase, to = %next, "ignoring disallowed phase transition");
            }
        }

        for (key, value) in patch.clarifications {
            if ws.clarifications.set_if_absent(key, value) {
                tracing::debug!(id = %ws.id, %key, "clarification recorded");
            }
        }

        if let Some(plan) = patch.plan
            && ws.plan.is_none()
        {
            ws.plan = Some(plan);
        }

        if let Some(history) = patch.chat_history {
            ws.chat_history = history;
        }

        if let Some(pending) = patch.pending {
            ws.pending = pending;
        }

        ws.last_updated = Utc::now();
    }

    /// Replace the draft with the latest persisted state.
    ///
    /// Used after a step that writes durably on its own (synchronous
    /// gathering), so the final flush does not re-apply a stale snapshot.
    ///
    /// # Errors
    ///
    /// Returns `EngineError::Store` if the read fails, or
    /// `EngineError::WorkspaceNotFound` if the workspace was never written.
    pub async fn resync(&mut self, store: &dyn WorkspaceStore) -> Result<(), EngineError> {
        let latest = store
            .read(&self.state.id)
            .await?
            .ok_or_else(|| EngineError::WorkspaceNotFound(self.state.id.clone()))?;
        self.state = latest;
        self.is_new = false;
        Ok(())
    }

    /// Persist the draft. This is the turn's one durable write.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the write fails.
    pub async fn flush(self, store: &dyn WorkspaceStore) -> Result<Workspace, StoreError> {
        store.write(&self.state).await?;
        tracing::debug!(id = %self.state.id, phase = %self.state.phase, "draft flushed");
        Ok(self.state)
    }
}
