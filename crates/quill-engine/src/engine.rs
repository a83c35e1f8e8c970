//! Turn handling.
//!
//! ```text
//! request ─► validate ─► lock key ─► load draft ─► commit pending
//!        ─► dispatch on phase ─► stage pending ─► flush ─► index ─► response
//! ```
//!
//! Handler failures are caught here: the reply becomes an apology, the
//! exchange is still staged, and the draft as of the failure is flushed.

use std::sync::Arc;

use quill_arxiv::PaperSearch;
use quill_config::WorkflowConfig;
use quill_core::enums::Phase;
use quill_core::errors::CoreError;
use quill_core::ids::{PREFIX_WORKSPACE, generate_id, validate_workspace_id};
use quill_core::responses::{TurnRequest, TurnResponse};
use quill_db::WorkspaceStore;
use quill_llm::LanguageModel;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;

use crate::draft::Draft;
use crate::error::EngineError;
use crate::history;
use crate::locks::{KeyGuard, KeyLocks};
use crate::phases;
use crate::replies;

/// Generated ids tried before a first turn gives up.
const ID_ATTEMPTS: usize = 8;

/// The research workflow engine. Cheap to clone; clones share collaborators,
/// key locks, and the set of background continuations.
#[derive(Clone)]
pub struct Engine {
    pub(crate) model: Arc<dyn LanguageModel>,
    pub(crate) search: Arc<dyn PaperSearch>,
    pub(crate) store: Arc<dyn WorkspaceStore>,
    pub(crate) locks: Arc<KeyLocks>,
    pub(crate) workflow: WorkflowConfig,
    background: Arc<Mutex<Vec<(String, JoinHandle<()>)>>>,
}

impl Engine {
    pub fn new(
        model: Arc<dyn LanguageModel>,
        search: Arc<dyn PaperSearch>,
        store: Arc<dyn WorkspaceStore>,
        workflow: WorkflowConfig,
    ) -> Self {
        Self {
            model,
            search,
            store,
            locks: Arc::new(KeyLocks::new()),
            workflow,
            background: Arc::new(Mutex::new(Vec::new())),
        }
    }

    #[must_use]
    pub fn store(&self) -> &dyn WorkspaceStore {
        self.store.as_ref()
    }

    #[must_use]
    pub const fn workflow(&self) -> &WorkflowConfig {
        &self.workflow
    }

    /// Process one inbound chat turn.
    ///
    /// A missing `workspace_id` starts a new workspace under a freshly
    /// generated id that no stored workspace uses; an unknown explicit id
    /// creates the workspace lazily under that id.
    ///
    /// # Errors
    ///
    /// Returns `EngineError::InvalidRequest` for a missing or blank message or
    /// a malformed workspace id (nothing is read or written), and
    /// `EngineError::Store` if loading or the final flush fails, and
    /// `EngineError::Core` if no unused id could be generated. Every other
    /// failure is turned into an apology reply.
    pub async fn handle_turn(&self, request: TurnRequest) -> Result<TurnResponse, EngineError> {
        let message = request
            .message
            .filter(|m| !m.trim().is_empty())
            .ok_or_else(|| EngineError::InvalidRequest("message is required".into()))?;

        if let Some(id) = &request.workspace_id {
            validate_workspace_id(id).map_err(|e| EngineError::InvalidRequest(e.to_string()))?;
        }

        let (_guard, mut draft) = self.open(request.workspace_id).await?;
        let id = draft.state().id.clone();
        history::commit_pending(&mut draft);
        let phase_before = draft.state().phase;

        let reply = match self.dispatch(&mut draft, &message).await {
            Ok(reply) => reply,
            Err(error) => {
                tracing::error!(workspace = %id, phase = %draft.state().phase, %error, "turn handler failed");
                replies::APOLOGY.to_string()
            }
        };

        history::stage_pending(&mut draft, &message, &reply);
        let saved = draft.flush(self.store()).await?;

        if let Err(error) = self.store.upsert_index(&saved.index_entry()).await {
            tracing::warn!(workspace = %id, %error, "workspace index update failed");
        }
        if saved.phase != phase_before {
            tracing::info!(workspace = %id, from = %phase_before, to = %saved.phase, "turn advanced phase");
        }

        Ok(TurnResponse {
            message: reply,
            workspace_id: saved.id,
            phase: saved.phase,
            source_count: saved.sources.len(),
        })
    }

    /// Lock and load the turn's workspace. A generated id is retried until it
    /// names no stored workspace.
    async fn open(&self, requested: Option<String>) -> Result<(KeyGuard, Draft), EngineError> {
        if let Some(id) = requested {
            let guard = self.locks.acquire(&id).await;
            let draft = Draft::load(self.store(), &id).await?;
            return Ok((guard, draft));
        }
        for _ in 0..ID_ATTEMPTS {
            let id = generate_id(PREFIX_WORKSPACE)?;
            let guard = self.locks.acquire(&id).await;
            let draft = Draft::load(self.store(), &id).await?;
            if draft.is_new() {
                return Ok((guard, draft));
            }
            tracing::warn!(workspace = %id, "generated workspace id already in use");
        }
        Err(CoreError::Validation(format!(
            "no unused workspace id after {ID_ATTEMPTS} attempts"
        ))
        .into())
    }

    async fn dispatch(&self, draft: &mut Draft, message: &str) -> Result<String, EngineError> {
        match draft.state().phase {
            Phase::Clarification => phases::clarification::handle(self, draft, message).await,
            Phase::Planning => phases::planning::handle(self, draft).await,
            Phase::Gathering | Phase::Summarizing => {
                phases::collecting::handle(self, draft, message).await
            }
            Phase::Ongoing => phases::ongoing::handle(self, draft, message).await,
        }
    }

    /// Track a spawned background continuation for workspace `id`.
    pub(crate) async fn track(&self, id: String, handle: JoinHandle<()>) {
        let mut handles = self.background.lock().await;
        handles.retain(|(_, h)| !h.is_finished());
        handles.push((id, handle));
    }

    /// Whether a background continuation for `id` is still running.
    pub(crate) async fn has_background(&self, id: &str) -> bool {
        let mut handles = self.background.lock().await;
        handles.retain(|(_, h)| !h.is_finished());
        handles.iter().any(|(owner, _)| owner == id)
    }

    /// Wait for every background continuation spawned so far.
    ///
    /// Returns the number of continuations awaited.
    pub async fn drain_background(&self) -> usize {
        let handles = std::mem::take(&mut *self.background.lock().await);
        let count = handles.len();
        for (_, handle) in handles {
            if let Err(error) = handle.await {
                tracing::error!(%error, "background continuation panicked");
            }
        }
        count
    }
}
