//! Scripted collaborators for engine integration tests.

#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use quill_arxiv::PaperSearch;
use quill_config::WorkflowConfig;
use quill_core::entities::{IndexEntry, PaperRecord, Workspace};
use quill_core::enums::Phase;
use quill_core::responses::{PLAN_SENTINEL, TurnRequest, TurnResponse};
use quill_db::{MemoryStore, StoreError, WorkspaceStore};
use quill_engine::Engine;
use quill_llm::{ChatMessage, LanguageModel, LlmError};

pub const TOPIC: &str = "graph neural networks for traffic forecasting";

pub const PLAN_JSON: &str = r#"Here is the plan:
```json
{"subtopics": ["Graph construction", "Spatial modeling", "Temporal modeling", "Benchmarks", "Open problems"],
 "keywords": ["kw1", "kw2", "kw3", "kw4", "kw5", "kw6", "kw7", "kw8"],
 "outline": ["Scope", "Survey", "Compare", "Gaps", "Synthesize", "Write"]}
```"#;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallKind {
    Clarify,
    Plan,
    Analyze,
    Answer,
}

/// Routes each call by prompt content and returns a canned reply.
pub struct FakeModel {
    pub plan_output: Mutex<String>,
    pub failing: AtomicBool,
    pub calls: Mutex<Vec<CallKind>>,
    questions: AtomicUsize,
}

impl FakeModel {
    pub fn new() -> Self {
        Self {
            plan_output: Mutex::new(PLAN_JSON.to_string()),
            failing: AtomicBool::new(false),
            calls: Mutex::new(Vec::new()),
            questions: AtomicUsize::new(0),
        }
    }

    pub fn with_plan_output(output: &str) -> Self {
        let model = Self::new();
        *model.plan_output.lock().unwrap() = output.to_string();
        model
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn count(&self, kind: CallKind) -> usize {
        self.calls.lock().unwrap().iter().filter(|k| **k == kind).count()
    }

    fn classify(messages: &[ChatMessage]) -> CallKind {
        let all: String = messages.iter().map(|m| m.content.as_str()).collect();
        if all.contains("\"subtopics\"") {
            CallKind::Plan
        } else if all.contains("\"keyFindings\"") {
            CallKind::Analyze
        } else if all.contains("exactly ONE short question") {
            CallKind::Clarify
        } else {
            CallKind::Answer
        }
    }
}

#[async_trait]
impl LanguageModel for FakeModel {
    async fn complete(
        &self,
        messages: Vec<ChatMessage>,
        _max_tokens: u32,
    ) -> Result<String, LlmError> {
        let kind = Self::classify(&messages);
        self.calls.lock().unwrap().push(kind);
        if self.failing.load(Ordering::SeqCst) {
            return Err(LlmError::Api {
                status: 503,
                message: "overloaded".into(),
            });
        }
        Ok(match kind {
            CallKind::Plan => self.plan_output.lock().unwrap().clone(),
            CallKind::Analyze => {
                let title = messages
                    .last()
                    .and_then(|m| m.content.lines().find(|l| l.starts_with("Paper title: ")))
                    .unwrap_or_default()
                    .trim_start_matches("Paper title: ")
                    .to_string();
                format!(
                    r#"{{"relevanceSummary": "Relevant: {title}", "keyFindings": "Finding", "researchImpact": "Impact"}}"#
                )
            }
            CallKind::Clarify => {
                let n = self.questions.fetch_add(1, Ordering::SeqCst) + 1;
                format!("Clarifying question {n}?")
            }
            CallKind::Answer => {
                let last = messages.last().map(|m| m.content.clone()).unwrap_or_default();
                format!("ANSWER: {last}")
            }
        })
    }
}

pub fn paper(id: &str) -> PaperRecord {
    PaperRecord {
        id: id.to_string(),
        title: format!("Title {id}"),
        authors: vec!["A. Author".into()],
        abstract_text: format!("Abstract of {id}."),
        link: format!("http://arxiv.org/abs/{id}"),
        published_date: chrono::NaiveDate::from_ymd_opt(2024, 5, 1),
        categories: vec!["cs.LG".into()],
    }
}

/// Returns fixed results per query and records every query issued.
///
/// Holding `gate` stalls every search until it is released.
#[derive(Default)]
pub struct FakeSearch {
    results: Mutex<HashMap<String, Vec<PaperRecord>>>,
    pub queries: Mutex<Vec<String>>,
    pub gate: tokio::sync::Mutex<()>,
}

impl FakeSearch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, query: &str, ids: &[&str]) {
        self.results
            .lock()
            .unwrap()
            .insert(query.to_string(), ids.iter().map(|id| paper(id)).collect());
    }

    /// Default fixture: overlapping results across the first keywords.
    pub fn scripted() -> Self {
        let search = Self::new();
        search.set("kw1", &["p1", "p2"]);
        search.set("kw2", &["p2", "p3"]);
        search.set("kw3", &["p1", "p4"]);
        search.set("kw5", &["p5"]);
        search.set("kw6", &["p2", "p6"]);
        search
    }

    pub fn queries(&self) -> Vec<String> {
        self.queries.lock().unwrap().clone()
    }
}

#[async_trait]
impl PaperSearch for FakeSearch {
    async fn search(&self, query: &str, max_results: usize) -> Vec<PaperRecord> {
        drop(self.gate.lock().await);
        self.queries.lock().unwrap().push(query.to_string());
        let mut results = self
            .results
            .lock()
            .unwrap()
            .get(query)
            .cloned()
            .unwrap_or_default();
        results.truncate(max_results);
        results
    }
}

/// A store whose reads and writes fail for selected workspace ids.
pub struct FlakyStore {
    pub inner: MemoryStore,
    pub broken: Mutex<HashSet<String>>,
}

impl FlakyStore {
    pub fn new() -> Self {
        Self {
            inner: MemoryStore::new(),
            broken: Mutex::new(HashSet::new()),
        }
    }

    pub fn break_id(&self, id: &str) {
        self.broken.lock().unwrap().insert(id.to_string());
    }

    fn check(&self, id: &str) -> Result<(), StoreError> {
        if self.broken.lock().unwrap().contains(id) {
            return Err(StoreError::Query(format!("disk error for {id}")));
        }
        Ok(())
    }
}

#[async_trait]
impl WorkspaceStore for FlakyStore {
    async fn read(&self, id: &str) -> Result<Option<Workspace>, StoreError> {
        self.check(id)?;
        self.inner.read(id).await
    }

    async fn write(&self, workspace: &Workspace) -> Result<(), StoreError> {
        self.check(&workspace.id)?;
        self.inner.write(workspace).await
    }

    async fn upsert_index(&self, entry: &IndexEntry) -> Result<(), StoreError> {
        self.inner.upsert_index(entry).await
    }

    async fn list_index(&self) -> Result<Vec<IndexEntry>, StoreError> {
        self.inner.list_index().await
    }
}

/// A store where generated ids are already occupied by another session.
///
/// The first `taken` reads of unknown `wsp-` ids find an `ongoing` workspace
/// that belongs to someone else.
pub struct OccupiedStore {
    pub inner: MemoryStore,
    taken: AtomicUsize,
    pub occupied: Mutex<Vec<String>>,
}

impl OccupiedStore {
    pub fn new(taken: usize) -> Self {
        Self {
            inner: MemoryStore::new(),
            taken: AtomicUsize::new(taken),
            occupied: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl WorkspaceStore for OccupiedStore {
    async fn read(&self, id: &str) -> Result<Option<Workspace>, StoreError> {
        if let Some(ws) = self.inner.read(id).await? {
            return Ok(Some(ws));
        }
        let claim = id.starts_with("wsp-")
            && self
                .taken
                .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
                .is_ok();
        if !claim {
            return Ok(None);
        }
        let mut other = Workspace::new(id, chrono::Utc::now());
        other.topic = Some("someone else's topic".into());
        other.phase = Phase::Ongoing;
        self.inner.write(&other).await?;
        self.occupied.lock().unwrap().push(id.to_string());
        Ok(Some(other))
    }

    async fn write(&self, workspace: &Workspace) -> Result<(), StoreError> {
        self.inner.write(workspace).await
    }

    async fn upsert_index(&self, entry: &IndexEntry) -> Result<(), StoreError> {
        self.inner.upsert_index(entry).await
    }

    async fn list_index(&self) -> Result<Vec<IndexEntry>, StoreError> {
        self.inner.list_index().await
    }
}

pub struct Harness {
    pub engine: Engine,
    pub model: Arc<FakeModel>,
    pub search: Arc<FakeSearch>,
    pub store: Arc<MemoryStore>,
}

pub fn harness_with(model: FakeModel, search: FakeSearch) -> Harness {
    let model = Arc::new(model);
    let search = Arc::new(search);
    let store = Arc::new(MemoryStore::new());
    let engine = Engine::new(
        model.clone(),
        search.clone(),
        store.clone(),
        WorkflowConfig::default(),
    );
    Harness {
        engine,
        model,
        search,
        store,
    }
}

pub fn harness() -> Harness {
    harness_with(FakeModel::new(), FakeSearch::scripted())
}

pub async fn turn(engine: &Engine, id: Option<&str>, message: &str) -> TurnResponse {
    engine
        .handle_turn(TurnRequest::new(id.map(str::to_string), message))
        .await
        .unwrap()
}

/// Topic, one answer, then the sentinel. Returns the workspace id.
pub async fn to_ongoing(engine: &Engine) -> String {
    let first = turn(engine, None, TOPIC).await;
    let id = first.workspace_id;
    turn(engine, Some(&id), "I'm a PhD student").await;
    turn(engine, Some(&id), PLAN_SENTINEL).await;
    id
}
