//! # quill-engine
//!
//! The Quill research workflow: a five-phase state machine driven one chat
//! turn at a time.
//!
//! ```text
//! clarification ──/generate-plan──► planning ──► gathering ──► summarizing ──► ongoing
//! ```
//!
//! Every turn follows the same discipline:
//!
//! - the persisted workspace is loaded once into a [`draft::Draft`];
//! - the exchange staged by the previous turn is committed into history;
//! - the phase handler mutates the draft through patches and produces a reply;
//! - this turn's exchange is staged, and the draft is flushed once.
//!
//! Gathering is the one step that writes durably on its own, checkpointing
//! after dedup and after each analysis so an interrupted run loses nothing
//! already found.
//!
//! Collaborators are traits: [`quill_llm::LanguageModel`],
//! [`quill_arxiv::PaperSearch`], and [`quill_db::WorkspaceStore`].

pub mod analyzer;
pub mod commands;
pub mod context;
pub mod draft;
pub mod error;
pub mod heuristics;
pub mod history;
pub mod json_recovery;
pub mod locks;
pub mod plan;
pub mod prompts;
pub mod replies;

mod engine;
mod gathering;
mod phases;
mod refresher;

pub use engine::Engine;
pub use error::EngineError;
pub use replies::GatheringSummary;
