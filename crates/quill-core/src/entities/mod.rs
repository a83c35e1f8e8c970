//! Entity structs for all persisted Quill state.
//!
//! A [`Workspace`] is the unit of persistence: it is stored whole, as one JSON
//! document per workspace id. Nested records (plan, papers, insights, chat
//! turns) are plain data. All structs derive `Serialize`, `Deserialize`, and
//! `JsonSchema` and use `camelCase` field names on the wire.

mod chat;
mod index;
mod paper;
mod plan;
mod workspace;

pub use chat::{ChatTurn, PendingExchange};
pub use index::IndexEntry;
pub use paper::{PaperInsight, PaperRecord};
pub use plan::Plan;
pub use workspace::{Clarifications, Workspace};
