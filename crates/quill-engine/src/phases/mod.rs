//! Phase handlers. Each takes the turn's draft and the user message and
//! returns the reply text.

pub mod clarification;
pub mod collecting;
pub mod ongoing;
pub mod planning;

use crate::draft::Draft;
use crate::engine::Engine;
use crate::error::EngineError;
use crate::gathering::Persist;
use crate::replies::GatheringSummary;

/// Run gathering inside a turn, then bring the draft up to date with what
/// the run persisted.
///
/// On failure the draft adopts the persisted state only if the run got far
/// enough to move the phase forward; otherwise the draft is left as it was.
async fn gather_in_turn(
    engine: &Engine,
    draft: &mut Draft,
    search_first: bool,
) -> Result<GatheringSummary, EngineError> {
    let base = draft.state().clone();
    match engine.gather(base, Persist::Held, search_first).await {
        Ok((_, summary)) => {
            draft.resync(engine.store()).await?;
            Ok(summary)
        }
        Err(error) => {
            if let Ok(Some(latest)) = engine.store().read(&draft.state().id).await
                && latest.phase > draft.state().phase
            {
                draft.resync(engine.store()).await?;
            }
            Err(error)
        }
    }
}
