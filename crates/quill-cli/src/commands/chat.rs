use quill_core::responses::{PLAN_SENTINEL, TurnRequest, TurnResponse};

use crate::cli::{ChatArgs, GlobalFlags};
use crate::context::AppContext;
use crate::output::output;
use crate::progress::Progress;

/// Build the inbound turn from CLI arguments.
fn turn_request(args: &ChatArgs) -> TurnRequest {
    let message = if args.generate_plan {
        Some(PLAN_SENTINEL.to_string())
    } else {
        args.message.clone()
    };
    TurnRequest {
        workspace_id: args.workspace.clone(),
        message,
    }
}

fn turn_text(response: &TurnResponse) -> String {
    format!(
        "{}\n\n[{} | {} | {} source(s)]",
        response.message, response.workspace_id, response.phase, response.source_count
    )
}

/// Send one turn, print the reply, then wait for any background gathering
/// the turn started.
pub async fn handle(args: &ChatArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let spinner = Progress::spinner("Thinking");
    let response = match ctx.engine.handle_turn(turn_request(args)).await {
        Ok(response) => {
            spinner.finish_clear();
            response
        }
        Err(error) => {
            spinner.finish_err("turn failed");
            return Err(error.into());
        }
    };
    output(&response, flags.format, turn_text)?;

    let spinner = Progress::spinner("Gathering more sources");
    let drained = ctx.engine.drain_background().await;
    spinner.finish_clear();
    if drained > 0 {
        tracing::info!(workspace = %response.workspace_id, continuations = drained, "background gathering finished");
    }
    Ok(())
}
