use quill_core::entities::IndexEntry;

use crate::cli::GlobalFlags;
use crate::context::AppContext;
use crate::output::{output, table};
use crate::ui;

fn index_text(entries: &[IndexEntry]) -> String {
    if entries.is_empty() {
        return "(no workspaces)".to_string();
    }
    let rows = entries
        .iter()
        .map(|entry| {
            vec![
                entry.id.clone(),
                entry.phase.to_string(),
                entry.updated_at.format("%Y-%m-%d %H:%M").to_string(),
                entry.topic.clone().unwrap_or_else(|| "-".to_string()),
            ]
        })
        .collect::<Vec<_>>();
    table::render_table(
        &["id", "phase", "updated", "topic"],
        &rows,
        ui::prefs().term_width,
    )
}

pub async fn handle(ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let entries = ctx.engine.store().list_index().await?;
    tracing::debug!(project = %ctx.project_root.display(), count = entries.len(), "listed workspaces");
    output(&entries, flags.format, |entries| index_text(entries))
}
