use std::fmt::Write as _;

use quill_core::responses::RefreshReport;

use crate::cli::GlobalFlags;
use crate::context::AppContext;
use crate::output::output;
use crate::progress::Progress;

fn report_text(report: &RefreshReport) -> String {
    let mut out = format!(
        "Scanned {} workspace(s); {} ongoing with a topic.",
        report.scanned, report.eligible
    );
    if report.notified.is_empty() {
        out.push_str("\nNo new papers.");
    } else {
        let _ = write!(out, "\nNotified: {}", report.notified.join(", "));
    }
    if !report.failed.is_empty() {
        let _ = write!(out, "\nFailed: {}", report.failed.join(", "));
    }
    out
}

/// One refresher pass. Scheduling (e.g. a daily cron entry) is external.
pub async fn handle(ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let spinner = Progress::spinner("Checking for new papers");
    let report = ctx.engine.refresh_all().await;
    spinner.finish_clear();
    let report = report?;
    ctx.engine.drain_background().await;
    output(&report, flags.format, report_text)
}
