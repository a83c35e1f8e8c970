//! User-visible reply text.

use std::fmt::Write as _;

use quill_core::entities::{PaperRecord, Plan, Workspace};

/// Reply for a turn whose handler failed.
pub const APOLOGY: &str =
    "Sorry, something went wrong while processing your message. Your progress has been saved; please try again.";

/// Reply when the planning sentinel arrives before any topic.
pub const NEED_TOPIC: &str =
    "Tell me what you would like to research first, then I can build a plan.";

/// Outcome of one gathering run, for replies and logs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GatheringSummary {
    pub added: usize,
    pub analyzed: usize,
}

fn numbered(out: &mut String, items: &[String]) {
    for (i, item) in items.iter().enumerate() {
        let _ = writeln!(out, "{}. {item}", i + 1);
    }
}

/// Plan presentation plus the result of the initial gathering run.
#[must_use]
pub fn plan_reply(plan: &Plan, summary: GatheringSummary, source_count: usize) -> String {
    let mut out = String::from("Here is your research plan.\n\nSubtopics:\n");
    numbered(&mut out, &plan.subtopics);
    let _ = writeln!(out, "\nSearch keywords: {}", plan.keywords.join(", "));
    out.push_str("\nOutline:\n");
    numbered(&mut out, &plan.outline);
    out.push('\n');
    out.push_str(&gathering_reply(summary, source_count));
    out
}

#[must_use]
pub fn gathering_reply(summary: GatheringSummary, source_count: usize) -> String {
    if source_count == 0 {
        return "I could not find any papers yet. Ask me to \"find more\" to try again, \
                or ask questions about the topic in the meantime."
            .to_string();
    }
    format!(
        "I found {} new paper(s) and analyzed {}. You now have {source_count} source(s). \
         Say \"show sources\" to list them, \"progress\" for a summary, or ask me anything about them.",
        summary.added, summary.analyzed
    )
}

#[must_use]
pub fn recovery_note(source_count: usize) -> String {
    format!("Your {source_count} source(s) are analyzed and ready.")
}

#[must_use]
pub fn progress_reply(ws: &Workspace) -> String {
    let mut out = format!(
        "Research progress\n\nTopic: {}\nPhase: {}\n",
        ws.topic_str(),
        ws.phase
    );
    let answered = ws.clarifications.answered();
    if !answered.is_empty() {
        out.push_str("\nClarifications:\n");
        for (key, value) in answered {
            let _ = writeln!(out, "- {}: {value}", key.label());
        }
    }
    if let Some(plan) = &ws.plan {
        out.push_str("\nSubtopics:\n");
        numbered(&mut out, &plan.subtopics);
    }
    let analyzed = ws
        .sources
        .iter()
        .filter(|p| ws.paper_insights.contains_key(&p.id))
        .count();
    let _ = write!(
        out,
        "\nSources: {}\nAnalyzed papers: {analyzed}",
        ws.sources.len()
    );
    out
}

/// One numbered entry per source.
#[must_use]
pub fn listing_reply(ws: &Workspace) -> String {
    if ws.sources.is_empty() {
        return "No sources yet. Say \"find more\" to search for papers.".to_string();
    }
    let mut out = format!("Your sources ({}):\n", ws.sources.len());
    for (i, paper) in ws.sources.iter().enumerate() {
        let _ = write!(out, "\n{}. {} ({})", i + 1, paper.title, paper.published_label());
        if let Some(relevance) = ws
            .paper_insights
            .get(&paper.id)
            .map(|insight| insight.relevance_summary.as_str())
            .filter(|s| !s.is_empty())
        {
            let _ = write!(out, "\n   {relevance}");
        }
    }
    out
}

#[must_use]
pub fn more_sources_ack(topic: &str) -> String {
    format!(
        "Searching for more papers on \"{topic}\" in the background. \
         New sources are added and analyzed as they arrive; check back with \"show sources\"."
    )
}

/// Reply to "more sources" while an earlier search for the same workspace runs.
#[must_use]
pub fn more_sources_busy(topic: &str) -> String {
    format!(
        "Still searching for more papers on \"{topic}\" from your last request. \
         Check back with \"show sources\" in a moment."
    )
}

/// Synthetic turn delivered by the refresher.
#[must_use]
pub fn refresher_message(topic: &str, papers: &[PaperRecord]) -> String {
    let mut out = format!("New papers related to \"{topic}\":");
    for paper in papers {
        let _ = write!(out, "\n- {} ({})", paper.title, paper.published_label());
    }
    out
}
