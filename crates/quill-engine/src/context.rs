//! Research-context summaries fed to the model.

use std::fmt::Write as _;

use quill_core::entities::Workspace;

/// Topic, answered clarifications, and plan subtopics as plain lines.
#[must_use]
pub fn research_context(ws: &Workspace) -> String {
    let mut out = format!("Research topic: {}\n", ws.topic_str());
    for (key, value) in ws.clarifications.answered() {
        let _ = writeln!(out, "{}: {value}", key.label());
    }
    if let Some(plan) = &ws.plan
        && !plan.subtopics.is_empty()
    {
        let _ = writeln!(out, "Subtopics: {}", plan.subtopics.join("; "));
    }
    out
}

/// System prompt for open-ended Q&A: the research context plus up to
/// `max_sources` sources with whatever insight exists for each.
#[must_use]
pub fn qa_system_prompt(ws: &Workspace, max_sources: usize) -> String {
    let mut out = String::from(
        "You are a research assistant helping the user with an ongoing literature study. \
         Answer using the context and sources below. Cite sources by their title when you \
         rely on them, and say so plainly when the sources do not cover a question.\n\n",
    );
    out.push_str(&research_context(ws));

    if ws.sources.is_empty() {
        out.push_str("\nNo sources have been collected yet.\n");
        return out;
    }

    let _ = writeln!(
        out,
        "\nSources ({} of {}):",
        ws.sources.len().min(max_sources),
        ws.sources.len()
    );
    for (i, paper) in ws.sources.iter().take(max_sources).enumerate() {
        let _ = writeln!(out, "{}. {} ({})", i + 1, paper.title, paper.published_label());
        if let Some(insight) = ws.paper_insights.get(&paper.id).filter(|s| !s.is_empty()) {
            if !insight.relevance_summary.is_empty() {
                let _ = writeln!(out, "   Relevance: {}", insight.relevance_summary);
            }
            if !insight.key_findings.is_empty() {
                let _ = writeln!(out, "   Key findings: {}", insight.key_findings);
            }
            if !insight.research_impact.is_empty() {
                let _ = writeln!(out, "   Impact: {}", insight.research_impact);
            }
        }
    }
    out
}
