//! Prompt construction for every language-model call the engine makes.

use std::fmt::Write as _;

use quill_core::entities::PaperRecord;
use quill_core::enums::ClarificationKey;
use quill_llm::ChatMessage;

use crate::history::QaPair;

pub const CLARIFICATION_MAX_TOKENS: u32 = 200;
pub const PLAN_MAX_TOKENS: u32 = 1200;
pub const ANALYSIS_MAX_TOKENS: u32 = 400;
pub const QA_MAX_TOKENS: u32 = 1500;

/// Abstracts longer than this many characters are cut before analysis.
pub const ABSTRACT_CHAR_LIMIT: usize = 1200;

fn write_transcript(out: &mut String, transcript: &[QaPair]) {
    if transcript.is_empty() {
        out.push_str("(no questions answered yet)\n");
        return;
    }
    for pair in transcript {
        let _ = writeln!(out, "Q: {}\nA: {}", pair.question, pair.answer);
    }
}

/// Messages for the next clarifying question.
///
/// `transcript` must already include the answer being given this turn.
#[must_use]
pub fn clarification_messages(
    topic: &str,
    transcript: &[QaPair],
    asked: &[&str],
    user_msg: &str,
) -> Vec<ChatMessage> {
    let mut system = format!(
        "You are helping a user scope a literature research project.\n\
         Research topic: {topic}\n\nConversation so far:\n"
    );
    write_transcript(&mut system, transcript);

    system.push_str("\nQuestions you have already asked (never repeat or rephrase these):\n");
    if asked.is_empty() {
        system.push_str("(none)\n");
    }
    for question in asked {
        let _ = writeln!(system, "- {question}");
    }

    system.push_str(
        "\nRules:\n\
         - Ask exactly ONE short question that narrows the research scope \
         (academic level, purpose, focus area, methods, time range).\n\
         - Reply with the question only: no preamble, no lists, no summary.\n\
         - Never mention research plans or plan generation.\n",
    );

    vec![ChatMessage::system(system), ChatMessage::user(user_msg)]
}

/// Question asked when the model cannot produce one.
#[must_use]
pub const fn fallback_question(missing: Option<ClarificationKey>) -> &'static str {
    match missing {
        Some(ClarificationKey::AcademicLevel) => {
            "What is your academic level (for example undergraduate, master's, PhD, or researcher)?"
        }
        Some(ClarificationKey::Purpose) => {
            "What is this research for: a thesis, a paper, a literature review, or a course project?"
        }
        Some(ClarificationKey::FocusArea) => {
            "Which aspect of the topic do you want to focus on most?"
        }
        None => "Is there a time range, method, or application area you want to prioritize?",
    }
}

/// Messages asking for a research plan as a JSON object.
#[must_use]
pub fn plan_messages(topic: &str, transcript: &[QaPair]) -> Vec<ChatMessage> {
    let mut user = format!("Research topic: {topic}\n\nClarification transcript:\n");
    write_transcript(&mut user, transcript);
    user.push_str(
        "\nCreate a research plan. Respond with ONLY a JSON object with exactly these keys:\n\
         {\"subtopics\": [5-6 strings], \"keywords\": [8-12 short academic search phrases], \
         \"outline\": [6-8 ordered research steps]}\n\
         No Markdown, no commentary.",
    );
    vec![
        ChatMessage::system(
            "You are an expert research planner. You output strict JSON and nothing else.",
        ),
        ChatMessage::user(user),
    ]
}

/// `text` cut to at most `limit` characters, with an ellipsis when cut.
#[must_use]
pub fn truncate_chars(text: &str, limit: usize) -> String {
    match text.char_indices().nth(limit) {
        Some((byte, _)) => format!("{}...", &text[..byte]),
        None => text.to_string(),
    }
}

/// Messages asking for a three-field insight on one paper.
#[must_use]
pub fn analysis_messages(paper: &PaperRecord, context: &str) -> Vec<ChatMessage> {
    let user = format!(
        "{context}\nPaper title: {}\nAbstract: {}\n\n\
         Analyze this paper for the research above. Respond with ONLY a JSON object:\n\
         {{\"relevanceSummary\": \"1-2 sentences\", \"keyFindings\": \"1-2 sentences\", \
         \"researchImpact\": \"1 sentence\"}}",
        paper.title,
        truncate_chars(&paper.abstract_text, ABSTRACT_CHAR_LIMIT),
    );
    vec![
        ChatMessage::system("You are a concise research analyst. You output strict JSON."),
        ChatMessage::user(user),
    ]
}
