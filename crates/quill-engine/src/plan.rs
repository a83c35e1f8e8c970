//! Research plan generation.
//!
//! One model call asks for a JSON plan. Output is recovered with
//! [`json_recovery::parse_object`]; when nothing usable comes back, a
//! deterministic plan is built from the topic and transcript alone.

use std::sync::Arc;

use chrono::Utc;
use quill_core::entities::Plan;
use quill_llm::LanguageModel;

use crate::history::QaPair;
use crate::json_recovery::{parse_object, string_list};
use crate::prompts::{PLAN_MAX_TOKENS, plan_messages};

const MIN_FALLBACK_KEYWORDS: usize = 8;
const MAX_KEYWORDS: usize = 12;

const AI_TERMS: &[&str] = &[
    "ai",
    "artificial intelligence",
    "machine learning",
    "deep learning",
    "neural",
    "ml",
    "transformer",
    "llm",
];
const VIDEO_TERMS: &[&str] = &["video", "motion", "temporal", "action recognition"];
const IMAGING_TERMS: &[&str] = &[
    "imaging",
    "image",
    "mri",
    "ct scan",
    "x-ray",
    "radiology",
    "microscopy",
];

pub struct PlanGenerator {
    model: Arc<dyn LanguageModel>,
}

impl PlanGenerator {
    pub fn new(model: Arc<dyn LanguageModel>) -> Self {
        Self { model }
    }

    /// Produce a plan for `topic`. Never fails: any model or parse failure
    /// yields [`fallback_plan`].
    pub async fn generate(&self, topic: &str, transcript: &[QaPair]) -> Plan {
        match self
            .model
            .complete(plan_messages(topic, transcript), PLAN_MAX_TOKENS)
            .await
        {
            Ok(raw) => parse_plan(&raw).unwrap_or_else(|| {
                tracing::warn!(topic, "plan output unusable; using fallback plan");
                fallback_plan(topic, transcript)
            }),
            Err(error) => {
                tracing::warn!(topic, %error, "plan generation failed; using fallback plan");
                fallback_plan(topic, transcript)
            }
        }
    }
}

/// Accept model output only when it is an object whose `subtopics` and
/// `keywords` are both non-empty after dropping falsy entries.
#[must_use]
pub fn parse_plan(raw: &str) -> Option<Plan> {
    let object = parse_object(raw)?;
    let subtopics = string_list(&object, "subtopics");
    let mut keywords = string_list(&object, "keywords");
    if subtopics.is_empty() || keywords.is_empty() {
        return None;
    }
    keywords.truncate(MAX_KEYWORDS);
    Some(Plan {
        subtopics,
        keywords,
        outline: string_list(&object, "outline"),
        created_at: Utc::now(),
    })
}

fn mentions(tokens: &[&str], terms: &[&str]) -> bool {
    terms.iter().any(|term| {
        let parts: Vec<&str> = term.split(' ').collect();
        tokens.windows(parts.len()).any(|w| w == parts.as_slice())
    })
}

fn push_unique(list: &mut Vec<String>, item: String) {
    if !list.iter().any(|existing| existing.eq_ignore_ascii_case(&item)) {
        list.push(item);
    }
}

/// Deterministic plan from the topic and simple keyword checks against the
/// transcript. Never empty and never touches the network.
#[must_use]
pub fn fallback_plan(topic: &str, transcript: &[QaPair]) -> Plan {
    let topic = match topic.trim() {
        "" => "the research topic",
        t => t,
    };
    let corpus = std::iter::once(topic.to_string())
        .chain(transcript.iter().map(|p| p.answer.clone()))
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase();
    let tokens: Vec<&str> = corpus
        .split(|c: char| !c.is_alphanumeric() && c != '-')
        .filter(|w| !w.is_empty())
        .collect();

    let ai = mentions(&tokens, AI_TERMS);
    let video = mentions(&tokens, VIDEO_TERMS);
    let imaging = mentions(&tokens, IMAGING_TERMS);

    let mut subtopics = vec![
        format!("Foundations and key concepts of {topic}"),
        format!("State of the art in {topic}"),
        format!("Methods and techniques used in {topic}"),
        format!("Datasets, benchmarks, and evaluation for {topic}"),
        format!("Open challenges and future directions in {topic}"),
    ];
    if ai {
        subtopics.push(format!("Machine learning models for {topic}"));
    } else if video {
        subtopics.push(format!("Temporal and video analysis in {topic}"));
    } else if imaging {
        subtopics.push(format!("Image analysis approaches in {topic}"));
    }

    let mut keywords = vec![topic.to_string()];
    if ai {
        for k in ["deep learning", "neural networks", "machine learning"] {
            push_unique(&mut keywords, format!("{topic} {k}"));
        }
    }
    if video {
        for k in ["video understanding", "temporal modeling"] {
            push_unique(&mut keywords, k.to_string());
        }
    }
    if imaging {
        for k in ["medical imaging", "image segmentation"] {
            push_unique(&mut keywords, k.to_string());
        }
    }
    for suffix in ["survey", "review", "benchmark", "applications", "methods", "challenges", "evaluation"] {
        if keywords.len() >= MIN_FALLBACK_KEYWORDS {
            break;
        }
        push_unique(&mut keywords, format!("{topic} {suffix}"));
    }
    keywords.truncate(MAX_KEYWORDS);

    let outline = vec![
        format!("Define the scope and research questions for {topic}"),
        "Survey foundational and highly cited work".to_string(),
        "Review recent state-of-the-art methods".to_string(),
        "Compare datasets, benchmarks, and evaluation metrics".to_string(),
        "Identify gaps and open problems".to_string(),
        "Synthesize findings into a structured summary".to_string(),
    ];

    Plan {
        subtopics,
        keywords,
        outline,
        created_at: Utc::now(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[test]
    fn parses_wrapped_plan() {
        let raw = "Sure, here it is:\n```json\n{\"subtopics\": [\"a\", \"\", \"b\"], \
                   \"keywords\": [\"k1\", null, \"k2\"], \"outline\": [\"s1\"]}\n```";
        let plan = parse_plan(raw).unwrap();
        assert_eq!(plan.subtopics, vec!["a", "b"]);
        assert_eq!(plan.keywords, vec!["k1", "k2"]);
        assert_eq!(plan.outline, vec!["s1"]);
    }

    #[rstest]
    #[case::prose("Here is a plan: first read papers, then write.")]
    #[case::empty_keywords(r#"{"subtopics": ["a"], "keywords": ["", null]}"#)]
    #[case::missing_subtopics(r#"{"keywords": ["k"]}"#)]
    #[case::not_object(r#"["a", "b"]"#)]
    fn rejects_unusable_output(#[case] raw: &str) {
        assert!(parse_plan(raw).is_none());
    }

    #[test]
    fn fallback_is_never_empty() {
        for topic in ["", "x", "graph neural networks for traffic forecasting"] {
            let plan = fallback_plan(topic, &[]);
            assert!(plan.subtopics.len() >= 5, "{topic}");
            assert!(plan.keywords.len() >= MIN_FALLBACK_KEYWORDS, "{topic}");
            assert!(plan.keywords.len() <= MAX_KEYWORDS);
            assert!(!plan.outline.is_empty());
        }
    }

    #[test]
    fn fallback_reacts_to_transcript_terms() {
        let transcript = vec![QaPair {
            question: "Focus?".into(),
            answer: "deep learning on MRI scans".into(),
        }];
        let plan = fallback_plan("tumor detection", &transcript);
        assert!(plan.keywords.contains(&"tumor detection deep learning".to_string()));
        assert!(plan.keywords.contains(&"medical imaging".to_string()));
        assert!(plan.subtopics.iter().any(|s| s.starts_with("Machine learning models")));
    }

    #[test]
    fn fallback_is_deterministic() {
        let a = fallback_plan("video retrieval", &[]);
        let b = fallback_plan("video retrieval", &[]);
        assert_eq!(a.subtopics, b.subtopics);
        assert_eq!(a.keywords, b.keywords);
        assert!(a.keywords.contains(&"temporal modeling".to_string()));
    }
}
