//! Per-paper analysis.

use std::sync::Arc;

use quill_core::entities::{PaperInsight, PaperRecord};
use quill_llm::LanguageModel;

use crate::json_recovery::{extract_object, text_field};
use crate::prompts::{ANALYSIS_MAX_TOKENS, analysis_messages};

pub struct PaperAnalyzer {
    model: Arc<dyn LanguageModel>,
}

impl PaperAnalyzer {
    pub fn new(model: Arc<dyn LanguageModel>) -> Self {
        Self { model }
    }

    /// Analyze one paper against the research `context`.
    ///
    /// Never fails: a model error or unparseable reply gives an insight with
    /// empty fields, so every analyzed source still gets an entry.
    pub async fn analyze(&self, paper: &PaperRecord, context: &str) -> PaperInsight {
        let raw = match self
            .model
            .complete(analysis_messages(paper, context), ANALYSIS_MAX_TOKENS)
            .await
        {
            Ok(raw) => raw,
            Err(error) => {
                tracing::warn!(paper = %paper.id, %error, "paper analysis failed");
                return PaperInsight::default();
            }
        };

        parse_insight(&raw).unwrap_or_else(|| {
            tracing::warn!(paper = %paper.id, "paper analysis output unparseable");
            PaperInsight::default()
        })
    }
}

/// Read the three insight fields from the first `{...}` span of `raw`.
/// Short key spellings (`relevance`, `findings`, `impact`) are accepted.
#[must_use]
pub fn parse_insight(raw: &str) -> Option<PaperInsight> {
    let object = extract_object(raw)?;
    Some(PaperInsight {
        relevance_summary: text_field(&object, &["relevanceSummary", "relevance"]),
        key_findings: text_field(&object, &["keyFindings", "findings"]),
        research_impact: text_field(&object, &["researchImpact", "impact"]),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use pretty_assertions::assert_eq;
    use quill_llm::{ChatMessage, LlmError};

    struct Reply(Result<&'static str, ()>);

    #[async_trait]
    impl LanguageModel for Reply {
        async fn complete(&self, _: Vec<ChatMessage>, _: u32) -> Result<String, LlmError> {
            self.0
                .map(str::to_string)
                .map_err(|()| LlmError::EmptyResponse)
        }
    }

    fn paper() -> PaperRecord {
        PaperRecord {
            id: "2401.00001".into(),
            title: "A Paper".into(),
            authors: Vec::new(),
            abstract_text: "Abstract.".into(),
            link: String::new(),
            published_date: None,
            categories: Vec::new(),
        }
    }

    #[test]
    fn parses_wrapped_insight() {
        let insight = parse_insight(
            "Analysis: {\"relevanceSummary\": \"Core.\", \"keyFindings\": [\"A\", \"B\"], \"impact\": \"High.\"}",
        )
        .unwrap();
        assert_eq!(
            insight,
            PaperInsight {
                relevance_summary: "Core.".into(),
                key_findings: "A; B".into(),
                research_impact: "High.".into(),
            }
        );
    }

    #[tokio::test]
    async fn model_failure_gives_empty_insight() {
        let analyzer = PaperAnalyzer::new(Arc::new(Reply(Err(()))));
        assert!(analyzer.analyze(&paper(), "ctx").await.is_empty());
    }

    #[tokio::test]
    async fn prose_reply_gives_empty_insight() {
        let analyzer = PaperAnalyzer::new(Arc::new(Reply(Ok("This paper is relevant."))));
        assert!(analyzer.analyze(&paper(), "ctx").await.is_empty());
    }

    #[tokio::test]
    async fn json_reply_is_used() {
        let analyzer = PaperAnalyzer::new(Arc::new(Reply(Ok(
            r#"{"relevanceSummary": "r", "keyFindings": "k", "researchImpact": "i"}"#,
        ))));
        let insight = analyzer.analyze(&paper(), "ctx").await;
        assert_eq!(insight.key_findings, "k");
    }
}
