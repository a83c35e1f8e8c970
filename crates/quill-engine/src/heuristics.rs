//! Keyword heuristics that pull clarification facts out of free text.
//!
//! Matches are conservative: a fact is reported only when a fixed pattern
//! fires, and callers write it only into keys that are still unset.

use std::sync::LazyLock;

use quill_core::enums::ClarificationKey;
use regex::Regex;

struct Rule {
    pattern: Regex,
    value: &'static str,
}

fn rules(table: &[(&str, &'static str)]) -> Vec<Rule> {
    table
        .iter()
        .map(|(pattern, value)| Rule {
            pattern: Regex::new(pattern).expect("valid regex"),
            value,
        })
        .collect()
}

static LEVEL_RULES: LazyLock<Vec<Rule>> = LazyLock::new(|| {
    rules(&[
        (r"(?i)\bpost-?doc", "postdoctoral"),
        (r"(?i)\b(phd|ph\.d\.?|doctoral|doctorate)\b", "phd"),
        (r"(?i)\b(master'?s|msc|m\.sc\.?|graduate student|grad student)\b", "masters"),
        (r"(?i)\b(undergrad\w*|bachelor'?s?|bsc|b\.sc\.?|college student)\b", "undergraduate"),
        (r"(?i)\bhigh[- ]school\b", "high school"),
        (r"(?i)\b(professor|faculty|lecturer|researcher|scientist)\b", "researcher"),
    ])
});

static PURPOSE_RULES: LazyLock<Vec<Rule>> = LazyLock::new(|| {
    rules(&[
        (r"(?i)\b(thesis|dissertation)\b", "thesis"),
        (r"(?i)\b(literature review|survey|review paper)\b", "literature review"),
        (r"(?i)\b(grant|proposal)\b", "proposal"),
        (r"(?i)\b(paper|publication|conference|journal|manuscript)\b", "paper"),
        (r"(?i)\b(course|class|assignment|homework|project)\b", "course project"),
    ])
});

static FOCUS_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(?:focus(?:ing|ed)?\s+(?:on|in)|interested\s+in|specifically(?:\s+on)?|particularly(?:\s+in)?)\s+([^.?!\n]{3,80})",
    )
    .expect("valid regex")
});

fn first_rule(rules: &[Rule], text: &str) -> Option<&'static str> {
    rules
        .iter()
        .find(|rule| rule.pattern.is_match(text))
        .map(|rule| rule.value)
}

/// Clarification facts found in `text`, in canonical key order.
#[must_use]
pub fn extract_facts(text: &str) -> Vec<(ClarificationKey, String)> {
    let mut facts = Vec::new();
    if let Some(level) = first_rule(&LEVEL_RULES, text) {
        facts.push((ClarificationKey::AcademicLevel, level.to_string()));
    }
    if let Some(purpose) = first_rule(&PURPOSE_RULES, text) {
        facts.push((ClarificationKey::Purpose, purpose.to_string()));
    }
    if let Some(focus) = FOCUS_RE
        .captures(text)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().trim().trim_end_matches(',').trim())
        .filter(|s| !s.is_empty())
    {
        facts.push((ClarificationKey::FocusArea, focus.to_string()));
    }
    facts
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn fact(text: &str, key: ClarificationKey) -> Option<String> {
        extract_facts(text)
            .into_iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v)
    }

    #[rstest]
    #[case("I'm a PhD student in CS", Some("phd"))]
    #[case("second year masters student", Some("masters"))]
    #[case("undergraduate, final year", Some("undergraduate"))]
    #[case("I am a postdoc", Some("postdoctoral"))]
    #[case("assistant professor", Some("researcher"))]
    #[case("graph neural networks for traffic forecasting", None)]
    fn academic_level(#[case] text: &str, #[case] expected: Option<&str>) {
        assert_eq!(
            fact(text, ClarificationKey::AcademicLevel).as_deref(),
            expected
        );
    }

    #[rstest]
    #[case("it's for my thesis", Some("thesis"))]
    #[case("writing a literature review", Some("literature review"))]
    #[case("submitting a conference paper", Some("paper"))]
    #[case("a class project", Some("course project"))]
    #[case("just curious", None)]
    fn purpose(#[case] text: &str, #[case] expected: Option<&str>) {
        assert_eq!(fact(text, ClarificationKey::Purpose).as_deref(), expected);
    }

    #[test]
    fn focus_area_is_captured_up_to_sentence_end() {
        assert_eq!(
            fact(
                "I'm mostly interested in urban traffic prediction. Thanks!",
                ClarificationKey::FocusArea
            )
            .as_deref(),
            Some("urban traffic prediction")
        );
        assert_eq!(
            fact("focusing on spatio-temporal models", ClarificationKey::FocusArea).as_deref(),
            Some("spatio-temporal models")
        );
    }

    #[test]
    fn plain_topic_yields_no_facts() {
        assert!(extract_facts("diffusion models").is_empty());
    }

    #[test]
    fn facts_come_in_canonical_order() {
        let keys: Vec<_> = extract_facts("PhD thesis, focusing on video models")
            .into_iter()
            .map(|(k, _)| k)
            .collect();
        assert_eq!(
            keys,
            vec![
                ClarificationKey::AcademicLevel,
                ClarificationKey::Purpose,
                ClarificationKey::FocusArea
            ]
        );
    }
}
