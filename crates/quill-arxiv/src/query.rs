//! arXiv `search_query` construction.
//!
//! A multi-word query sent as one phrase matches almost nothing on arXiv, so
//! the free-text query is split into terms, short and stop words are dropped,
//! and the remaining terms are ANDed over the `all:` full-text field.

/// Terms shorter than this are dropped.
const MIN_TERM_LEN: usize = 3;

const STOPWORDS: &[&str] = &[
    "about", "and", "are", "based", "between", "for", "from", "how", "into", "its", "new", "not",
    "on", "over", "such", "than", "that", "the", "their", "these", "this", "towards", "under",
    "using", "via", "what", "when", "which", "with", "within",
];

/// Normalize one whitespace-delimited token: strip surrounding punctuation and
/// any character arXiv's query parser treats as syntax.
fn clean_term(raw: &str) -> String {
    raw.chars()
        .filter(|c| c.is_alphanumeric() || matches!(c, '-' | '.'))
        .collect::<String>()
        .trim_matches(|c| c == '-' || c == '.')
        .to_lowercase()
}

/// Terms that survive the short-word and stopword filters, in query order.
///
/// When every term is filtered out, the cleaned terms are kept as-is so that
/// a query like `"AI in 3D"` still searches something.
#[must_use]
pub fn query_terms(query: &str) -> Vec<String> {
    let cleaned: Vec<String> = query
        .split_whitespace()
        .map(clean_term)
        .filter(|t| !t.is_empty())
        .collect();

    let kept: Vec<String> = cleaned
        .iter()
        .filter(|t| t.chars().count() >= MIN_TERM_LEN && !STOPWORDS.contains(&t.as_str()))
        .cloned()
        .collect();

    if kept.is_empty() { cleaned } else { kept }
}

/// Build the arXiv `search_query` expression, or `None` for a blank query.
///
/// ```
/// use quill_arxiv::query::build_search_query;
///
/// assert_eq!(
///     build_search_query("graph neural networks for traffic").as_deref(),
///     Some("all:graph AND all:neural AND all:networks AND all:traffic"),
/// );
/// ```
#[must_use]
pub fn build_search_query(query: &str) -> Option<String> {
    let terms = query_terms(query);
    if terms.is_empty() {
        return None;
    }
    Some(
        terms
            .iter()
            .map(|t| format!("all:{t}"))
            .collect::<Vec<_>>()
            .join(" AND "),
    )
}
