//! Atom feed scraping for arXiv API responses.
//!
//! The feed is treated as a sequence of `<entry>` blocks and each field is
//! pulled out with simple tag-content matching. No well-formedness is assumed
//! beyond that, so truncated or slightly broken markup still yields whatever
//! complete entries it contains.

use std::sync::LazyLock;

use chrono::NaiveDate;
use quill_core::entities::PaperRecord;
use regex::Regex;

use crate::error::SearchError;

static ENTRY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<entry\b[^>]*>(.*?)</entry>").expect("valid regex"));
static ID_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<id\b[^>]*>(.*?)</id>").expect("valid regex"));
static TITLE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<title\b[^>]*>(.*?)</title>").expect("valid regex"));
static SUMMARY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<summary\b[^>]*>(.*?)</summary>").expect("valid regex"));
static PUBLISHED_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)<published\b[^>]*>(.*?)</published>").expect("valid regex")
});
static AUTHOR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)<author\b[^>]*>.*?<name\b[^>]*>(.*?)</name>.*?</author>")
        .expect("valid regex")
});
static CATEGORY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"<category\b[^>]*?\bterm="([^"]*)""#).expect("valid regex")
});
static LINK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<link\b([^>]*?)/?>").expect("valid regex"));
static HREF_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"\bhref="([^"]*)""#).expect("valid regex"));

/// Decode the fixed set of XML entities arXiv emits in text content.
///
/// `&amp;` is decoded last so `&amp;lt;` becomes `&lt;`, not `<`.
#[must_use]
pub fn decode_entities(text: &str) -> String {
    text.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&apos;", "'")
        .replace("&#39;", "'")
        .replace("&amp;", "&")
}

/// Decode entities and collapse runs of whitespace (titles and abstracts are
/// hard-wrapped in the feed).
fn clean_text(raw: &str) -> String {
    decode_entities(raw)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

fn first_capture(re: &Regex, haystack: &str) -> Option<String> {
    re.captures(haystack)
        .and_then(|c| c.get(1))
        .map(|m| clean_text(m.as_str()))
        .filter(|s| !s.is_empty())
}

/// Stable paper id from an entry `<id>` URL: the part after `/abs/`, or the
/// last path segment for any other URL shape.
fn paper_id_from_url(url: &str) -> String {
    if let Some((_, rest)) = url.split_once("/abs/") {
        return rest.trim_matches('/').to_string();
    }
    url.trim_end_matches('/')
        .rsplit('/')
        .next()
        .unwrap_or(url)
        .to_string()
}

fn alternate_link(entry: &str) -> Option<String> {
    let links: Vec<&str> = LINK_RE
        .captures_iter(entry)
        .filter_map(|c| c.get(1).map(|m| m.as_str()))
        .collect();
    let preferred = links
        .iter()
        .find(|attrs| attrs.contains(r#"rel="alternate""#))
        .or_else(|| links.first())?;
    HREF_RE
        .captures(preferred)
        .and_then(|c| c.get(1))
        .map(|m| decode_entities(m.as_str()))
}

fn parse_published(entry: &str) -> Option<NaiveDate> {
    let raw = first_capture(&PUBLISHED_RE, entry)?;
    let date_part = raw.get(..10)?;
    NaiveDate::parse_from_str(date_part, "%Y-%m-%d").ok()
}

/// Parse one `<entry>` body. Returns `None` when the entry has neither an id
/// nor a title.
fn parse_entry(entry: &str) -> Option<PaperRecord> {
    let id_url = first_capture(&ID_RE, entry);
    let title = first_capture(&TITLE_RE, entry).unwrap_or_default();
    let id = id_url.as_deref().map(paper_id_from_url).unwrap_or_default();

    if id.is_empty() && title.is_empty() {
        return None;
    }

    let link = alternate_link(entry)
        .or_else(|| id_url.clone())
        .unwrap_or_default();
    let id = if id.is_empty() {
        title.to_lowercase()
    } else {
        id
    };

    Some(PaperRecord {
        id,
        title,
        authors: AUTHOR_RE
            .captures_iter(entry)
            .filter_map(|c| c.get(1).map(|m| clean_text(m.as_str())))
            .filter(|name| !name.is_empty())
            .collect(),
        abstract_text: first_capture(&SUMMARY_RE, entry).unwrap_or_default(),
        link,
        published_date: parse_published(entry),
        categories: CATEGORY_RE
            .captures_iter(entry)
            .filter_map(|c| c.get(1).map(|m| decode_entities(m.as_str())))
            .filter(|term| !term.is_empty())
            .collect(),
    })
}

/// Parse an arXiv Atom feed into paper records, in feed order.
///
/// # Errors
///
/// Returns [`SearchError::Feed`] when the feed is arXiv's error feed (a single
/// entry whose id points at `/api/errors`).
pub fn parse_feed(body: &str) -> Result<Vec<PaperRecord>, SearchError> {
    let mut papers = Vec::new();
    for caps in ENTRY_RE.captures_iter(body) {
        let Some(entry) = caps.get(1).map(|m| m.as_str()) else {
            continue;
        };
        if first_capture(&ID_RE, entry).is_some_and(|id| id.contains("/api/errors")) {
            let message = first_capture(&SUMMARY_RE, entry).unwrap_or_else(|| "unknown".into());
            return Err(SearchError::Feed(message));
        }
        if let Some(paper) = parse_entry(entry) {
            papers.push(paper);
        }
    }
    Ok(papers)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const FIXTURE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<feed xmlns="http://www.w3.org/2005/Atom">
  <title type="html">ArXiv Query: search_query=all:graph AND all:traffic</title>
  <id>http://arxiv.org/api/cHxbiOdZaP56ODnBPIenZhzg5f8</id>
  <entry>
    <id>http://arxiv.org/abs/2401.01234v2</id>
    <updated>2024-02-01T10:00:00Z</updated>
    <published>2024-01-03T18:59:59Z</published>
    <title>Spatio-Temporal Graph Networks
      for Traffic &amp; Flow Forecasting</title>
    <summary>  We propose a model that beats &lt;strong&gt; baselines.
    </summary>
    <author>
      <name>Ada Lovelace</name>
    </author>
    <author>
      <name>Alan Turing</name>
      <arxiv:affiliation>Bletchley</arxiv:affiliation>
    </author>
    <link href="http://arxiv.org/abs/2401.01234v2" rel="alternate" type="text/html"/>
    <link title="pdf" href="http://arxiv.org/pdf/2401.01234v2" rel="related" type="application/pdf"/>
    <category term="cs.LG" scheme="http://arxiv.org/schemas/atom"/>
    <category term="cs.AI" scheme="http://arxiv.org/schemas/atom"/>
  </entry>
  <entry>
    <id>http://arxiv.org/abs/cs/0101001v1</id>
    <published>2001-01-01T00:00:00Z</published>
    <title>An Old Paper</title>
    <summary>Short.</summary>
  </entry>
  <entry>
    <summary>No id and no title.</summary>
  </entry>
</feed>"#;

    #[test]
    fn parses_complete_entry() {
        let papers = parse_feed(FIXTURE).unwrap();
        assert_eq!(papers.len(), 2);

        let first = &papers[0];
        assert_eq!(first.id, "2401.01234v2");
        assert_eq!(
            first.title,
            "Spatio-Temporal Graph Networks for Traffic & Flow Forecasting"
        );
        assert_eq!(first.abstract_text, "We propose a model that beats <strong> baselines.");
        assert_eq!(first.authors, vec!["Ada Lovelace", "Alan Turing"]);
        assert_eq!(first.link, "http://arxiv.org/abs/2401.01234v2");
        assert_eq!(first.published_date, NaiveDate::from_ymd_opt(2024, 1, 3));
        assert_eq!(first.categories, vec!["cs.LG", "cs.AI"]);
    }

    #[test]
    fn old_style_ids_and_missing_fields() {
        let papers = parse_feed(FIXTURE).unwrap();
        let old = &papers[1];
        assert_eq!(old.id, "cs/0101001v1");
        assert!(old.authors.is_empty());
        assert!(old.categories.is_empty());
        // Falls back to the id URL when there is no <link>
        assert_eq!(old.link, "http://arxiv.org/abs/cs/0101001v1");
    }

    #[test]
    fn truncated_feed_keeps_complete_entries() {
        let cut = FIXTURE.find("<entry>\n    <id>http://arxiv.org/abs/cs/").unwrap();
        let truncated = format!("{}<entry><id>http://arxiv.org/abs/9999", &FIXTURE[..cut]);
        let papers = parse_feed(&truncated).unwrap();
        assert_eq!(papers.len(), 1);
        assert_eq!(papers[0].id, "2401.01234v2");
    }

    #[test]
    fn empty_feed_yields_no_papers() {
        let papers = parse_feed(r#"<feed xmlns="http://www.w3.org/2005/Atom"></feed>"#).unwrap();
        assert!(papers.is_empty());
        assert!(parse_feed("not xml at all").unwrap().is_empty());
    }

    #[test]
    fn error_feed_is_reported() {
        let body = r#"<feed><entry>
            <id>http://arxiv.org/api/errors#incorrect_id_format_for_1234</id>
            <title>Error</title>
            <summary>incorrect id format for 1234</summary>
        </entry></feed>"#;
        let err = parse_feed(body).unwrap_err();
        assert!(matches!(err, SearchError::Feed(ref m) if m == "incorrect id format for 1234"));
    }

    #[test]
    fn entry_without_id_uses_title() {
        let body = "<feed><entry><title>Untitled Work</title></entry></feed>";
        let papers = parse_feed(body).unwrap();
        assert_eq!(papers.len(), 1);
        assert_eq!(papers[0].id, "untitled work");
        assert_eq!(papers[0].link, "");
    }

    #[test]
    fn decodes_fixed_entity_set() {
        assert_eq!(
            decode_entities("&lt;a&gt; &quot;b&quot; &apos;c&#39; &amp;amp;"),
            "<a> \"b\" 'c' &amp;"
        );
    }
}
