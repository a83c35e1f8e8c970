//! # quill-arxiv
//!
//! arXiv paper search client for Quill.
//!
//! Queries the arXiv Atom API (`export.arxiv.org/api/query`) and normalizes
//! entries into [`PaperRecord`]s. The public [`PaperSearch::search`] never
//! fails: transport errors, non-success statuses, timeouts, and unparseable
//! feeds are logged and degrade to an empty result set.

pub mod feed;
pub mod query;

mod error;
mod http;

pub use error::SearchError;

use std::time::Duration;

use async_trait::async_trait;
use quill_config::SearchConfig;
use quill_core::entities::PaperRecord;

// ── Trait ──────────────────────────────────────────────────────────

/// A paper search service.
#[async_trait]
pub trait PaperSearch: Send + Sync {
    /// Search for up to `max_results` papers matching `query`.
    ///
    /// Implementations must not fail: any error degrades to an empty `Vec`.
    async fn search(&self, query: &str, max_results: usize) -> Vec<PaperRecord>;
}

// ── Client ─────────────────────────────────────────────────────────

/// HTTP client for the arXiv query API.
pub struct ArxivClient {
    http: reqwest::Client,
    base_url: String,
}

impl Default for ArxivClient {
    fn default() -> Self {
        Self::new(&SearchConfig::default())
    }
}

impl ArxivClient {
    /// Create a client from search configuration.
    ///
    /// # Panics
    ///
    /// Panics if the underlying `reqwest::Client` fails to build.
    #[must_use]
    pub fn new(config: &SearchConfig) -> Self {
        Self {
            http: reqwest::Client::builder()
                .user_agent(config.user_agent.clone())
                .timeout(Duration::from_secs(config.timeout_secs))
                .build()
                .expect("reqwest client should build"),
            base_url: config.base_url.clone(),
        }
    }

    /// Run one query against the API, surfacing every failure.
    ///
    /// A blank query (nothing left after term filtering) returns an empty
    /// result without a request.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError`] if the HTTP request fails or times out, the
    /// service returns a non-success status, or the feed reports an error.
    pub async fn try_search(
        &self,
        query: &str,
        max_results: usize,
    ) -> Result<Vec<PaperRecord>, SearchError> {
        let Some(search_query) = query::build_search_query(query) else {
            tracing::debug!(query, "search query is blank after filtering; skipping request");
            return Ok(Vec::new());
        };

        let url = format!(
            "{}?search_query={}&start=0&max_results={max_results}&sortBy=relevance&sortOrder=descending",
            self.base_url,
            urlencoding::encode(&search_query),
        );
        tracing::debug!(%url, "querying arXiv");

        let resp = self.http.get(&url).send().await?;
        let resp = http::check_response(resp).await?;
        let body = resp.text().await?;

        let mut papers = feed::parse_feed(&body)?;
        papers.truncate(max_results);
        Ok(papers)
    }
}

#[async_trait]
impl PaperSearch for ArxivClient {
    async fn search(&self, query: &str, max_results: usize) -> Vec<PaperRecord> {
        match self.try_search(query, max_results).await {
            Ok(papers) => {
                tracing::debug!(query, results = papers.len(), "arXiv search complete");
                papers
            }
            Err(error) => {
                tracing::warn!(query, %error, "arXiv search failed; treating as no results");
                Vec::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unreachable_client() -> ArxivClient {
        // Port 9 (discard) on loopback refuses connections on test hosts.
        ArxivClient::new(&SearchConfig {
            base_url: "http://127.0.0.1:9/api/query".into(),
            timeout_secs: 2,
            ..SearchConfig::default()
        })
    }

    #[test]
    fn client_default() {
        let _client = ArxivClient::default();
    }

    #[tokio::test]
    async fn blank_query_skips_request() {
        let client = unreachable_client();
        let papers = client.try_search("  ?? ", 5).await.unwrap();
        assert!(papers.is_empty());
    }

    #[tokio::test]
    async fn transport_failure_surfaces_in_try_search() {
        let client = unreachable_client();
        let err = client.try_search("graph networks", 5).await.unwrap_err();
        assert!(matches!(err, SearchError::Http(_)));
    }

    #[tokio::test]
    async fn transport_failure_degrades_to_empty() {
        let client = unreachable_client();
        let papers = client.search("graph networks", 5).await;
        assert!(papers.is_empty());
    }

    #[tokio::test]
    #[ignore] // requires network
    async fn live_search() {
        let client = ArxivClient::default();
        let papers = client.search("graph neural networks traffic forecasting", 5).await;
        println!("\n── live arXiv search ── {} results", papers.len());
        for p in &papers {
            println!("  [{}] {} ({})", p.id, p.title, p.published_label());
        }
        assert!(papers.len() <= 5);
    }
}
