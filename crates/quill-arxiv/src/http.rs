//! Status handling for arXiv API responses.
//!
//! arXiv answers overload with `503` plus `Retry-After`, and aggressive
//! clients with `429`. Both surface as [`SearchError::RateLimited`] so the
//! warning logged by the caller says how long the service asked us to back off.

use reqwest::StatusCode;
use reqwest::header::RETRY_AFTER;

use crate::error::SearchError;

/// Longest response body kept in an [`SearchError::Api`] message.
const MAX_ERROR_BODY: usize = 512;

/// Back-off assumed when a throttling response carries no usable `Retry-After`.
const DEFAULT_RETRY_AFTER_SECS: u64 = 60;

/// Pass successful responses through; turn everything else into a
/// [`SearchError`].
pub async fn check_response(resp: reqwest::Response) -> Result<reqwest::Response, SearchError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }

    let retry_after = retry_after_secs(&resp);
    let throttled = status == StatusCode::TOO_MANY_REQUESTS
        || (status == StatusCode::SERVICE_UNAVAILABLE && retry_after.is_some());
    if throttled {
        return Err(SearchError::RateLimited {
            retry_after_secs: retry_after.unwrap_or(DEFAULT_RETRY_AFTER_SECS),
        });
    }

    let body = resp.text().await.unwrap_or_default();
    Err(SearchError::Api {
        status: status.as_u16(),
        message: clip(body.trim(), MAX_ERROR_BODY).to_string(),
    })
}

/// `Retry-After` in delta-seconds form. HTTP-date values are ignored.
fn retry_after_secs(resp: &reqwest::Response) -> Option<u64> {
    resp.headers()
        .get(RETRY_AFTER)?
        .to_str()
        .ok()?
        .trim()
        .parse()
        .ok()
}

/// Longest prefix of `text` that fits in `limit` bytes on a char boundary.
fn clip(text: &str, limit: usize) -> &str {
    if text.len() <= limit {
        return text;
    }
    let cut = (0..=limit)
        .rev()
        .find(|i| text.is_char_boundary(*i))
        .unwrap_or(0);
    &text[..cut]
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn response(status: u16, retry_after: Option<&str>, body: &str) -> reqwest::Response {
        let mut builder = ::http::Response::builder().status(status);
        if let Some(value) = retry_after {
            builder = builder.header("Retry-After", value);
        }
        reqwest::Response::from(builder.body(body.to_string()).unwrap())
    }

    #[rstest]
    #[case(429, Some("120"), 120)]
    #[case(429, None, 60)]
    #[case(429, Some("Wed, 21 Oct 2026 07:28:00 GMT"), 60)]
    #[case(503, Some("5"), 5)]
    #[tokio::test]
    async fn throttling_is_rate_limited(
        #[case] status: u16,
        #[case] retry_after: Option<&str>,
        #[case] expected: u64,
    ) {
        let err = check_response(response(status, retry_after, ""))
            .await
            .unwrap_err();
        assert!(
            matches!(err, SearchError::RateLimited { retry_after_secs } if retry_after_secs == expected),
            "{err}"
        );
    }

    #[tokio::test]
    async fn plain_unavailable_is_an_api_error() {
        let err = check_response(response(503, None, "  service unavailable\n"))
            .await
            .unwrap_err();
        match err {
            SearchError::Api { status, message } => {
                assert_eq!(status, 503);
                assert_eq!(message, "service unavailable");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn long_bodies_are_clipped() {
        let err = check_response(response(400, None, &"é".repeat(600)))
            .await
            .unwrap_err();
        let SearchError::Api { message, .. } = err else {
            panic!("expected api error");
        };
        assert_eq!(message.len(), MAX_ERROR_BODY);
        assert!(message.chars().all(|c| c == 'é'));
    }

    #[tokio::test]
    async fn success_passes_through() {
        let resp = check_response(response(200, None, "<feed/>")).await.unwrap();
        assert_eq!(resp.text().await.unwrap(), "<feed/>");
    }
}
