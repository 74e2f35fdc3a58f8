//! Low-level HTTP client — `GlifHttp`.
//!
//! Owns the transport, token and rate limiter, and implements the three
//! request shapes every endpoint is built from: GET-and-decode,
//! POST-and-decode, and POST-and-stream. Endpoint methods live on
//! [`GlifClient`](crate::client::GlifClient).

use std::sync::Arc;
use std::time::Duration;

use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, RequestBuilder, Response, Url};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::Instrument;

use crate::error::{GlifError, GlifResult};
use crate::http::rate_limit::RateLimiter;
use crate::http::stream::{self, LineStream};
use crate::shared::QueryParams;

/// Whether a request consumes a rate-limit permit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Throttle {
    Limited,
    Unlimited,
}

/// Low-level HTTP client for the Glif REST API.
#[derive(Clone)]
pub struct GlifHttp {
    base_url: String,
    client: Client,
    /// Bearer token. NEVER exposed publicly.
    api_token: String,
    limiter: Arc<RateLimiter>,
    max_wait: Option<Duration>,
    span: tracing::Span,
}

impl GlifHttp {
    pub(crate) fn new(
        base_url: &str,
        client: Client,
        api_token: String,
        limiter: Arc<RateLimiter>,
        max_wait: Option<Duration>,
        span: tracing::Span,
    ) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
            api_token,
            limiter,
            max_wait,
            span,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub(crate) fn has_api_token(&self) -> bool {
        !self.api_token.is_empty()
    }

    pub(crate) fn limiter(&self) -> &RateLimiter {
        &self.limiter
    }

    // ── URL construction ─────────────────────────────────────────────────

    /// Absolute URL for an endpoint path, with optional extra path segment
    /// and query pairs.
    pub(crate) fn url(
        &self,
        path: &str,
        segment: Option<&str>,
        query: &QueryParams,
    ) -> GlifResult<Url> {
        let raw = format!("{}{}", self.base_url, path);
        let mut url = Url::parse(&raw).map_err(|source| GlifError::InvalidUrl {
            url: raw.clone(),
            source,
        })?;

        if let Some(segment) = segment {
            url.path_segments_mut()
                .map_err(|_| GlifError::InvalidRequest(format!("base URL '{}' cannot hold a path", raw)))?
                .push(segment);
        }
        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query.iter());
        }
        Ok(url)
    }

    // ── Request shapes ───────────────────────────────────────────────────

    pub(crate) async fn get<T: DeserializeOwned>(&self, url: Url, throttle: Throttle) -> GlifResult<T> {
        async {
            self.acquire(throttle).await?;
            tracing::info!(endpoint = %url, "Sending request");
            let response = self.send(self.client.get(url)).await?;
            Self::decode(response).await
        }
        .instrument(self.span.clone())
        .await
    }

    pub(crate) async fn post<T: DeserializeOwned, B: Serialize>(
        &self,
        url: Url,
        body: &B,
        throttle: Throttle,
        model_id: &str,
    ) -> GlifResult<T> {
        async {
            self.acquire(throttle).await?;
            let payload = serde_json::to_vec(body).map_err(GlifError::Encode)?;
            tracing::info!(endpoint = %url, model_id, "Sending request");
            let response = self.send(self.json_post(url, payload)).await?;
            Self::decode(response).await
        }
        .instrument(self.span.clone())
        .await
    }

    /// POST and hand back the response body as a stream of lines.
    pub(crate) async fn post_lines<B: Serialize>(
        &self,
        url: Url,
        body: &B,
        model_id: &str,
    ) -> GlifResult<LineStream> {
        async {
            let payload = serde_json::to_vec(body).map_err(GlifError::Encode)?;
            tracing::debug!(endpoint = %url, model_id, "Opening stream");
            let response = self.send(self.json_post(url, payload)).await?;
            Ok(stream::lines(response))
        }
        .instrument(self.span.clone())
        .await
    }

    // ── Internal HTTP methods ────────────────────────────────────────────

    async fn acquire(&self, throttle: Throttle) -> GlifResult<()> {
        if throttle == Throttle::Limited {
            self.limiter.wait(self.max_wait).await?;
        }
        Ok(())
    }

    fn json_post(&self, url: Url, payload: Vec<u8>) -> RequestBuilder {
        self.client
            .post(url)
            .header(CONTENT_TYPE, "application/json")
            .body(payload)
    }

    /// Attach auth, send, and reject non-2xx statuses.
    async fn send(&self, request: RequestBuilder) -> GlifResult<Response> {
        let response = request
            .bearer_auth(&self.api_token)
            .send()
            .await
            .map_err(|e| {
                if e.is_builder() {
                    GlifError::InvalidRequest(e.to_string())
                } else {
                    GlifError::Transport(e)
                }
            })?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = match response.text().await {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!("Failed to read error response body: {}", e);
                String::new()
            }
        };
        tracing::debug!(status = status.as_u16(), "Request rejected");
        Err(GlifError::UnexpectedStatus {
            status: status.as_u16(),
            body,
        })
    }

    async fn decode<T: DeserializeOwned>(response: Response) -> GlifResult<T> {
        let bytes = response.bytes().await.map_err(GlifError::Transport)?;
        serde_json::from_slice(&bytes).map_err(GlifError::Decode)
    }
}

impl std::fmt::Debug for GlifHttp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GlifHttp")
            .field("base_url", &self.base_url)
            .field("api_token", &if self.has_api_token() { "<redacted>" } else { "<none>" })
            .field("rate_limit", &self.limiter.limit())
            .field("max_wait", &self.max_wait)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::rate_limit::RateLimit;

    fn http(base_url: &str) -> GlifHttp {
        GlifHttp::new(
            base_url,
            Client::new(),
            "secret-token".into(),
            Arc::new(RateLimiter::new(RateLimit::default())),
            None,
            tracing::Span::none(),
        )
    }

    #[test]
    fn test_trailing_slash_trimmed() {
        assert_eq!(http("https://glif.app/").base_url(), "https://glif.app");
    }

    #[test]
    fn test_url_with_segment_is_escaped() {
        let url = http("https://glif.app")
            .url("/api/v1/run", Some("a b/c"), &QueryParams::new())
            .unwrap();
        assert_eq!(url.as_str(), "https://glif.app/api/v1/run/a%20b%2Fc");
    }

    #[test]
    fn test_url_query_in_order() {
        let query = QueryParams::new().with("glifId", "g1").with("q", "a&b");
        let url = http("https://glif.app").url("/api/runs", None, &query).unwrap();
        assert_eq!(url.as_str(), "https://glif.app/api/runs?glifId=g1&q=a%26b");
    }

    #[test]
    fn test_url_without_query_has_no_question_mark() {
        let url = http("https://glif.app").url("/api/me", None, &QueryParams::new()).unwrap();
        assert_eq!(url.as_str(), "https://glif.app/api/me");
    }

    #[test]
    fn test_empty_base_url_is_invalid() {
        let err = http("").url("/api/me", None, &QueryParams::new()).unwrap_err();
        assert!(matches!(err, GlifError::InvalidUrl { .. }));
    }

    #[test]
    fn test_debug_redacts_token() {
        let rendered = format!("{:?}", http("https://glif.app"));
        assert!(!rendered.contains("secret-token"));
        assert!(rendered.contains("<redacted>"));
    }
}
