//! High-level client — `GlifClient` and its builder.
//!
//! One method per Glif endpoint. Every call goes through `GlifHttp`, which
//! attaches the bearer token, applies the rate limiter where the endpoint
//! requires it, and maps failures onto [`GlifError`].

use std::sync::Arc;
use std::time::Duration;

use futures_util::StreamExt;
use reqwest::Client;

use crate::domain::glif::GlifInfo;
use crate::domain::run::wire::RunRequest;
use crate::domain::run::{GlifRun, RunInputs, RunResult};
use crate::domain::sphere::SphereInfo;
use crate::domain::user::{AddressList, UserInfo};
use crate::error::{BoxError, GlifError, GlifResult};
use crate::http::client::Throttle;
use crate::http::rate_limit::{RateLimit, RateLimiter};
use crate::http::stream::LineStream;
use crate::http::GlifHttp;
use crate::network::{
    API_TOKEN_ENV, API_URL_ENV, DEFAULT_API_URL, DEFAULT_TIMEOUT, ENDPOINT_ADDRESSES,
    ENDPOINT_GLIFS, ENDPOINT_ME, ENDPOINT_RUN, ENDPOINT_RUNS, ENDPOINT_SPHERES, ENDPOINT_USER,
};
use crate::shared::{QueryParams, UserLookup};

/// The primary entry point for the Glif SDK.
///
/// Cheap to clone; clones share the connection pool and the rate limiter.
#[derive(Debug, Clone)]
pub struct GlifClient {
    pub(crate) http: GlifHttp,
    /// Apply the rate limiter to the read-only listing endpoints too.
    pub(crate) rate_limit_listings: bool,
}

impl GlifClient {
    /// Client with the default configuration and no API token.
    pub fn new() -> Self {
        Self::builder().build()
    }

    pub fn builder() -> GlifClientBuilder {
        GlifClientBuilder::default()
    }

    pub fn base_url(&self) -> &str {
        self.http.base_url()
    }

    /// Check whether a non-empty API token is configured.
    pub fn has_api_token(&self) -> bool {
        self.http.has_api_token()
    }

    pub fn rate_limit(&self) -> RateLimit {
        self.http.limiter().limit()
    }

    // ── Runs ─────────────────────────────────────────────────────────────

    /// Run a glif and wait for its result.
    ///
    /// `inputs` are either positional (`vec!["a happy horse"]`) or named
    /// (a map of block name to value). Consumes one rate-limit permit.
    pub async fn run_simple(
        &self,
        model_id: &str,
        inputs: impl Into<RunInputs>,
    ) -> GlifResult<RunResult> {
        let inputs = inputs.into();
        let url = self.run_url(model_id)?;
        let body = RunRequest {
            id: model_id,
            inputs: &inputs,
        };
        self.http.post(url, &body, Throttle::Limited, model_id).await
    }

    /// Run a glif and receive its response as a stream of lines.
    ///
    /// Streaming runs are long-lived and do not consume a rate-limit permit.
    /// Dropping the stream closes the connection.
    pub async fn run_stream(
        &self,
        model_id: &str,
        inputs: impl Into<RunInputs>,
    ) -> GlifResult<LineStream> {
        let inputs = inputs.into();
        let url = self.run_url(model_id)?;
        let body = RunRequest {
            id: model_id,
            inputs: &inputs,
        };
        self.http.post_lines(url, &body, model_id).await
    }

    /// Run a glif and feed each raw response line, `\n` included, to `on_chunk`.
    ///
    /// Lines are delivered in order, one at a time; the next line is not read
    /// until `on_chunk` returns. An error from `on_chunk` aborts the stream and
    /// is returned as [`GlifError::Callback`].
    pub async fn stream_run_simple<F, E>(
        &self,
        model_id: &str,
        inputs: impl Into<RunInputs>,
        mut on_chunk: F,
    ) -> GlifResult<()>
    where
        F: FnMut(&[u8]) -> Result<(), E>,
        E: Into<BoxError>,
    {
        let mut lines = self.run_stream(model_id, inputs).await?;
        while let Some(line) = lines.next().await {
            let line = line?;
            on_chunk(&line).map_err(|e| GlifError::Callback(e.into()))?;
        }
        Ok(())
    }

    // ── Account ──────────────────────────────────────────────────────────

    /// Addresses associated with the caller's account. Always rate limited.
    pub async fn get_addresses(&self) -> GlifResult<AddressList> {
        let url = self.http.url(ENDPOINT_ADDRESSES, None, &QueryParams::new())?;
        self.http.get(url, Throttle::Limited).await
    }

    /// Profile of the user owning the API token.
    pub async fn get_my_info(&self) -> GlifResult<UserInfo> {
        let url = self.http.url(ENDPOINT_ME, None, &QueryParams::new())?;
        self.http.get(url, self.listing_throttle()).await
    }

    /// Look up a user by internal id (`cl…`) or by username.
    pub async fn get_user_info(&self, username_or_id: &str) -> GlifResult<UserInfo> {
        let lookup = UserLookup::classify(username_or_id);
        let query = QueryParams::new().with(lookup.param(), lookup.value());
        let url = self.http.url(ENDPOINT_USER, None, &query)?;
        self.http.get(url, self.listing_throttle()).await
    }

    // ── Listings ─────────────────────────────────────────────────────────

    pub async fn get_glifs(&self, params: Option<&QueryParams>) -> GlifResult<Vec<GlifInfo>> {
        let url = self.http.url(ENDPOINT_GLIFS, None, params.unwrap_or(&QueryParams::new()))?;
        self.http.get(url, self.listing_throttle()).await
    }

    /// Run history of one glif. `glifId` is sent ahead of `params`.
    pub async fn get_glif_runs(
        &self,
        glif_id: &str,
        params: Option<&QueryParams>,
    ) -> GlifResult<Vec<GlifRun>> {
        let mut query = QueryParams::new().with("glifId", glif_id);
        if let Some(params) = params {
            query.extend(params.iter());
        }
        let url = self.http.url(ENDPOINT_RUNS, None, &query)?;
        self.http.get(url, self.listing_throttle()).await
    }

    pub async fn get_spheres(&self, params: Option<&QueryParams>) -> GlifResult<Vec<SphereInfo>> {
        let url = self.http.url(ENDPOINT_SPHERES, None, params.unwrap_or(&QueryParams::new()))?;
        self.http.get(url, self.listing_throttle()).await
    }

    // ── Helpers ──────────────────────────────────────────────────────────

    fn run_url(&self, model_id: &str) -> GlifResult<reqwest::Url> {
        if model_id.is_empty() {
            return Err(GlifError::InvalidRequest("model id must not be empty".into()));
        }
        self.http.url(ENDPOINT_RUN, Some(model_id), &QueryParams::new())
    }

    fn listing_throttle(&self) -> Throttle {
        if self.rate_limit_listings {
            Throttle::Limited
        } else {
            Throttle::Unlimited
        }
    }
}

impl Default for GlifClient {
    fn default() -> Self {
        Self::new()
    }
}

// ═════════════════════════════════════════════════════════════════════════════
// Builder
// ═════════════════════════════════════════════════════════════════════════════

/// How the builder obtains its transport. Setting either replaces the other.
#[derive(Debug, Clone)]
enum Transport {
    Timeout(Duration),
    Client(Client),
}

/// Builder for configuring [`GlifClient`]. Later setters override earlier ones.
#[derive(Clone)]
pub struct GlifClientBuilder {
    base_url: String,
    transport: Transport,
    span: tracing::Span,
    rate_limit: RateLimit,
    rate_limit_wait_timeout: Option<Duration>,
    rate_limit_listings: bool,
    api_token: String,
}

impl Default for GlifClientBuilder {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_URL.to_string(),
            transport: Transport::Timeout(DEFAULT_TIMEOUT),
            span: tracing::Span::none(),
            rate_limit: RateLimit::default(),
            rate_limit_wait_timeout: None,
            rate_limit_listings: false,
            api_token: String::new(),
        }
    }
}

impl GlifClientBuilder {
    /// Default builder with the token from `GLIF_API_TOKEN` and, if set, the
    /// base URL from `GLIF_API_URL`.
    pub fn from_env() -> Self {
        let builder = Self::default().env_token(API_TOKEN_ENV);
        match std::env::var(API_URL_ENV) {
            Ok(url) if !url.is_empty() => builder.base_url(&url),
            _ => builder,
        }
    }

    pub fn base_url(mut self, url: &str) -> Self {
        self.base_url = url.to_string();
        self
    }

    /// Use a pre-configured reqwest client (proxies, custom TLS, shared pool).
    pub fn http_client(mut self, client: Client) -> Self {
        self.transport = Transport::Client(client);
        self
    }

    /// Per-request timeout of the built-in transport.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.transport = Transport::Timeout(timeout);
        self
    }

    /// Parent span for every request's log events.
    pub fn span(mut self, span: tracing::Span) -> Self {
        self.span = span;
        self
    }

    pub fn rate_limit(mut self, limit: RateLimit) -> Self {
        self.rate_limit = limit;
        self
    }

    /// Refuse a rate-limited call with [`GlifError::RateLimited`] instead of
    /// waiting longer than `timeout` for a permit.
    pub fn rate_limit_wait_timeout(mut self, timeout: Duration) -> Self {
        self.rate_limit_wait_timeout = Some(timeout);
        self
    }

    /// Also rate limit `get_glifs`, `get_glif_runs`, `get_user_info`,
    /// `get_my_info` and `get_spheres`. Off by default.
    pub fn rate_limit_listings(mut self, enabled: bool) -> Self {
        self.rate_limit_listings = enabled;
        self
    }

    pub fn api_token(mut self, token: impl Into<String>) -> Self {
        self.api_token = token.into();
        self
    }

    /// Read the API token from the environment variable `var` now.
    /// An unset variable leaves an empty token.
    pub fn env_token(mut self, var: &str) -> Self {
        self.api_token = std::env::var(var).unwrap_or_default();
        self
    }

    pub fn build(self) -> GlifClient {
        let client = match self.transport {
            Transport::Client(client) => client,
            Transport::Timeout(timeout) => Client::builder()
                .timeout(timeout)
                .pool_max_idle_per_host(10)
                .build()
                .unwrap_or_else(|e| {
                    tracing::warn!("Failed to build HTTP client, using defaults: {}", e);
                    Client::new()
                }),
        };

        GlifClient {
            http: GlifHttp::new(
                &self.base_url,
                client,
                self.api_token,
                Arc::new(RateLimiter::new(self.rate_limit)),
                self.rate_limit_wait_timeout,
                self.span,
            ),
            rate_limit_listings: self.rate_limit_listings,
        }
    }
}
