//! Network constants for the Glif SDK.

use std::time::Duration;

/// Default REST API base URL for Glif.
pub const DEFAULT_API_URL: &str = "https://glif.app";

/// Default per-request timeout of the built-in transport.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Environment variable holding the API token, read by `GlifClientBuilder::from_env`.
pub const API_TOKEN_ENV: &str = "GLIF_API_TOKEN";

/// Environment variable overriding the base URL, read by `GlifClientBuilder::from_env`.
pub const API_URL_ENV: &str = "GLIF_API_URL";

// ── Endpoint paths ───────────────────────────────────────────────────────────

/// Run a glif. The model id is appended as one path segment.
pub const ENDPOINT_RUN: &str = "/api/v1/run";
pub const ENDPOINT_ADDRESSES: &str = "/api/v1/addresses";
pub const ENDPOINT_GLIFS: &str = "/api/glifs";
pub const ENDPOINT_RUNS: &str = "/api/runs";
pub const ENDPOINT_USER: &str = "/api/user";
pub const ENDPOINT_ME: &str = "/api/me";
pub const ENDPOINT_SPHERES: &str = "/api/spheres";
