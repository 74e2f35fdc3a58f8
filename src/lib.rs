//! # Glif SDK
//!
//! A Rust client for the Glif API: run glifs (one-shot or streaming), browse
//! run history, and fetch user, sphere and address metadata.
//!
//! ## Architecture
//!
//! The SDK is organized in layers:
//!
//! 1. **Core** — Record types, query helpers, errors (always available)
//! 2. **HTTP** — `GlifHttp` with bearer auth, token-bucket rate limiting and
//!    newline-delimited streaming
//! 3. **High-Level Client** — `GlifClient`, one method per endpoint
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use glif_sdk::prelude::*;
//!
//! let client = GlifClient::builder()
//!     .env_token("GLIF_API_TOKEN")
//!     .build();
//!
//! let run = client.run_simple("clgh1vxtu0011mo081dplq3xs", vec!["a happy horse"]).await?;
//! println!("{}", run.output);
//!
//! client
//!     .stream_run_simple("clgh1vxtu0011mo081dplq3xs", vec!["a happy horse"], |line| {
//!         print!("{}", String::from_utf8_lossy(line));
//!         Ok::<_, GlifError>(())
//!     })
//!     .await?;
//! ```

// ── Layer 1: Core ────────────────────────────────────────────────────────────

/// Query parameters, identifier classification, serde helpers.
pub mod shared;

/// Domain modules: runs, glifs, users, spheres.
pub mod domain;

/// Unified SDK error types.
pub mod error;

/// Base URL, endpoint paths and environment variable names.
pub mod network;

// ── Layer 2: HTTP ────────────────────────────────────────────────────────────

/// HTTP client with rate limiting and line streaming.
#[cfg(feature = "http")]
pub mod http;

// ── Layer 3: High-Level Client ───────────────────────────────────────────────

/// `GlifClient` — the primary entry point.
#[cfg(feature = "http")]
pub mod client;

// ── Prelude ──────────────────────────────────────────────────────────────────

pub mod prelude {
    // Shared
    pub use crate::shared::{QueryParams, UserLookup};

    // Domain types
    pub use crate::domain::glif::GlifInfo;
    pub use crate::domain::run::{GlifRun, RunInputs, RunResult};
    pub use crate::domain::sphere::SphereInfo;
    pub use crate::domain::user::{AddressList, UserInfo};

    // Errors
    pub use crate::error::{GlifError, GlifResult, RateLimitError};

    // Network
    pub use crate::network::{API_TOKEN_ENV, DEFAULT_API_URL};

    // HTTP client
    #[cfg(feature = "http")]
    pub use crate::client::{GlifClient, GlifClientBuilder};
    #[cfg(feature = "http")]
    pub use crate::http::{LineStream, RateLimit};
}
