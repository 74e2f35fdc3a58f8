//! HTTP client layer — `GlifHttp`, the token-bucket rate limiter and line streaming.

pub(crate) mod client;
pub mod rate_limit;
pub mod stream;

pub(crate) use client::GlifHttp;
pub use rate_limit::{RateLimit, RateLimiter};
pub use stream::LineStream;
