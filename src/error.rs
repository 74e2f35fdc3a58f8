//! Unified SDK error types.

use std::time::Duration;
use thiserror::Error;

/// Boxed error returned by stream consumers.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Result type alias for SDK operations.
pub type GlifResult<T> = Result<T, GlifError>;

/// Top-level SDK error.
#[derive(Error, Debug)]
pub enum GlifError {
    #[error("rate limit exceeded: {0}")]
    RateLimited(#[from] RateLimitError),

    #[error("invalid URL '{url}': {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("failed to create request: {0}")]
    InvalidRequest(String),

    #[error("failed to marshal payload: {0}")]
    Encode(#[source] serde_json::Error),

    #[cfg(feature = "http")]
    #[error("failed to send request: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("unexpected status code {status}: {body}")]
    UnexpectedStatus { status: u16, body: String },

    #[error("failed to decode response: {0}")]
    Decode(#[source] serde_json::Error),

    #[cfg(feature = "http")]
    #[error("error reading stream: {0}")]
    Stream(#[source] reqwest::Error),

    #[error("error in callback: {0}")]
    Callback(#[source] BoxError),
}

impl GlifError {
    /// HTTP status code, if the server answered with a non-2xx status.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::UnexpectedStatus { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Whether repeating the same call may succeed.
    ///
    /// The SDK never retries on its own; this is for callers that implement
    /// their own retry policy.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::UnexpectedStatus { status, .. } => *status == 429 || *status >= 500,
            #[cfg(feature = "http")]
            Self::Transport(e) | Self::Stream(e) => e.is_connect() || e.is_timeout(),
            _ => false,
        }
    }
}

/// Why the client-side rate limiter refused a permit.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RateLimitError {
    #[error("limiter burst is 0, no request can ever be admitted")]
    ExceedsBurst,

    #[error("limiter has no refill rate and no tokens left")]
    NoRefill,

    #[error("refill rate is too low to compute a wait")]
    WaitTooLong,

    #[error("waiting {wait:?} for a permit would exceed the allowed {max_wait:?}")]
    WouldExceedDeadline { wait: Duration, max_wait: Duration },
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_status_only_for_unexpected_status() {
        let err = GlifError::UnexpectedStatus {
            status: 503,
            body: "down".into(),
        };
        assert_eq!(err.status(), Some(503));
        assert!(err.is_retryable());

        let err = GlifError::InvalidRequest("empty model id".into());
        assert_eq!(err.status(), None);
        assert!(!err.is_retryable());
    }

    #[test]
    fn test_client_errors_are_not_retryable() {
        let err = GlifError::UnexpectedStatus {
            status: 404,
            body: String::new(),
        };
        assert!(!err.is_retryable());

        let err = GlifError::UnexpectedStatus {
            status: 429,
            body: String::new(),
        };
        assert!(err.is_retryable());
    }

    #[test]
    fn test_rate_limited_wraps_cause() {
        let err: GlifError = RateLimitError::ExceedsBurst.into();
        assert!(err.to_string().starts_with("rate limit exceeded"));
        let source = err.source().expect("source should be chained");
        assert_eq!(
            source.to_string(),
            RateLimitError::ExceedsBurst.to_string()
        );
    }

    #[test]
    fn test_callback_error_keeps_message() {
        let err = GlifError::Callback("consumer gave up".into());
        assert_eq!(err.to_string(), "error in callback: consumer gave up");
        assert!(err.source().is_some());
    }
}
