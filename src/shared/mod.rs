//! Shared request helpers used across all domains.

pub mod serde_util;

// ─── QueryParams ─────────────────────────────────────────────────────────────

/// Ordered query parameters passed through to listing endpoints.
///
/// Pairs are sent in insertion order and URL-encoded on the way out; repeated
/// keys are kept.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams(Vec<(String, String)>);

impl QueryParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style append.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.push(key, value);
        self
    }

    pub fn push(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.push((key.into(), value.into()));
    }

    /// First value stored under `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for QueryParams {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

impl<K: Into<String>, V: Into<String>> Extend<(K, V)> for QueryParams {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        self.0
            .extend(iter.into_iter().map(|(k, v)| (k.into(), v.into())));
    }
}

// ─── UserLookup ──────────────────────────────────────────────────────────────

/// Prefix of Glif's internal (cuid) identifiers.
pub const INTERNAL_ID_PREFIX: &str = "cl";

/// How `/api/user` is addressed: by internal id or by username.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserLookup {
    Id(String),
    Username(String),
}

impl UserLookup {
    /// Classify a free-form identifier. Anything starting with
    /// [`INTERNAL_ID_PREFIX`] is treated as an internal id.
    pub fn classify(identifier: &str) -> Self {
        if identifier.starts_with(INTERNAL_ID_PREFIX) {
            Self::Id(identifier.to_string())
        } else {
            Self::Username(identifier.to_string())
        }
    }

    /// Query parameter name used on the wire.
    pub fn param(&self) -> &'static str {
        match self {
            Self::Id(_) => "id",
            Self::Username(_) => "username",
        }
    }

    pub fn value(&self) -> &str {
        match self {
            Self::Id(v) | Self::Username(v) => v,
        }
    }
}
