//! Glif metadata returned by `GET /api/glifs`.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::shared::serde_util::{non_empty_string, null_as_default};

/// A published glif.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GlifInfo {
    #[serde(deserialize_with = "non_empty_string::deserialize")]
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default::deserialize")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default::deserialize")]
    pub description: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}
