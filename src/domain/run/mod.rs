//! Glif runs: request inputs, run results and run history records.

pub mod wire;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::{BTreeMap, HashMap};

use crate::shared::serde_util::{non_empty_string, null_as_default};

// ─── Inputs ──────────────────────────────────────────────────────────────────

/// Arguments of a glif run.
///
/// Glifs accept either positional inputs (filled in block order) or named
/// inputs keyed by block name. Any other JSON value, `null` included, is sent
/// as-is. The default is `null`, i.e. a run with no inputs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RunInputs {
    Positional(Vec<Value>),
    Named(Map<String, Value>),
    Other(Value),
}

impl Default for RunInputs {
    fn default() -> Self {
        RunInputs::Other(Value::Null)
    }
}

impl RunInputs {
    /// No inputs at all: `null`, `[]` or `{}`.
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Positional(v) => v.is_empty(),
            Self::Named(m) => m.is_empty(),
            Self::Other(v) => v.is_null(),
        }
    }
}

impl From<Value> for RunInputs {
    fn from(value: Value) -> Self {
        match value {
            Value::Array(values) => RunInputs::Positional(values),
            Value::Object(map) => RunInputs::Named(map),
            other => RunInputs::Other(other),
        }
    }
}

impl From<()> for RunInputs {
    fn from(_: ()) -> Self {
        RunInputs::default()
    }
}

impl<T: Into<Value>> From<Vec<T>> for RunInputs {
    fn from(values: Vec<T>) -> Self {
        RunInputs::Positional(values.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Value>, const N: usize> From<[T; N]> for RunInputs {
    fn from(values: [T; N]) -> Self {
        RunInputs::Positional(values.into_iter().map(Into::into).collect())
    }
}

impl From<Map<String, Value>> for RunInputs {
    fn from(map: Map<String, Value>) -> Self {
        RunInputs::Named(map)
    }
}

impl<K: Into<String>, V: Into<Value>> From<HashMap<K, V>> for RunInputs {
    fn from(map: HashMap<K, V>) -> Self {
        map.into_iter().collect()
    }
}

impl<K: Into<String>, V: Into<Value>> From<BTreeMap<K, V>> for RunInputs {
    fn from(map: BTreeMap<K, V>) -> Self {
        map.into_iter().collect()
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for RunInputs {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        RunInputs::Named(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

// ─── Results ─────────────────────────────────────────────────────────────────

/// Response of `POST /api/v1/run/{id}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunResult {
    #[serde(deserialize_with = "non_empty_string::deserialize")]
    pub id: String,
    /// Inputs as echoed back by the server.
    #[serde(default)]
    pub inputs: Value,
    #[serde(default, deserialize_with = "null_as_default::deserialize")]
    pub output: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// One entry of `GET /api/runs`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GlifRun {
    #[serde(deserialize_with = "non_empty_string::deserialize")]
    pub id: String,
    #[serde(rename = "glifId", default, deserialize_with = "null_as_default::deserialize")]
    pub glif_id: String,
    #[serde(default)]
    pub inputs: Value,
    #[serde(default)]
    pub output: Value,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}
