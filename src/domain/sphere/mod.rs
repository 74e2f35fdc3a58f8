//! Spheres (curated glif collections) returned by `GET /api/spheres`.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::shared::serde_util::{non_empty_string, null_as_default};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SphereInfo {
    #[serde(deserialize_with = "non_empty_string::deserialize")]
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default::deserialize")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default::deserialize")]
    pub slug: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sphere_deserialize() {
        let sphere: SphereInfo =
            serde_json::from_str(r#"{"id": "s1", "name": "Memes", "slug": "memes"}"#).unwrap();
        assert_eq!(sphere.slug, "memes");
        assert!(sphere.extra.is_empty());
    }

    #[test]
    fn test_sphere_missing_id_fails() {
        assert!(serde_json::from_str::<SphereInfo>(r#"{"name": "Memes"}"#).is_err());
    }
}
