//! Custom serde helpers for the Glif wire format.

/// Deserializes a string that must not be empty.
///
/// Record ids are opaque but always populated; an empty id means the response
/// is not the resource we asked for.
pub mod non_empty_string {
    use serde::{Deserialize, Deserializer};

    pub fn deserialize<'de, D>(deserializer: D) -> Result<String, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        if value.is_empty() {
            return Err(serde::de::Error::custom("id must not be empty"));
        }
        Ok(value)
    }
}

/// Deserializes `null` as the type's default value.
///
/// Pair with `#[serde(default)]` so a missing field also lands on the default.
pub mod null_as_default {
    use serde::{Deserialize, Deserializer};

    pub fn deserialize<'de, D, T>(deserializer: D) -> Result<T, D::Error>
    where
        D: Deserializer<'de>,
        T: Deserialize<'de> + Default,
    {
        Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
    }
}
