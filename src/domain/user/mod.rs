//! User profiles and account addresses.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::shared::serde_util::{non_empty_string, null_as_default};

/// Public profile returned by `GET /api/user` and `GET /api/me`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserInfo {
    #[serde(deserialize_with = "non_empty_string::deserialize")]
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default::deserialize")]
    pub username: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Addresses associated with the caller's account, in server order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressList {
    #[serde(default)]
    pub addresses: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_info_deserialize() {
        let json = r#"{"id": "cl0001", "username": "alice", "name": "Alice", "image": null}"#;
        let user: UserInfo = serde_json::from_str(json).unwrap();
        assert_eq!(user.id, "cl0001");
        assert_eq!(user.username, "alice");
        assert_eq!(user.extra["name"], "Alice");
        assert!(user.extra["image"].is_null());
    }

    #[test]
    fn test_address_list_keeps_order() {
        let list: AddressList =
            serde_json::from_str(r#"{"addresses": ["address2", "address1"]}"#).unwrap();
        assert_eq!(list.addresses, vec!["address2", "address1"]);
    }
}
