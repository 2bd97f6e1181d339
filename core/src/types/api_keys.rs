//! API key records.

use serde::Serialize;
use serde_json::Value;

use crate::mapping::Fields;

/// Scope restrictions attached to a key. `None` fields are unrestricted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ApiKeyPermissions {
    pub allowed_services: Option<Vec<String>>,
    pub allowed_tools: Option<Vec<String>>,
    pub max_spend_per_call_cents: Option<i64>,
    pub max_spend_per_day_cents: Option<i64>,
}

impl ApiKeyPermissions {
    pub fn from_value(value: &Value) -> Self {
        let f = Fields::new(value);
        Self {
            allowed_services: f.opt_strings("allowed_services"),
            allowed_tools: f.opt_strings("allowed_tools"),
            max_spend_per_call_cents: f.opt_i64("max_spend_per_call_cents"),
            max_spend_per_day_cents: f.opt_i64("max_spend_per_day_cents"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiKey {
    pub id: String,
    pub key_prefix: String,
    pub name: String,
    pub created_at: String,
    pub last_used: Option<String>,
    pub permissions: Option<ApiKeyPermissions>,
}

impl ApiKey {
    pub fn from_value(value: &Value) -> Self {
        let f = Fields::new(value);
        Self {
            id: f.string("id"),
            key_prefix: f.string("key_prefix"),
            name: f.string("name"),
            created_at: f.string("created_at"),
            last_used: f.opt_str("last_used"),
            permissions: f
                .get("permissions")
                .filter(|p| p.is_object())
                .map(ApiKeyPermissions::from_value),
        }
    }
}

/// A freshly created or rotated key, including the secret.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiKeyWithSecret {
    #[serde(flatten)]
    pub key_info: ApiKey,
    pub key: String,
}

impl ApiKeyWithSecret {
    pub fn from_value(value: &Value) -> Self {
        Self {
            key_info: ApiKey::from_value(value),
            key: Fields::new(value).string("key"),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn key_without_permissions() {
        let key = ApiKey::from_value(&json!({"id": "k1", "name": "ci", "permissions": null}));
        assert!(key.permissions.is_none());
        assert_eq!(key.key_prefix, "");
    }

    #[test]
    fn key_with_secret_and_permissions() {
        let key = ApiKeyWithSecret::from_value(&json!({
            "id": "k1",
            "key_prefix": "dk_ab",
            "name": "ci",
            "key": "dk_abcdef",
            "permissions": {"allowed_tools": ["t1"], "max_spend_per_day_cents": 500}
        }));
        assert_eq!(key.key, "dk_abcdef");
        let permissions = key.key_info.permissions.unwrap();
        assert_eq!(permissions.allowed_tools, Some(vec!["t1".to_string()]));
        assert!(permissions.allowed_services.is_none());
        assert_eq!(permissions.max_spend_per_day_cents, Some(500));
    }
}
