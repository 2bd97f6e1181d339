//! User identity records.

use serde::Serialize;
use serde_json::Value;

use crate::mapping::{Fields, JsonObject};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Contact {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub relationship: Option<String>,
    pub company: Option<String>,
    pub notes: Option<String>,
    pub nickname: Option<String>,
    pub source: String,
}

impl Contact {
    pub fn from_value(value: &Value) -> Self {
        let f = Fields::new(value);
        Self {
            name: f.string("name"),
            email: f.string("email"),
            phone: f.opt_str("phone"),
            relationship: f.opt_str("relationship"),
            company: f.opt_str("company"),
            notes: f.opt_str("notes"),
            nickname: f.opt_str("nickname"),
            source: f.string("source"),
        }
    }
}

/// The caller's identity profile. `raw` keeps the whole document for fields
/// this client does not model.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Identity {
    pub profile: JsonObject,
    pub key_people: Vec<Contact>,
    pub contacts: Vec<Contact>,
    pub preferences: JsonObject,
    pub raw: JsonObject,
}

impl Identity {
    pub fn from_value(value: &Value) -> Self {
        let f = Fields::new(value);
        Self {
            profile: f.object("profile"),
            key_people: f.records("key_people", Contact::from_value),
            contacts: f.records("contacts", Contact::from_value),
            preferences: f.object("preferences"),
            raw: value.as_object().cloned().unwrap_or_default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn identity_keeps_raw_document() {
        let doc = json!({
            "profile": {"name": "Ada"},
            "key_people": [{"name": "Grace", "email": "grace@example.com"}],
            "extra": 1
        });
        let identity = Identity::from_value(&doc);
        assert_eq!(identity.profile["name"], "Ada");
        assert_eq!(identity.key_people[0].source, "");
        assert!(identity.contacts.is_empty());
        assert_eq!(identity.raw["extra"], 1);
    }
}
