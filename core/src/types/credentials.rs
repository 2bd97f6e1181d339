//! Credential storage records.

use serde::Serialize;
use serde_json::Value;

use crate::mapping::Fields;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CredentialStoreResult {
    pub success: bool,
    pub service_id: String,
    pub service_name: String,
    pub credential_type: String,
}

impl CredentialStoreResult {
    /// A response without an explicit `success` flag counts as stored.
    pub fn from_value(value: &Value) -> Self {
        let f = Fields::new(value);
        Self {
            success: f.bool_or("success", true),
            service_id: f.string("service_id"),
            service_name: f.string("service_name"),
            credential_type: f.string("credential_type"),
        }
    }
}
