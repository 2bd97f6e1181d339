//! API key management.

use std::sync::Arc;

use serde::Serialize;

use crate::error::Result;
use crate::mapping;
use crate::transport::Transport;
use crate::types::{ApiKey, ApiKeyPermissions, ApiKeyWithSecret};

#[derive(Debug, Clone, Serialize)]
pub struct CreateApiKey {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub permissions: Option<ApiKeyPermissions>,
}

#[derive(Debug, Clone)]
pub struct ApiKeysApi {
    transport: Arc<Transport>,
}

impl ApiKeysApi {
    pub(crate) fn new(transport: Arc<Transport>) -> Self {
        Self { transport }
    }

    pub async fn list(&self) -> Result<Vec<ApiKey>> {
        let data = self.transport.get("/v1/api-keys", None).await?;
        Ok(mapping::list(&data, ApiKey::from_value))
    }

    pub async fn create(&self, request: &CreateApiKey) -> Result<ApiKeyWithSecret> {
        let body = serde_json::to_value(request)?;
        let data = self.transport.post("/v1/api-keys", Some(body), None).await?;
        Ok(ApiKeyWithSecret::from_value(&data))
    }

    /// Replace a key's secret. The old secret stops working immediately.
    pub async fn rotate(&self, key_id: &str) -> Result<ApiKeyWithSecret> {
        let data = self
            .transport
            .post(&format!("/v1/api-keys/{key_id}/rotate"), None, None)
            .await?;
        Ok(ApiKeyWithSecret::from_value(&data))
    }

    pub async fn revoke(&self, key_id: &str) -> Result<()> {
        self.transport
            .delete(&format!("/v1/api-keys/{key_id}"))
            .await?;
        Ok(())
    }
}
