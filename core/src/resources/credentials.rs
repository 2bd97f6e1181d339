//! Service credential storage.

use std::sync::Arc;

use serde::Serialize;

use crate::error::Result;
use crate::transport::Transport;
use crate::types::CredentialStoreResult;

/// A credential to store for one service.
#[derive(Debug, Clone, Serialize)]
pub struct StoreCredential {
    pub service_id: String,
    pub credential_type: String,
    pub credential_value: String,
}

#[derive(Debug, Clone)]
pub struct CredentialsApi {
    transport: Arc<Transport>,
}

impl CredentialsApi {
    pub(crate) fn new(transport: Arc<Transport>) -> Self {
        Self { transport }
    }

    pub async fn store(&self, request: &StoreCredential) -> Result<CredentialStoreResult> {
        let body = serde_json::to_value(request)?;
        let data = self
            .transport
            .post("/v1/credentials/store", Some(body), None)
            .await?;
        Ok(CredentialStoreResult::from_value(&data))
    }
}
