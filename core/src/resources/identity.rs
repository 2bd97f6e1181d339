//! Caller identity.

use std::sync::Arc;

use crate::error::Result;
use crate::transport::Transport;
use crate::types::Identity;

#[derive(Debug, Clone)]
pub struct IdentityApi {
    transport: Arc<Transport>,
}

impl IdentityApi {
    pub(crate) fn new(transport: Arc<Transport>) -> Self {
        Self { transport }
    }

    pub async fn get(&self) -> Result<Identity> {
        let data = self.transport.get("/v1/identity/api", None).await?;
        Ok(Identity::from_value(&data))
    }
}
