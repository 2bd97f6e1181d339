//! Autonomous agent registration and funding.

use std::sync::Arc;

use serde::Serialize;

use crate::error::Result;
use crate::transport::Transport;
use crate::types::{AgentFundResult, AgentInfo, AgentRegistration};

#[derive(Debug, Clone, Serialize)]
pub struct RegisterAgent {
    pub name: String,
    pub operator_email: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct FundWallet {
    /// Funding method, e.g. `"card"` or `"crypto"`.
    pub method: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount_cents: Option<i64>,
}

#[derive(Debug, Clone)]
pub struct AgentsApi {
    transport: Arc<Transport>,
}

impl AgentsApi {
    pub(crate) fn new(transport: Arc<Transport>) -> Self {
        Self { transport }
    }

    /// Bootstrap a new agent. This is the one call sent without a credential.
    pub async fn register(&self, request: &RegisterAgent) -> Result<AgentRegistration> {
        let body = serde_json::to_value(request)?;
        let data = self.transport.public_post("/v1/agents", Some(body)).await?;
        Ok(AgentRegistration::from_value(&data))
    }

    pub async fn get_info(&self) -> Result<AgentInfo> {
        let data = self.transport.get("/v1/agents/me", None).await?;
        Ok(AgentInfo::from_value(&data))
    }

    pub async fn fund_wallet(&self, request: &FundWallet) -> Result<AgentFundResult> {
        let body = serde_json::to_value(request)?;
        let data = self
            .transport
            .post("/v1/agents/wallets/fund", Some(body), None)
            .await?;
        Ok(AgentFundResult::from_value(&data))
    }
}
