//! Wallet balance, history and spending limits.

use std::sync::Arc;

use crate::error::Result;
use crate::http::QueryParams;
use crate::mapping;
use crate::transport::Transport;
use crate::types::{SpendingLimits, UpdateSpendingLimits, WalletBalance, WalletTransaction};

#[derive(Debug, Clone)]
pub struct WalletApi {
    transport: Arc<Transport>,
}

impl WalletApi {
    pub(crate) fn new(transport: Arc<Transport>) -> Self {
        Self { transport }
    }

    pub async fn get_balance(&self) -> Result<WalletBalance> {
        let data = self.transport.get("/v1/wallet/balance", None).await?;
        Ok(WalletBalance::from_value(&data))
    }

    /// Page through transactions, newest first. Defaults: 50 per page from offset 0.
    pub async fn get_transactions(
        &self,
        limit: Option<u32>,
        offset: Option<u32>,
    ) -> Result<Vec<WalletTransaction>> {
        let params = QueryParams::new()
            .param("limit", limit.unwrap_or(50))
            .param("offset", offset.unwrap_or(0));
        let data = self
            .transport
            .get("/v1/wallet/transactions", Some(params))
            .await?;
        Ok(mapping::list(&data, WalletTransaction::from_value))
    }

    pub async fn get_spending_limits(&self) -> Result<SpendingLimits> {
        let data = self.transport.get("/v1/x402/settings", None).await?;
        Ok(SpendingLimits::from_value(&data))
    }

    pub async fn update_spending_limits(
        &self,
        update: &UpdateSpendingLimits,
    ) -> Result<SpendingLimits> {
        let body = serde_json::to_value(update)?;
        let data = self.transport.put("/v1/x402/settings", Some(body)).await?;
        Ok(SpendingLimits::from_value(&data))
    }
}
