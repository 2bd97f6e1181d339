//! Webhook subscriptions and delivery history.

use std::sync::Arc;

use serde::Serialize;

use crate::error::Result;
use crate::http::QueryParams;
use crate::mapping;
use crate::transport::Transport;
use crate::types::{Webhook, WebhookDelivery, WebhookWithSecret};

#[derive(Debug, Clone, Serialize)]
pub struct CreateWebhook {
    pub url: String,
    pub events: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Partial update; only the fields that are set are sent.
#[derive(Debug, Clone, Default, Serialize)]
pub struct UpdateWebhook {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub events: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone)]
pub struct WebhooksApi {
    transport: Arc<Transport>,
}

impl WebhooksApi {
    pub(crate) fn new(transport: Arc<Transport>) -> Self {
        Self { transport }
    }

    pub async fn list(&self) -> Result<Vec<Webhook>> {
        let data = self.transport.get("/v1/webhooks", None).await?;
        Ok(mapping::list(&data, Webhook::from_value))
    }

    pub async fn create(&self, request: &CreateWebhook) -> Result<WebhookWithSecret> {
        let body = serde_json::to_value(request)?;
        let data = self.transport.post("/v1/webhooks", Some(body), None).await?;
        Ok(WebhookWithSecret::from_value(&data))
    }

    pub async fn update(&self, webhook_id: &str, request: &UpdateWebhook) -> Result<Webhook> {
        let body = serde_json::to_value(request)?;
        let data = self
            .transport
            .patch(&format!("/v1/webhooks/{webhook_id}"), Some(body))
            .await?;
        Ok(Webhook::from_value(&data))
    }

    pub async fn delete(&self, webhook_id: &str) -> Result<()> {
        self.transport
            .delete(&format!("/v1/webhooks/{webhook_id}"))
            .await?;
        Ok(())
    }

    pub async fn get_deliveries(
        &self,
        webhook_id: &str,
        limit: Option<u32>,
    ) -> Result<Vec<WebhookDelivery>> {
        let params = QueryParams::new().param_opt("limit", limit);
        let data = self
            .transport
            .get(&format!("/v1/webhooks/{webhook_id}/deliveries"), Some(params))
            .await?;
        Ok(mapping::list(&data, WebhookDelivery::from_value))
    }
}
