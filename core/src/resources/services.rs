//! Service catalog.

use std::sync::Arc;

use crate::error::Result;
use crate::http::QueryParams;
use crate::mapping;
use crate::transport::Transport;
use crate::types::{Service, ServiceToolsResult};

#[derive(Debug, Clone)]
pub struct ServicesApi {
    transport: Arc<Transport>,
}

impl ServicesApi {
    pub(crate) fn new(transport: Arc<Transport>) -> Self {
        Self { transport }
    }

    /// List public services, optionally filtered by a text query.
    pub async fn list(&self, query: Option<&str>, limit: Option<u32>) -> Result<Vec<Service>> {
        let params = QueryParams::new()
            .param("limit", limit.unwrap_or(10))
            .param_opt("query", query.filter(|q| !q.is_empty()));
        let data = self.transport.get("/v1/services/public", Some(params)).await?;
        Ok(mapping::list(&data, Service::from_value))
    }

    pub async fn get(&self, service_id: &str) -> Result<Service> {
        let data = self
            .transport
            .get(&format!("/v1/services/public/{service_id}"), None)
            .await?;
        Ok(Service::from_value(&data))
    }

    pub async fn get_tools(
        &self,
        service_id: &str,
        limit: Option<u32>,
    ) -> Result<ServiceToolsResult> {
        let params = QueryParams::new().param("limit", limit.unwrap_or(50));
        let data = self
            .transport
            .get(&format!("/v1/services/{service_id}/tools"), Some(params))
            .await?;
        Ok(ServiceToolsResult::from_value(&data))
    }
}
