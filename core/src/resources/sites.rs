//! Agent-readable site directory.

use std::sync::Arc;

use crate::error::Result;
use crate::http::QueryParams;
use crate::mapping;
use crate::transport::Transport;
use crate::types::{AgentSite, AgentSiteListItem};

/// Optional filters for [`SitesApi::search`].
#[derive(Debug, Clone, Default)]
pub struct SiteSearch {
    pub query: Option<String>,
    pub category: Option<String>,
    pub limit: Option<u32>,
}

#[derive(Debug, Clone)]
pub struct SitesApi {
    transport: Arc<Transport>,
}

impl SitesApi {
    pub(crate) fn new(transport: Arc<Transport>) -> Self {
        Self { transport }
    }

    pub async fn search(&self, options: SiteSearch) -> Result<Vec<AgentSiteListItem>> {
        let params = QueryParams::new()
            .param("limit", options.limit.unwrap_or(10))
            .param_opt("query", options.query.filter(|q| !q.is_empty()))
            .param_opt("category", options.category.filter(|c| !c.is_empty()));
        let data = self
            .transport
            .get("/v1/agent-sites/search", Some(params))
            .await?;
        Ok(mapping::list(&data, AgentSiteListItem::from_value))
    }

    pub async fn get(&self, site_id: &str) -> Result<AgentSite> {
        let data = self
            .transport
            .get(&format!("/v1/agent-sites/{site_id}"), None)
            .await?;
        Ok(AgentSite::from_value(&data))
    }

    pub async fn get_by_domain(&self, domain: &str) -> Result<AgentSite> {
        let path = format!("/v1/agent-sites/domain/{}", urlencoding::encode(domain));
        let data = self.transport.get(&path, None).await?;
        Ok(AgentSite::from_value(&data))
    }
}
