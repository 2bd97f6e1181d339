//! Top-level entry point for the Danube API.
//!
//! # Design
//! `DanubeClient` owns one shared [`Transport`] and hands out the resource
//! façades. Each façade is built on first access and memoized, so repeated
//! calls to the same accessor return the same instance. Shutdown is explicit
//! through [`DanubeClient::close`]; dropping the client does not cancel
//! anything.

use std::sync::{Arc, OnceLock};

use tracing::debug;

use crate::config::{ClientOptions, Config};
use crate::error::Result;
use crate::resources::{
    AgentsApi, ApiKeysApi, CredentialsApi, IdentityApi, RatingsApi, ServicesApi, SitesApi,
    SkillsApi, ToolsApi, WalletApi, WebhooksApi, WorkflowsApi,
};
use crate::transport::Transport;

const HEALTH_PATH: &str = "/v1/health";

/// Async client for the Danube platform.
#[derive(Debug)]
pub struct DanubeClient {
    transport: Arc<Transport>,
    tools: OnceLock<ToolsApi>,
    services: OnceLock<ServicesApi>,
    workflows: OnceLock<WorkflowsApi>,
    sites: OnceLock<SitesApi>,
    skills: OnceLock<SkillsApi>,
    identity: OnceLock<IdentityApi>,
    credentials: OnceLock<CredentialsApi>,
    wallet: OnceLock<WalletApi>,
    agents: OnceLock<AgentsApi>,
    ratings: OnceLock<RatingsApi>,
    api_keys: OnceLock<ApiKeysApi>,
    webhooks: OnceLock<WebhooksApi>,
}

impl DanubeClient {
    /// Build a client, filling unset options from `DANUBE_*` environment
    /// variables and then the defaults.
    pub fn new(options: ClientOptions) -> Result<Self> {
        Self::with_config(Config::from_env(options))
    }

    pub fn with_config(config: Config) -> Result<Self> {
        Ok(Self::with_transport(Transport::new(config)?))
    }

    /// Wrap a transport that was configured by hand, e.g. with a custom
    /// [`Backoff`](crate::transport::Backoff).
    pub fn with_transport(transport: Transport) -> Self {
        debug!(base_url = transport.config().base_url(), "client created");
        Self {
            transport: Arc::new(transport),
            tools: OnceLock::new(),
            services: OnceLock::new(),
            workflows: OnceLock::new(),
            sites: OnceLock::new(),
            skills: OnceLock::new(),
            identity: OnceLock::new(),
            credentials: OnceLock::new(),
            wallet: OnceLock::new(),
            agents: OnceLock::new(),
            ratings: OnceLock::new(),
            api_keys: OnceLock::new(),
            webhooks: OnceLock::new(),
        }
    }

    pub fn config(&self) -> &Config {
        self.transport.config()
    }

    pub fn transport(&self) -> &Transport {
        &self.transport
    }

    pub fn tools(&self) -> &ToolsApi {
        self.tools.get_or_init(|| ToolsApi::new(self.shared()))
    }

    pub fn services(&self) -> &ServicesApi {
        self.services.get_or_init(|| ServicesApi::new(self.shared()))
    }

    pub fn workflows(&self) -> &WorkflowsApi {
        self.workflows.get_or_init(|| WorkflowsApi::new(self.shared()))
    }

    pub fn sites(&self) -> &SitesApi {
        self.sites.get_or_init(|| SitesApi::new(self.shared()))
    }

    pub fn skills(&self) -> &SkillsApi {
        self.skills.get_or_init(|| SkillsApi::new(self.shared()))
    }

    pub fn identity(&self) -> &IdentityApi {
        self.identity.get_or_init(|| IdentityApi::new(self.shared()))
    }

    pub fn credentials(&self) -> &CredentialsApi {
        self.credentials.get_or_init(|| CredentialsApi::new(self.shared()))
    }

    pub fn wallet(&self) -> &WalletApi {
        self.wallet.get_or_init(|| WalletApi::new(self.shared()))
    }

    pub fn agents(&self) -> &AgentsApi {
        self.agents.get_or_init(|| AgentsApi::new(self.shared()))
    }

    pub fn ratings(&self) -> &RatingsApi {
        self.ratings.get_or_init(|| RatingsApi::new(self.shared()))
    }

    pub fn api_keys(&self) -> &ApiKeysApi {
        self.api_keys.get_or_init(|| ApiKeysApi::new(self.shared()))
    }

    pub fn webhooks(&self) -> &WebhooksApi {
        self.webhooks.get_or_init(|| WebhooksApi::new(self.shared()))
    }

    /// Call the health endpoint. Any failure, whatever its kind, reads as
    /// "not reachable".
    pub async fn verify_connection(&self) -> bool {
        match self.transport.get(HEALTH_PATH, None).await {
            Ok(_) => true,
            Err(err) => {
                debug!(error = %err, "connection check failed");
                false
            }
        }
    }

    /// Cancel every call currently in flight. The client stays usable.
    pub fn close(&self) -> usize {
        self.transport.close()
    }

    fn shared(&self) -> Arc<Transport> {
        Arc::clone(&self.transport)
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    fn client() -> DanubeClient {
        let config = Config::new("http://127.0.0.1:9", "dk_test", Duration::from_secs(1), 0);
        DanubeClient::with_config(config).unwrap()
    }

    #[test]
    fn facades_are_memoized() {
        let client = client();
        assert!(std::ptr::eq(client.tools(), client.tools()));
        assert!(std::ptr::eq(client.webhooks(), client.webhooks()));
        assert!(std::ptr::eq(client.wallet(), client.wallet()));
    }

    #[test]
    fn config_is_exposed_unchanged() {
        let client = client();
        assert_eq!(client.config().base_url(), "http://127.0.0.1:9");
        assert_eq!(client.config().max_retries(), 0);
    }

    #[test]
    fn close_without_calls_cancels_nothing() {
        let client = client();
        assert_eq!(client.close(), 0);
        assert_eq!(client.transport().in_flight(), 0);
    }

    #[tokio::test]
    async fn unreachable_server_is_not_connected() {
        assert!(!client().verify_connection().await);
    }
}
