//! One façade per API area.
//!
//! # Design
//! Façades are stateless: each holds a shared handle to the [`Transport`] and
//! turns a typed call into an endpoint path, query and JSON body, then maps
//! the JSON it gets back through the record constructors in [`crate::types`].
//! They never reinterpret transport errors. The only logic of their own is
//! resolve-by-name for tools and skills (see [`pick_by_name`]).
//!
//! [`Transport`]: crate::transport::Transport

pub mod agents;
pub mod api_keys;
pub mod credentials;
pub mod identity;
pub mod ratings;
pub mod services;
pub mod sites;
pub mod skills;
pub mod tools;
pub mod wallet;
pub mod webhooks;
pub mod workflows;

pub use agents::AgentsApi;
pub use api_keys::ApiKeysApi;
pub use credentials::CredentialsApi;
pub use identity::IdentityApi;
pub use ratings::RatingsApi;
pub use services::ServicesApi;
pub use sites::SitesApi;
pub use skills::SkillsApi;
pub use tools::ToolsApi;
pub use wallet::WalletApi;
pub use webhooks::WebhooksApi;
pub use workflows::WorkflowsApi;

/// Number of search hits considered when resolving a name.
pub(crate) const RESOLVE_SEARCH_LIMIT: u32 = 5;

/// Choose the search hit for `name`: a case-insensitive exact match wins
/// over result order, otherwise the first hit is taken.
pub fn pick_by_name<T>(candidates: Vec<T>, name: &str, name_of: impl Fn(&T) -> &str) -> Option<T> {
    let wanted = name.to_lowercase();
    let exact = candidates
        .iter()
        .position(|c| name_of(c).to_lowercase() == wanted);
    let index = exact.unwrap_or(0);
    candidates.into_iter().nth(index)
}

/// Treat empty strings like absent arguments.
pub(crate) fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}
