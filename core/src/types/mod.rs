//! Typed records for every API area.
//!
//! # Design
//! Each record has a pure `from_value` constructor that reads an untyped JSON
//! document through [`crate::mapping::Fields`], so absent or `null` server
//! fields fall back to a fixed default instead of failing the call. That is
//! the only parsing path: records derive `Serialize` but not `Deserialize`,
//! and their serialized form reads back through `from_value` unchanged.
//! Request payloads are plain `Serialize` structs whose field names already
//! match the wire format.

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

pub use agents::{AgentFundResult, AgentInfo, AgentRegistration};
pub use api_keys::{ApiKey, ApiKeyPermissions, ApiKeyWithSecret};
pub use credentials::CredentialStoreResult;
pub use identity::{Contact, Identity};
pub use ratings::{RatingAggregate, ToolRating};
pub use services::{Service, ServiceToolsResult, ServiceType};
pub use sites::{AgentSite, AgentSiteListItem, SiteComponents};
pub use skills::{Skill, SkillContent, SkillFile};
pub use tools::{BatchToolCall, BatchToolResult, Tool, ToolResult};
pub use wallet::{SpendingLimits, UpdateSpendingLimits, WalletBalance, WalletTransaction};
pub use webhooks::{Webhook, WebhookDelivery, WebhookWithSecret};
pub use workflows::{
    CreateWorkflowRequest, UpdateWorkflowRequest, Workflow, WorkflowDetail, WorkflowExecution,
    WorkflowStep, WorkflowStepResult,
};
