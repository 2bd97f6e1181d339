//! Async client core for the Danube platform API.
//!
//! # Overview
//! All traffic goes through one [`Transport`]: it builds URLs, attaches the
//! `danube-api-key` credential, bounds each attempt with a timeout, retries
//! rate-limit and gateway failures with exponential backoff, and maps every
//! failure to an [`ApiError`]. The resource façades (tools, services,
//! workflows, sites, skills, identity, credentials, wallet, agents, ratings,
//! API keys, webhooks) are thin mappers on top of it. [`DanubeClient`] wires
//! them together.
//!
//! # Design
//! - Configuration is resolved once, as explicit option, then `DANUBE_*`
//!   environment variable, then default, and never changes afterwards.
//! - Responses are read as untyped JSON and mapped into records with
//!   per-field defaults (see [`mapping`]), so a sparse server response never
//!   fails a call.
//! - The library emits `tracing` events but never installs a subscriber.
//! - DTOs are defined independently from the mock-server crate; integration
//!   tests catch schema drift.

pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod mapping;
pub mod resources;
pub mod transport;
pub mod types;

pub use client::DanubeClient;
pub use config::{ClientOptions, Config};
pub use error::{ApiError, Error, Result};
pub use http::{HttpMethod, HttpResponse, QueryParams, RequestDescriptor};
pub use mapping::JsonObject;
pub use resources::agents::{FundWallet, RegisterAgent};
pub use resources::api_keys::CreateApiKey;
pub use resources::credentials::StoreCredential;
pub use resources::sites::SiteSearch;
pub use resources::skills::GetSkill;
pub use resources::tools::{ExecuteTool, ToolSearch};
pub use resources::webhooks::{CreateWebhook, UpdateWebhook};
pub use transport::{Backoff, Transport};
pub use types::*;
