//! Service records.

use serde::Serialize;
use serde_json::Value;

use crate::mapping::{Fields, JsonObject};
use crate::types::tools::Tool;

/// How a service is hosted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ServiceType {
    McpServer,
    Api,
    Internal,
    Website,
    /// A type this client does not know yet.
    #[serde(untagged)]
    Other(String),
}

impl ServiceType {
    fn parse(raw: &str) -> Self {
        match raw {
            "mcp_server" => ServiceType::McpServer,
            "api" => ServiceType::Api,
            "internal" => ServiceType::Internal,
            "website" => ServiceType::Website,
            other => ServiceType::Other(other.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Service {
    pub id: String,
    pub name: String,
    pub description: String,
    pub summary: String,
    pub version: String,
    pub service_type: ServiceType,
    pub url: Option<String>,
    pub is_connected: bool,
    pub tool_count: i64,
    pub is_verified: bool,
    pub visibility: String,
    pub category: Option<String>,
    pub verification_tier: String,
    pub logo: String,
    pub documentation_url: Option<String>,
    pub requires_credentials: bool,
}

impl Service {
    pub fn from_value(value: &Value) -> Self {
        let f = Fields::new(value);
        Self {
            id: f.string("id"),
            name: f.string("name"),
            description: f.string("description"),
            summary: f.string("summary"),
            version: f.string("version"),
            service_type: ServiceType::parse(&f.str_or("service_type", "api")),
            url: f.opt_str("url"),
            is_connected: f.bool_or("is_connected", false),
            tool_count: f.i64_or("tool_count", 0),
            is_verified: f.bool_or("is_verified", false),
            visibility: f.str_or("visibility", "public"),
            category: f.opt_str("category"),
            verification_tier: f.str_or("verification_tier", "unverified"),
            logo: f.string("logo"),
            documentation_url: f.opt_str("documentation_url"),
            requires_credentials: f.bool_or("requires_credentials", false),
        }
    }
}

/// Tools of one service, or the reason they could not be listed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ServiceToolsResult {
    pub tools: Vec<Tool>,
    pub needs_configuration: bool,
    pub skipped: bool,
    pub configuration_required: Option<JsonObject>,
}

impl ServiceToolsResult {
    pub fn from_value(value: &Value) -> Self {
        let f = Fields::new(value);
        Self {
            tools: f.records("tools", Tool::from_value),
            needs_configuration: f.bool_or("needs_configuration", false),
            skipped: f.bool_or("skipped", false),
            configuration_required: f.opt_object("configuration_required"),
        }
    }
}
