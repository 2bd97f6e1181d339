//! Tool records and batch execution DTOs.

use serde::Serialize;
use serde_json::Value;

use crate::mapping::{Fields, JsonObject};

/// A callable tool exposed by a service.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Tool {
    pub id: String,
    pub name: String,
    pub description: String,
    pub service_id: String,
    /// JSON schema of the tool's parameters.
    pub parameters: JsonObject,
    pub is_paid: bool,
    pub price_per_call_cents: Option<i64>,
    pub tags: Vec<String>,
    pub method: String,
    pub tips: Option<String>,
    pub metadata: JsonObject,
}

impl Tool {
    pub fn from_value(value: &Value) -> Self {
        let f = Fields::new(value);
        Self {
            id: f.string("id"),
            name: f.string("name"),
            description: f.string("description"),
            service_id: f.string("service_id"),
            parameters: f.object("parameters"),
            is_paid: f.bool_or("is_paid", false),
            price_per_call_cents: f.opt_i64("price_per_call_cents"),
            tags: f.strings("tags"),
            method: f.string("method"),
            tips: f.opt_str("tips"),
            metadata: f.object("metadata"),
        }
    }
}

/// Outcome of a single tool call.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ToolResult {
    pub success: bool,
    pub result: Option<Value>,
    pub error: Option<String>,
    pub tool_id: Option<String>,
    pub tool_name: Option<String>,
    pub duration_ms: Option<f64>,
    pub request_id: Option<String>,
}

impl ToolResult {
    /// Accepts both snake_case and camelCase keys; `success` falls back to
    /// `status == "success"`.
    pub fn from_value(value: &Value) -> Self {
        let f = Fields::new(value);
        let success = match f.get("success").and_then(Value::as_bool) {
            Some(success) => success,
            None => f.opt_str("status").as_deref() == Some("success"),
        };
        let text = |keys: &[&str]| f.first(keys).and_then(Value::as_str).map(str::to_string);
        Self {
            success,
            result: f.raw("result"),
            error: f.opt_str("error"),
            tool_id: text(&["tool_id", "toolId"]),
            tool_name: text(&["tool_name", "toolName"]),
            duration_ms: f.first(&["duration_ms", "durationMs"]).and_then(Value::as_f64),
            request_id: text(&["request_id", "requestId"]),
        }
    }
}

/// One entry of a batch execution request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchToolCall {
    pub tool_id: String,
    pub tool_input: JsonObject,
}

impl BatchToolCall {
    pub fn new(tool_id: impl Into<String>) -> Self {
        Self {
            tool_id: tool_id.into(),
            tool_input: JsonObject::new(),
        }
    }

    pub fn with_input(mut self, tool_input: JsonObject) -> Self {
        self.tool_input = tool_input;
        self
    }
}

/// Per-call outcome of a batch execution.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchToolResult {
    pub tool_id: String,
    pub success: bool,
    pub result: Option<Value>,
    pub error: Option<String>,
}

impl BatchToolResult {
    pub fn from_value(value: &Value) -> Self {
        let f = Fields::new(value);
        Self {
            tool_id: f.string("tool_id"),
            success: f.bool_or("success", false),
            result: f.raw("result"),
            error: f.opt_str("error"),
        }
    }
}
