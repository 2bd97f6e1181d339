//! Workflow records and create/update payloads.

use serde::Serialize;
use serde_json::Value;

use crate::mapping::{Fields, JsonObject};

/// One step of a workflow: a tool plus how its inputs are wired.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WorkflowStep {
    pub step_number: i64,
    pub tool_id: String,
    pub tool_name: String,
    pub description: String,
    pub input_mapping: JsonObject,
}

impl WorkflowStep {
    pub fn from_value(value: &Value) -> Self {
        let f = Fields::new(value);
        Self {
            step_number: f.i64_or("step_number", 0),
            tool_id: f.string("tool_id"),
            tool_name: f.string("tool_name"),
            description: f.string("description"),
            input_mapping: f.object("input_mapping"),
        }
    }
}

/// Workflow as listed publicly.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Workflow {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub step_count: i64,
    pub owner_id: String,
    pub visibility: String,
    pub tags: Vec<String>,
    pub total_executions: i64,
    pub success_rate: Option<f64>,
    pub created_at: Option<String>,
}

impl Workflow {
    pub fn from_value(value: &Value) -> Self {
        let f = Fields::new(value);
        Self {
            id: f.string("id"),
            name: f.string("name"),
            description: f.opt_str("description"),
            step_count: f.i64_or("step_count", 0),
            owner_id: f.string("owner_id"),
            visibility: f.str_or("visibility", "public"),
            tags: f.strings("tags"),
            total_executions: f.i64_or("total_executions", 0),
            success_rate: f.opt_f64("success_rate"),
            created_at: f.opt_str("created_at"),
        }
    }
}

/// Workflow with its steps.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WorkflowDetail {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub steps: Vec<WorkflowStep>,
    pub owner_id: String,
    pub visibility: String,
    pub tags: Vec<String>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

impl WorkflowDetail {
    pub fn from_value(value: &Value) -> Self {
        let f = Fields::new(value);
        Self {
            id: f.string("id"),
            name: f.string("name"),
            description: f.opt_str("description"),
            steps: f.records("steps", WorkflowStep::from_value),
            owner_id: f.string("owner_id"),
            visibility: f.str_or("visibility", "public"),
            tags: f.strings("tags"),
            created_at: f.opt_str("created_at"),
            updated_at: f.opt_str("updated_at"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WorkflowStepResult {
    pub step_number: i64,
    pub tool_id: String,
    pub tool_name: String,
    pub status: String,
    pub result: Option<Value>,
    pub error: Option<String>,
    pub execution_time_ms: Option<f64>,
}

impl WorkflowStepResult {
    pub fn from_value(value: &Value) -> Self {
        let f = Fields::new(value);
        Self {
            step_number: f.i64_or("step_number", 0),
            tool_id: f.string("tool_id"),
            tool_name: f.string("tool_name"),
            status: f.string("status"),
            result: f.raw("result"),
            error: f.opt_str("error"),
            execution_time_ms: f.opt_f64("execution_time_ms"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WorkflowExecution {
    pub id: String,
    pub workflow_id: String,
    pub user_id: String,
    pub status: String,
    pub inputs: JsonObject,
    pub step_results: Vec<WorkflowStepResult>,
    pub error: Option<String>,
    pub execution_time_ms: Option<f64>,
    pub started_at: Option<String>,
    pub completed_at: Option<String>,
    pub created_at: Option<String>,
}

impl WorkflowExecution {
    pub fn from_value(value: &Value) -> Self {
        let f = Fields::new(value);
        Self {
            id: f.string("id"),
            workflow_id: f.string("workflow_id"),
            user_id: f.string("user_id"),
            status: f.string("status"),
            inputs: f.object("inputs"),
            step_results: f.records("step_results", WorkflowStepResult::from_value),
            error: f.opt_str("error"),
            execution_time_ms: f.opt_f64("execution_time_ms"),
            started_at: f.opt_str("started_at"),
            completed_at: f.opt_str("completed_at"),
            created_at: f.opt_str("created_at"),
        }
    }
}

/// Payload for creating a workflow.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CreateWorkflowRequest {
    pub name: String,
    pub description: String,
    pub steps: Vec<WorkflowStep>,
    pub visibility: String,
    pub tags: Vec<String>,
}

impl CreateWorkflowRequest {
    pub fn new(name: impl Into<String>, steps: Vec<WorkflowStep>) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            steps,
            visibility: "private".to_string(),
            tags: Vec::new(),
        }
    }
}

/// Partial update; only the fields that are set are sent.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct UpdateWorkflowRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub steps: Option<Vec<WorkflowStep>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visibility: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
}
