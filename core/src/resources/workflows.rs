//! Workflow catalog, execution and authoring.

use std::sync::Arc;

use serde_json::json;

use crate::error::Result;
use crate::http::QueryParams;
use crate::mapping::{self, JsonObject};
use crate::transport::Transport;
use crate::types::{
    CreateWorkflowRequest, UpdateWorkflowRequest, Workflow, WorkflowDetail, WorkflowExecution,
};

#[derive(Debug, Clone)]
pub struct WorkflowsApi {
    transport: Arc<Transport>,
}

impl WorkflowsApi {
    pub(crate) fn new(transport: Arc<Transport>) -> Self {
        Self { transport }
    }

    /// List public workflows.
    pub async fn list(&self, query: Option<&str>, limit: Option<u32>) -> Result<Vec<Workflow>> {
        let params = QueryParams::new()
            .param("limit", limit.unwrap_or(10))
            .param_opt("query", query.filter(|q| !q.is_empty()));
        let data = self.transport.get("/v1/workflows/public", Some(params)).await?;
        Ok(mapping::list(&data, Workflow::from_value))
    }

    pub async fn get(&self, workflow_id: &str) -> Result<WorkflowDetail> {
        let data = self
            .transport
            .get(&format!("/v1/workflows/{workflow_id}"), None)
            .await?;
        Ok(WorkflowDetail::from_value(&data))
    }

    pub async fn execute(
        &self,
        workflow_id: &str,
        inputs: JsonObject,
    ) -> Result<WorkflowExecution> {
        let data = self
            .transport
            .post(
                &format!("/v1/workflows/{workflow_id}/execute"),
                Some(json!({ "inputs": inputs })),
                None,
            )
            .await?;
        Ok(WorkflowExecution::from_value(&data))
    }

    pub async fn get_execution(&self, execution_id: &str) -> Result<WorkflowExecution> {
        let data = self
            .transport
            .get(&format!("/v1/workflows/executions/{execution_id}"), None)
            .await?;
        Ok(WorkflowExecution::from_value(&data))
    }

    pub async fn create(&self, request: &CreateWorkflowRequest) -> Result<WorkflowDetail> {
        let body = serde_json::to_value(request)?;
        let data = self.transport.post("/v1/workflows", Some(body), None).await?;
        Ok(WorkflowDetail::from_value(&data))
    }

    pub async fn update(
        &self,
        workflow_id: &str,
        request: &UpdateWorkflowRequest,
    ) -> Result<WorkflowDetail> {
        let body = serde_json::to_value(request)?;
        let data = self
            .transport
            .patch(&format!("/v1/workflows/{workflow_id}"), Some(body))
            .await?;
        Ok(WorkflowDetail::from_value(&data))
    }

    pub async fn delete(&self, workflow_id: &str) -> Result<()> {
        self.transport
            .delete(&format!("/v1/workflows/{workflow_id}"))
            .await?;
        Ok(())
    }
}
