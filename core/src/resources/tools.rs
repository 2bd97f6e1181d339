//! Tool search, lookup and execution.

use std::sync::Arc;

use serde_json::json;
use tracing::debug;
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::http::QueryParams;
use crate::mapping::{self, Fields, JsonObject};
use crate::resources::{non_empty, pick_by_name, RESOLVE_SEARCH_LIMIT};
use crate::transport::Transport;
use crate::types::{BatchToolCall, BatchToolResult, Tool, ToolResult};

/// Largest batch the platform accepts in one call.
pub const MAX_BATCH_CALLS: usize = 10;

const DEFAULT_SEARCH_LIMIT: u32 = 10;

/// Optional filters for [`ToolsApi::search`].
#[derive(Debug, Clone, Default)]
pub struct ToolSearch {
    pub service_id: Option<String>,
    pub limit: Option<u32>,
}

/// Which tool to run and with what parameters. An id wins over a name.
#[derive(Debug, Clone, Default)]
pub struct ExecuteTool {
    pub tool_id: Option<String>,
    pub tool_name: Option<String>,
    pub parameters: JsonObject,
}

impl ExecuteTool {
    pub fn by_id(tool_id: impl Into<String>) -> Self {
        Self {
            tool_id: Some(tool_id.into()),
            ..Self::default()
        }
    }

    pub fn by_name(tool_name: impl Into<String>) -> Self {
        Self {
            tool_name: Some(tool_name.into()),
            ..Self::default()
        }
    }

    pub fn with_parameters(mut self, parameters: JsonObject) -> Self {
        self.parameters = parameters;
        self
    }
}

#[derive(Debug, Clone)]
pub struct ToolsApi {
    transport: Arc<Transport>,
}

impl ToolsApi {
    pub(crate) fn new(transport: Arc<Transport>) -> Self {
        Self { transport }
    }

    pub async fn search(&self, query: &str, options: ToolSearch) -> Result<Vec<Tool>> {
        let params = QueryParams::new()
            .param("query", query)
            .param("limit", options.limit.unwrap_or(DEFAULT_SEARCH_LIMIT))
            .param_opt("service_id", options.service_id.filter(|s| !s.is_empty()));
        let data = self.transport.get("/v1/tools/search", Some(params)).await?;
        Ok(mapping::list(&data, Tool::from_value))
    }

    pub async fn get(&self, tool_id: &str) -> Result<Tool> {
        let data = self.transport.get(&format!("/v1/tools/{tool_id}"), None).await?;
        Ok(Tool::from_value(&data))
    }

    /// Run a tool. A name is resolved through search first; an id that is
    /// not a UUID is treated as a name and resolved to the first hit.
    pub async fn execute(&self, request: ExecuteTool) -> Result<ToolResult> {
        let tool_id = match (
            non_empty(request.tool_id.as_deref()),
            non_empty(request.tool_name.as_deref()),
        ) {
            (Some(id), _) => id.to_string(),
            (None, Some(name)) => self.resolve_name(name).await?,
            (None, None) => {
                return Err(Error::MissingArgument {
                    expected: "tool_id or tool_name",
                })
            }
        };

        let mut tool_id = clean_tool_id(&tool_id).to_string();
        if !is_uuid(&tool_id) {
            debug!(tool_id = %tool_id, "tool id is not a UUID, searching by name");
            let hits = self.search(&tool_id, limited(RESOLVE_SEARCH_LIMIT)).await?;
            tool_id = match hits.into_iter().next() {
                Some(tool) => tool.id,
                None => return Err(Error::ToolNotFound { name: tool_id }),
            };
        }

        let body = json!({ "parameters": request.parameters });
        let data = self
            .transport
            .post(&format!("/v1/tools/call/{tool_id}"), Some(body), None)
            .await?;
        Ok(ToolResult::from_value(&data))
    }

    /// Run up to ten tool calls in one request. The size is checked before
    /// anything is sent.
    pub async fn batch_execute(&self, calls: &[BatchToolCall]) -> Result<Vec<BatchToolResult>> {
        if calls.is_empty() || calls.len() > MAX_BATCH_CALLS {
            return Err(Error::InvalidBatchSize { len: calls.len() });
        }
        let body = json!({ "calls": serde_json::to_value(calls)? });
        let data = self
            .transport
            .post("/v1/tools/call/batch", Some(body), None)
            .await?;
        Ok(Fields::new(&data).records("results", BatchToolResult::from_value))
    }

    async fn resolve_name(&self, name: &str) -> Result<String> {
        let hits = self.search(name, limited(RESOLVE_SEARCH_LIMIT)).await?;
        pick_by_name(hits, name, |t| t.name.as_str())
            .map(|tool| tool.id)
            .ok_or_else(|| Error::ToolNotFound {
                name: name.to_string(),
            })
    }
}

fn limited(limit: u32) -> ToolSearch {
    ToolSearch {
        service_id: None,
        limit: Some(limit),
    }
}

/// Trim whitespace and one layer of surrounding quotes.
fn clean_tool_id(raw: &str) -> &str {
    let trimmed = raw.trim();
    let trimmed = trimmed
        .strip_prefix(['"', '\''])
        .unwrap_or(trimmed);
    trimmed.strip_suffix(['"', '\'']).unwrap_or(trimmed)
}

/// Hyphenated UUID form only.
fn is_uuid(value: &str) -> bool {
    value.len() == 36 && Uuid::try_parse(value).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clean_strips_whitespace_and_quotes() {
        assert_eq!(clean_tool_id("  \"abc\" "), "abc");
        assert_eq!(clean_tool_id("'abc'"), "abc");
        assert_eq!(clean_tool_id("abc\""), "abc");
        assert_eq!(clean_tool_id("abc"), "abc");
    }

    #[test]
    fn uuid_check_requires_hyphenated_form() {
        assert!(is_uuid("5f0c6f1e-8d7a-4d7e-9a59-3f2b1c0d9e8f"));
        assert!(!is_uuid("5f0c6f1e8d7a4d7e9a593f2b1c0d9e8f"));
        assert!(!is_uuid("get_weather"));
    }

    #[test]
    fn execute_builders() {
        let request = ExecuteTool::by_name("Weather");
        assert!(request.tool_id.is_none());
        assert_eq!(request.tool_name.as_deref(), Some("Weather"));
        assert!(request.parameters.is_empty());
    }
}
