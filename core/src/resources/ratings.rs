//! Tool ratings.

use std::sync::Arc;

use serde_json::json;

use crate::error::Result;
use crate::mapping::Fields;
use crate::transport::Transport;
use crate::types::{RatingAggregate, ToolRating};

#[derive(Debug, Clone)]
pub struct RatingsApi {
    transport: Arc<Transport>,
}

impl RatingsApi {
    pub(crate) fn new(transport: Arc<Transport>) -> Self {
        Self { transport }
    }

    pub async fn submit(
        &self,
        tool_id: &str,
        rating: i64,
        comment: Option<&str>,
    ) -> Result<ToolRating> {
        let mut body = json!({ "tool_id": tool_id, "rating": rating });
        if let Some(comment) = comment {
            body["comment"] = json!(comment);
        }
        let data = self.transport.post("/v1/ratings", Some(body), None).await?;
        Ok(ToolRating::from_value(&data))
    }

    /// The caller's own rating of a tool, or `None` if they have not rated it.
    pub async fn get_mine(&self, tool_id: &str) -> Result<Option<ToolRating>> {
        let data = self
            .transport
            .get(&format!("/v1/ratings/my/{tool_id}"), None)
            .await?;
        if Fields::new(&data).get("rating").is_none() {
            return Ok(None);
        }
        Ok(Some(ToolRating::from_value(&data)))
    }

    pub async fn get_tool_ratings(&self, tool_id: &str) -> Result<RatingAggregate> {
        let data = self
            .transport
            .get(&format!("/v1/ratings/tool/{tool_id}"), None)
            .await?;
        Ok(RatingAggregate::from_value(&data))
    }
}
