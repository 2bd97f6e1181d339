//! Skill search and retrieval.

use std::sync::Arc;

use crate::error::{Error, Result};
use crate::http::QueryParams;
use crate::mapping;
use crate::resources::{non_empty, pick_by_name, RESOLVE_SEARCH_LIMIT};
use crate::transport::Transport;
use crate::types::{Skill, SkillContent};

const DEFAULT_SEARCH_LIMIT: u32 = 10;

/// Which skill to fetch. An id wins over a name.
#[derive(Debug, Clone, Default)]
pub struct GetSkill {
    pub skill_id: Option<String>,
    pub skill_name: Option<String>,
}

impl GetSkill {
    pub fn by_id(skill_id: impl Into<String>) -> Self {
        Self {
            skill_id: Some(skill_id.into()),
            skill_name: None,
        }
    }

    pub fn by_name(skill_name: impl Into<String>) -> Self {
        Self {
            skill_id: None,
            skill_name: Some(skill_name.into()),
        }
    }
}

#[derive(Debug, Clone)]
pub struct SkillsApi {
    transport: Arc<Transport>,
}

impl SkillsApi {
    pub(crate) fn new(transport: Arc<Transport>) -> Self {
        Self { transport }
    }

    pub async fn search(&self, query: &str, limit: Option<u32>) -> Result<Vec<Skill>> {
        let params = QueryParams::new()
            .param("query", query)
            .param("limit", limit.unwrap_or(DEFAULT_SEARCH_LIMIT));
        let data = self.transport.get("/v1/skills/search", Some(params)).await?;
        Ok(mapping::list(&data, Skill::from_value))
    }

    pub async fn get(&self, request: GetSkill) -> Result<SkillContent> {
        let skill_id = match (
            non_empty(request.skill_id.as_deref()),
            non_empty(request.skill_name.as_deref()),
        ) {
            (Some(id), _) => id.to_string(),
            (None, Some(name)) => {
                let hits = self.search(name, Some(RESOLVE_SEARCH_LIMIT)).await?;
                pick_by_name(hits, name, |s| s.name.as_str())
                    .map(|skill| skill.id)
                    .ok_or_else(|| Error::SkillNotFound {
                        name: name.to_string(),
                    })?
            }
            (None, None) => {
                return Err(Error::MissingArgument {
                    expected: "skill_id or skill_name",
                })
            }
        };
        let data = self
            .transport
            .get(&format!("/v1/skills/{skill_id}"), None)
            .await?;
        Ok(SkillContent::from_value(&data))
    }
}
