//! Skill records.

use serde::Serialize;
use serde_json::Value;

use crate::mapping::{Fields, JsonObject};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Skill {
    pub id: String,
    pub name: String,
    pub description: String,
    pub service_id: Option<String>,
    pub metadata: JsonObject,
}

impl Skill {
    pub fn from_value(value: &Value) -> Self {
        let f = Fields::new(value);
        Self {
            id: f.string("id"),
            name: f.string("name"),
            description: f.string("description"),
            service_id: f.opt_str("service_id"),
            metadata: f.object("metadata"),
        }
    }
}

/// A file bundled with a skill.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkillFile {
    pub name: String,
    pub content: String,
    pub content_type: Option<String>,
}

impl SkillFile {
    pub fn from_value(value: &Value) -> Self {
        let f = Fields::new(value);
        Self {
            name: f.string("name"),
            content: f.string("content"),
            content_type: f.opt_str("content_type"),
        }
    }
}

/// Full skill package: instructions plus bundled files.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkillContent {
    pub id: String,
    pub name: String,
    pub description: String,
    pub skill_md: String,
    pub scripts: Vec<SkillFile>,
    pub references: Vec<SkillFile>,
    pub assets: Vec<SkillFile>,
    pub license: Option<String>,
    pub compatibility: Option<String>,
    pub metadata: JsonObject,
    pub service_id: Option<String>,
}

impl SkillContent {
    pub fn from_value(value: &Value) -> Self {
        let f = Fields::new(value);
        Self {
            id: f.string("id"),
            name: f.string("name"),
            description: f.string("description"),
            skill_md: f
                .first(&["skill_md", "skill_md_content"])
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string(),
            scripts: f.records("scripts", SkillFile::from_value),
            references: f.records("references", SkillFile::from_value),
            assets: f.records("assets", SkillFile::from_value),
            license: f.opt_str("license"),
            compatibility: f.opt_str("compatibility"),
            metadata: f.object("metadata"),
            service_id: f.opt_str("service_id"),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn skill_md_falls_back_to_legacy_key() {
        let content =
            SkillContent::from_value(&json!({"id": "sk1", "skill_md_content": "# Legacy"}));
        assert_eq!(content.skill_md, "# Legacy");
        let content = SkillContent::from_value(&json!({
            "skill_md": "# New",
            "skill_md_content": "# Legacy"
        }));
        assert_eq!(content.skill_md, "# New");
    }

    #[test]
    fn bundled_files_are_mapped() {
        let content = SkillContent::from_value(&json!({
            "id": "sk1",
            "name": "pdf",
            "scripts": [{
                "name": "extract.py",
                "content": "print()",
                "content_type": "text/x-python"
            }],
            "references": "not a list"
        }));
        assert_eq!(content.scripts.len(), 1);
        assert_eq!(content.scripts[0].content_type.as_deref(), Some("text/x-python"));
        assert!(content.references.is_empty());
        assert!(content.assets.is_empty());
    }
}
