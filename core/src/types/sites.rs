//! Agent site records.

use serde::Serialize;
use serde_json::Value;

use crate::mapping::{Fields, JsonObject};

/// Structured sections extracted from a site. Every section is optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SiteComponents {
    pub contact: Option<JsonObject>,
    pub about: Option<JsonObject>,
    pub services: Option<Vec<JsonObject>>,
    pub docs: Option<JsonObject>,
    pub pricing: Option<JsonObject>,
    pub faq: Option<Vec<JsonObject>>,
    pub legal: Option<JsonObject>,
    pub navigation: Option<Vec<JsonObject>>,
    pub identity: Option<JsonObject>,
    pub products: Option<Vec<JsonObject>>,
    pub team: Option<Vec<JsonObject>>,
    pub blog: Option<Vec<JsonObject>>,
    pub jobs: Option<Vec<JsonObject>>,
}

impl SiteComponents {
    pub fn from_value(value: &Value) -> Self {
        let f = Fields::new(value);
        Self {
            contact: f.opt_object("contact"),
            about: f.opt_object("about"),
            services: f.opt_objects("services"),
            docs: f.opt_object("docs"),
            pricing: f.opt_object("pricing"),
            faq: f.opt_objects("faq"),
            legal: f.opt_object("legal"),
            navigation: f.opt_objects("navigation"),
            identity: f.opt_object("identity"),
            products: f.opt_objects("products"),
            team: f.opt_objects("team"),
            blog: f.opt_objects("blog"),
            jobs: f.opt_objects("jobs"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AgentSite {
    pub id: String,
    pub domain: String,
    pub url: String,
    pub status: String,
    pub page_title: Option<String>,
    pub page_description: Option<String>,
    pub favicon_url: Option<String>,
    pub components: SiteComponents,
    pub discovered_tools: Vec<JsonObject>,
    pub category: Option<String>,
    pub tags: Vec<String>,
    pub service_id: Option<String>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

impl AgentSite {
    pub fn from_value(value: &Value) -> Self {
        let f = Fields::new(value);
        Self {
            id: f.string("id"),
            domain: f.string("domain"),
            url: f.string("url"),
            status: f.string("status"),
            page_title: f.opt_str("page_title"),
            page_description: f.opt_str("page_description"),
            favicon_url: f.opt_str("favicon_url"),
            components: f
                .get("components")
                .map(SiteComponents::from_value)
                .unwrap_or_default(),
            discovered_tools: f.opt_objects("discovered_tools").unwrap_or_default(),
            category: f.opt_str("category"),
            tags: f.strings("tags"),
            service_id: f.opt_str("service_id"),
            created_at: f.opt_str("created_at"),
            updated_at: f.opt_str("updated_at"),
        }
    }
}

/// Search hit for an agent site.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AgentSiteListItem {
    pub id: String,
    pub domain: String,
    pub page_title: Option<String>,
    pub page_description: Option<String>,
    pub favicon_url: Option<String>,
    pub category: Option<String>,
    pub component_count: i64,
    pub tool_count: i64,
    pub status: String,
}

impl AgentSiteListItem {
    pub fn from_value(value: &Value) -> Self {
        let f = Fields::new(value);
        Self {
            id: f.string("id"),
            domain: f.string("domain"),
            page_title: f.opt_str("page_title"),
            page_description: f.opt_str("page_description"),
            favicon_url: f.opt_str("favicon_url"),
            category: f.opt_str("category"),
            component_count: f.i64_or("component_count", 0),
            tool_count: f.i64_or("tool_count", 0),
            status: f.string("status"),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn missing_components_are_empty() {
        let site = AgentSite::from_value(&json!({
            "id": "s1",
            "domain": "example.com",
            "components": null
        }));
        assert_eq!(site.components, SiteComponents::default());
        assert!(site.discovered_tools.is_empty());
    }

    #[test]
    fn components_keep_present_sections() {
        let site = AgentSite::from_value(&json!({
            "id": "s1",
            "domain": "example.com",
            "components": {
                "contact": {"email": "hi@example.com"},
                "faq": [{"q": "Why?", "a": "Because."}]
            },
            "discovered_tools": [{"name": "book_table"}]
        }));
        assert_eq!(site.components.contact.unwrap()["email"], "hi@example.com");
        assert_eq!(site.components.faq.unwrap().len(), 1);
        assert!(site.components.pricing.is_none());
        assert_eq!(site.discovered_tools[0]["name"], "book_table");
    }

    #[test]
    fn list_item_counts_default_to_zero() {
        let item = AgentSiteListItem::from_value(&json!({"id": "s1", "domain": "example.com"}));
        assert_eq!(item.component_count, 0);
        assert_eq!(item.tool_count, 0);
        assert_eq!(item.status, "");
    }
}
