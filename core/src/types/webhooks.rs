//! Webhook subscription and delivery records.

use serde::Serialize;
use serde_json::Value;

use crate::mapping::{Fields, JsonObject};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Webhook {
    pub id: String,
    pub url: String,
    pub events: Vec<String>,
    pub is_active: bool,
    pub description: Option<String>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

impl Webhook {
    pub fn from_value(value: &Value) -> Self {
        let f = Fields::new(value);
        Self {
            id: f.string("id"),
            url: f.string("url"),
            events: f.strings("events"),
            is_active: f.bool_or("is_active", true),
            description: f.opt_str("description"),
            created_at: f.opt_str("created_at"),
            updated_at: f.opt_str("updated_at"),
        }
    }
}

/// A created webhook, including the signing secret shown only once.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WebhookWithSecret {
    #[serde(flatten)]
    pub webhook: Webhook,
    pub secret: String,
}

impl WebhookWithSecret {
    pub fn from_value(value: &Value) -> Self {
        Self {
            webhook: Webhook::from_value(value),
            secret: Fields::new(value).string("secret"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WebhookDelivery {
    pub id: String,
    pub webhook_id: String,
    pub event_type: String,
    pub payload: JsonObject,
    pub status: String,
    pub response_status: Option<i64>,
    pub response_body: Option<String>,
    pub attempts: i64,
    pub delivered_at: Option<String>,
    pub created_at: Option<String>,
}

impl WebhookDelivery {
    pub fn from_value(value: &Value) -> Self {
        let f = Fields::new(value);
        Self {
            id: f.string("id"),
            webhook_id: f.string("webhook_id"),
            event_type: f.string("event_type"),
            payload: f.object("payload"),
            status: f.string("status"),
            response_status: f.opt_i64("response_status"),
            response_body: f.opt_str("response_body"),
            attempts: f.i64_or("attempts", 0),
            delivered_at: f.opt_str("delivered_at"),
            created_at: f.opt_str("created_at"),
        }
    }
}
