//! Autonomous agent registration and funding records.

use serde::Serialize;
use serde_json::Value;

use crate::mapping::{Fields, JsonObject};

/// Returned once by registration; `api_key` is not shown again.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AgentRegistration {
    pub agent_id: String,
    pub api_key: String,
    pub wallet_id: String,
    pub balance_usdc: String,
    pub deposit_address: Option<String>,
    pub registration_url: String,
}

impl AgentRegistration {
    pub fn from_value(value: &Value) -> Self {
        let f = Fields::new(value);
        Self {
            agent_id: f.string("agent_id"),
            api_key: f.string("api_key"),
            wallet_id: f.string("wallet_id"),
            balance_usdc: f.str_or("balance_usdc", "0"),
            deposit_address: f.opt_str("deposit_address"),
            registration_url: f.string("registration_url"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AgentInfo {
    pub agent_id: String,
    pub name: String,
    pub agent_type: String,
    pub operator_email: Option<String>,
    pub wallet: Option<JsonObject>,
    pub deposit_address: Option<String>,
    pub registration_url: String,
    pub created_at: String,
}

impl AgentInfo {
    pub fn from_value(value: &Value) -> Self {
        let f = Fields::new(value);
        Self {
            agent_id: f.string("agent_id"),
            name: f.string("name"),
            agent_type: f.string("agent_type"),
            operator_email: f.opt_str("operator_email"),
            wallet: f.opt_object("wallet"),
            deposit_address: f.opt_str("deposit_address"),
            registration_url: f.string("registration_url"),
            created_at: f.string("created_at"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AgentFundResult {
    pub wallet_id: String,
    pub method: String,
    pub checkout_url: Option<String>,
    pub deposit_address: Option<String>,
    pub network: Option<String>,
    pub usdc_contract: Option<String>,
    pub balance_usdc: String,
}

impl AgentFundResult {
    pub fn from_value(value: &Value) -> Self {
        let f = Fields::new(value);
        Self {
            wallet_id: f.string("wallet_id"),
            method: f.string("method"),
            checkout_url: f.opt_str("checkout_url"),
            deposit_address: f.opt_str("deposit_address"),
            network: f.opt_str("network"),
            usdc_contract: f.opt_str("usdc_contract"),
            balance_usdc: f.str_or("balance_usdc", "0"),
        }
    }
}
