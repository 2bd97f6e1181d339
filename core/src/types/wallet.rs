//! Wallet balance, transaction and spending-limit records.

use serde::Serialize;
use serde_json::Value;

use crate::mapping::{Fields, JsonObject};

/// Default per-call cap in atomic USDC units when the server omits it.
pub const DEFAULT_MAX_PER_CALL_ATOMIC: i64 = 5_000_000;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WalletBalance {
    pub balance_cents: i64,
    pub balance_dollars: f64,
    pub lifetime_spent_cents: i64,
    pub lifetime_deposited_cents: i64,
}

impl WalletBalance {
    pub fn from_value(value: &Value) -> Self {
        let f = Fields::new(value);
        Self {
            balance_cents: f.i64_or("balance_cents", 0),
            balance_dollars: f.f64_or("balance_dollars", 0.0),
            lifetime_spent_cents: f.i64_or("lifetime_spent_cents", 0),
            lifetime_deposited_cents: f.i64_or("lifetime_deposited_cents", 0),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WalletTransaction {
    pub id: String,
    /// Transaction kind as reported by the server (`type` on the wire).
    #[serde(rename = "type")]
    pub kind: String,
    pub amount_cents: i64,
    pub balance_after_cents: i64,
    pub reference_id: Option<String>,
    pub metadata: JsonObject,
    pub created_at: Option<String>,
}

impl WalletTransaction {
    pub fn from_value(value: &Value) -> Self {
        let f = Fields::new(value);
        Self {
            id: f.string("id"),
            kind: f.string("type"),
            amount_cents: f.i64_or("amount_cents", 0),
            balance_after_cents: f.i64_or("balance_after_cents", 0),
            reference_id: f.opt_str("reference_id"),
            metadata: f.object("metadata"),
            created_at: f.opt_str("created_at"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SpendingLimits {
    pub id: String,
    pub user_id: String,
    pub max_per_call_atomic: i64,
    /// `None` means no daily limit.
    pub daily_limit_atomic: Option<i64>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

impl SpendingLimits {
    pub fn from_value(value: &Value) -> Self {
        let f = Fields::new(value);
        Self {
            id: f.string("id"),
            user_id: f.string("user_id"),
            max_per_call_atomic: f.i64_or("max_per_call_atomic", DEFAULT_MAX_PER_CALL_ATOMIC),
            daily_limit_atomic: f.opt_i64("daily_limit_atomic"),
            created_at: f.opt_str("created_at"),
            updated_at: f.opt_str("updated_at"),
        }
    }
}

/// Partial update of spending limits.
///
/// `daily_limit_atomic` is tri-state: `None` leaves it unchanged,
/// `Some(None)` clears the limit, `Some(Some(n))` sets it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct UpdateSpendingLimits {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_per_call_atomic: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub daily_limit_atomic: Option<Option<i64>>,
}
