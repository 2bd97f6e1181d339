//! Tool rating records.

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::Value;

use crate::mapping::Fields;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ToolRating {
    pub tool_id: String,
    pub rating: i64,
    pub comment: Option<String>,
    pub created_at: Option<String>,
}

impl ToolRating {
    pub fn from_value(value: &Value) -> Self {
        let f = Fields::new(value);
        Self {
            tool_id: f.string("tool_id"),
            rating: f.i64_or("rating", 0),
            comment: f.opt_str("comment"),
            created_at: f.opt_str("created_at"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RatingAggregate {
    pub tool_id: String,
    pub average_rating: f64,
    pub total_ratings: i64,
    /// Count of ratings per star value, keyed by the star value as sent.
    pub rating_distribution: BTreeMap<String, i64>,
}

impl RatingAggregate {
    pub fn from_value(value: &Value) -> Self {
        let f = Fields::new(value);
        let rating_distribution = f
            .object("rating_distribution")
            .into_iter()
            .filter_map(|(stars, count)| count.as_i64().map(|count| (stars, count)))
            .collect();
        Self {
            tool_id: f.string("tool_id"),
            average_rating: f.f64_or("average_rating", 0.0),
            total_ratings: f.i64_or("total_ratings", 0),
            rating_distribution,
        }
    }
}
