//! Catalog entry for one learning unit.

use serde::{Deserialize, Serialize};

/// Kind of learning unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
pub enum ModuleType {
    #[serde(rename = "EDUCATIONAL")]
    #[sqlx(rename = "EDUCATIONAL")]
    Educational,
    #[serde(rename = "EVALUATION")]
    #[sqlx(rename = "EVALUATION")]
    Evaluation,
}

/// One unit of the learning catalog.
///
/// Immutable at runtime; seeded at startup. `order_index` defines the total
/// order the gating engine walks, `slug` is the routing key.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Module {
    pub id: i64,
    pub order_index: i64,
    pub title: String,
    pub slug: String,
    pub description: String,
    pub estimated_duration_minutes: i64,
    pub module_type: ModuleType,
    pub is_active: bool,
}
