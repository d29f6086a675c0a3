//! Per-user, per-module progress record: the central mutable state.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Lifecycle status of a progress record.
///
/// `NotStarted` is never persisted; it is the implied status of a module
/// the user has not opened yet. A row is created `InProgress` on first
/// open and moves to `Completed` exactly once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
pub enum ProgressStatus {
    #[serde(rename = "NOT_STARTED")]
    #[sqlx(rename = "NOT_STARTED")]
    NotStarted,
    #[serde(rename = "IN_PROGRESS")]
    #[sqlx(rename = "IN_PROGRESS")]
    InProgress,
    #[serde(rename = "COMPLETED")]
    #[sqlx(rename = "COMPLETED")]
    Completed,
}

/// One row per (user, module) pair, unique on that composite key.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct ModuleProgress {
    pub user_id: String,
    pub module_id: i64,
    pub status: ProgressStatus,
    pub started_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    /// Whole seconds between start and completion (floor)
    pub time_spent_secs: Option<i64>,
    /// Question id -> chosen option index, as submitted
    pub quiz_answers: Option<sqlx::types::Json<HashMap<i64, i64>>>,
    /// Count of correct answers
    pub quiz_score: Option<i64>,
}
