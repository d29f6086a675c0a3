// SPDX-License-Identifier: MIT

//! Per-user module progress tracking.
//!
//! Each transition is one atomic store operation scoped to a single request;
//! there is no in-process shared state. Duplicate rows for the same
//! (user, module) pair are prevented by the store's composite key, not here.

use std::collections::HashMap;

use chrono::{DateTime, Utc};

use crate::db::Db;
use crate::error::AppError;
use crate::models::ModuleProgress;

/// Return the progress record for the pair, creating an `IN_PROGRESS` row
/// with `started_at = now` on first open.
pub async fn get_or_create(
    db: &Db,
    user_id: &str,
    module_id: i64,
) -> Result<ModuleProgress, AppError> {
    db.insert_progress_if_absent(user_id, module_id, Utc::now())
        .await?;
    db.get_progress(user_id, module_id).await?.ok_or_else(|| {
        AppError::Database(format!(
            "Progress row missing after insert for user {} module {}",
            user_id, module_id
        ))
    })
}

/// Complete a previously opened module, storing the quiz payload verbatim.
///
/// Fails with `NotFound` when the module was never opened; completion never
/// creates a record as a side effect. Calling this twice overwrites
/// `completed_at` and `time_spent` with fresh values (known contract gap,
/// pinned by tests).
pub async fn complete(
    db: &Db,
    user_id: &str,
    module_id: i64,
    quiz_answers: Option<&HashMap<i64, i64>>,
    quiz_score: Option<i64>,
) -> Result<ModuleProgress, AppError> {
    let current = db
        .get_progress(user_id, module_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Progress record not found".to_string()))?;

    let started_at = current
        .started_at
        .ok_or_else(|| AppError::NotFound("Module was never started".to_string()))?;

    let completed_at = Utc::now();
    let time_spent = time_spent_secs(started_at, completed_at);

    db.mark_progress_completed(
        user_id,
        module_id,
        completed_at,
        time_spent,
        quiz_answers,
        quiz_score,
    )
    .await?;

    db.get_progress(user_id, module_id).await?.ok_or_else(|| {
        AppError::Database(format!(
            "Progress row missing after completion for user {} module {}",
            user_id, module_id
        ))
    })
}

/// All progress rows for a user (for gating and aggregation).
pub async fn list_for_user(db: &Db, user_id: &str) -> Result<Vec<ModuleProgress>, AppError> {
    db.list_progress_for_user(user_id).await
}

/// Whole seconds between start and completion, floored.
fn time_spent_secs(started_at: DateTime<Utc>, completed_at: DateTime<Utc>) -> i64 {
    (completed_at - started_at).num_seconds()
}
