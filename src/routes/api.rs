// SPDX-License-Identifier: MIT

//! API routes for authenticated users.

use crate::error::{AppError, Result};
use crate::middleware::auth::AuthUser;
use crate::models::{Module, ModuleProgress, ModuleType, Profile, ProgressStatus, Role};
use crate::services::dashboard::{self, DashboardStats};
use crate::services::gating;
use crate::services::profile::{self, ProfileForm};
use crate::services::progress;
use crate::services::quiz;
use crate::time_utils::format_utc_rfc3339;
use crate::AppState;
use axum::{
    extract::{Path, State},
    routing::{get, post},
    Extension, Json, Router,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;

/// Routes available to any authenticated user.
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/me", get(get_me))
        .route("/api/profile", post(save_profile))
}

/// Routes additionally gated behind a completed intake profile.
pub fn profile_gated_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/dashboard", get(get_dashboard))
        .route("/api/modules/{slug}/open", post(open_module))
        .route("/api/modules/complete", post(complete_module))
}

// ─── Current User ────────────────────────────────────────────

/// Current user response.
#[derive(Serialize)]
pub struct UserResponse {
    pub id: String,
    pub email: String,
    pub name: Option<String>,
    pub image: Option<String>,
    pub role: Role,
    pub is_member: bool,
    pub has_completed_profile: bool,
}

/// Get current user profile.
async fn get_me(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<UserResponse>> {
    let account = state
        .db
        .get_user(&user.user_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("User {} not found", user.user_id)))?;

    Ok(Json(UserResponse {
        id: account.id,
        email: account.email,
        name: account.name,
        image: account.image,
        role: account.role,
        is_member: account.is_member,
        has_completed_profile: user.has_completed_profile,
    }))
}

// ─── Profile Intake ──────────────────────────────────────────

/// Submit the intake profile (idempotent upsert for the current user).
async fn save_profile(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(form): Json<ProfileForm>,
) -> Result<Json<Profile>> {
    let profile = profile::save_profile(&state.db, &user.user_id, form).await?;
    Ok(Json(profile))
}

// ─── Dashboard ───────────────────────────────────────────────

/// One catalog entry with the user's status and lock flag.
#[derive(Serialize)]
pub struct ModuleOverview {
    pub id: i64,
    pub order_index: i64,
    pub title: String,
    pub slug: String,
    pub description: String,
    pub estimated_duration_minutes: i64,
    pub module_type: ModuleType,
    pub status: ProgressStatus,
    pub locked: bool,
}

#[derive(Serialize)]
pub struct DashboardResponse {
    pub modules: Vec<ModuleOverview>,
    pub stats: DashboardStats,
}

/// Get the module catalog with per-module status/lock and aggregate stats.
async fn get_dashboard(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<DashboardResponse>> {
    let catalog = state.db.list_active_modules().await?;
    let user_progress = progress::list_for_user(&state.db, &user.user_id).await?;

    let locks = gating::lock_states(&catalog, &user_progress);
    let stats = dashboard::compute_stats(&catalog, &user_progress);

    let modules = catalog
        .into_iter()
        .map(|m: Module| {
            let status = gating::status_for(&user_progress, m.id);
            let locked = locks.get(&m.id).copied().unwrap_or(true);
            ModuleOverview {
                id: m.id,
                order_index: m.order_index,
                title: m.title,
                slug: m.slug,
                description: m.description,
                estimated_duration_minutes: m.estimated_duration_minutes,
                module_type: m.module_type,
                status,
                locked,
            }
        })
        .collect();

    Ok(Json(DashboardResponse { modules, stats }))
}

// ─── Module Progress ─────────────────────────────────────────

/// Progress record as returned to the UI.
#[derive(Serialize)]
pub struct ProgressResponse {
    pub module_id: i64,
    pub status: ProgressStatus,
    pub started_at: Option<String>,
    pub completed_at: Option<String>,
    pub time_spent_secs: Option<i64>,
    pub quiz_answers: Option<HashMap<i64, i64>>,
    pub quiz_score: Option<i64>,
}

impl From<ModuleProgress> for ProgressResponse {
    fn from(p: ModuleProgress) -> Self {
        Self {
            module_id: p.module_id,
            status: p.status,
            started_at: p.started_at.map(format_utc_rfc3339),
            completed_at: p.completed_at.map(format_utc_rfc3339),
            time_spent_secs: p.time_spent_secs,
            quiz_answers: p.quiz_answers.map(|a| a.0),
            quiz_score: p.quiz_score,
        }
    }
}

/// Open a module: returns the progress record, creating an `IN_PROGRESS`
/// row on first visit. Lock enforcement is the caller's responsibility.
async fn open_module(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(slug): Path<String>,
) -> Result<Json<ProgressResponse>> {
    let module = state
        .db
        .get_module_by_slug(&slug)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Module '{}' not found", slug)))?;

    let record = progress::get_or_create(&state.db, &user.user_id, module.id).await?;

    tracing::debug!(
        user_id = %user.user_id,
        module = %slug,
        status = ?record.status,
        "Module opened"
    );

    Ok(Json(record.into()))
}

/// Completion request: answers are validated against the module's known
/// question set and scored server-side.
#[derive(Deserialize)]
pub struct CompleteModuleRequest {
    #[serde(rename = "moduleId")]
    pub module_id: i64,
    #[serde(rename = "quizAnswers", default)]
    pub quiz_answers: Option<HashMap<i64, i64>>,
}

/// Complete a previously opened module.
async fn complete_module(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(req): Json<CompleteModuleRequest>,
) -> Result<Json<ProgressResponse>> {
    let module = state
        .db
        .get_module(req.module_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Module {} not found", req.module_id)))?;

    let quiz_score = match (&req.quiz_answers, quiz::questions_for(&module.slug)) {
        (Some(answers), Some(questions)) => Some(quiz::validate_and_score(questions, answers)?),
        (Some(_), None) => {
            return Err(AppError::Validation(format!(
                "Module '{}' has no quiz",
                module.slug
            )))
        }
        (None, _) => None,
    };

    let record = progress::complete(
        &state.db,
        &user.user_id,
        module.id,
        req.quiz_answers.as_ref(),
        quiz_score,
    )
    .await?;

    tracing::info!(
        user_id = %user.user_id,
        module = %module.slug,
        quiz_score = ?quiz_score,
        time_spent_secs = ?record.time_spent_secs,
        "Module completed"
    );

    Ok(Json(record.into()))
}
