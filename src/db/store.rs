// SPDX-License-Identifier: MIT

//! SQLite store with typed operations.
//!
//! Provides high-level operations for:
//! - Users (account provisioning on sign-in)
//! - Profiles (intake upsert keyed by user id)
//! - Modules (seeded catalog)
//! - Module progress (composite-keyed per-user records)
//!
//! Uniqueness of the `(user_id, module_id)` composite key is enforced here,
//! not by callers: concurrent get-or-create calls for the same pair collapse
//! onto one row via `ON CONFLICT DO NOTHING`.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};
use sqlx::types::Json;

use crate::error::AppError;
use crate::models::{Module, ModuleProgress, Profile, User};

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS users (
    id          TEXT PRIMARY KEY,
    email       TEXT NOT NULL UNIQUE,
    name        TEXT,
    image       TEXT,
    role        TEXT NOT NULL DEFAULT 'PARTICIPANT',
    is_member   INTEGER NOT NULL DEFAULT 0,
    created_at  TEXT NOT NULL,
    updated_at  TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS profiles (
    user_id                  TEXT PRIMARY KEY REFERENCES users(id) ON DELETE CASCADE,
    birth_year               INTEGER NOT NULL,
    country                  TEXT NOT NULL,
    city                     TEXT,
    gender                   TEXT NOT NULL,
    institution              TEXT,
    institution_type         TEXT,
    has_advanced_imaging     INTEGER NOT NULL DEFAULT 0,
    medical_graduation_year  INTEGER NOT NULL,
    egd_start_year           INTEGER NOT NULL,
    egd_per_week             TEXT NOT NULL,
    egd_per_week_midpoint    INTEGER NOT NULL,
    estimated_egd_per_year   INTEGER NOT NULL,
    has_fellowship           INTEGER NOT NULL,
    has_advanced_training    INTEGER NOT NULL,
    experience_level         TEXT NOT NULL,
    knew_grace_before        INTEGER NOT NULL,
    uses_other_scales        TEXT NOT NULL DEFAULT '[]',
    uses_simethicone         INTEGER NOT NULL,
    completed_at             TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS modules (
    id                          INTEGER PRIMARY KEY AUTOINCREMENT,
    order_index                 INTEGER NOT NULL UNIQUE,
    title                       TEXT NOT NULL,
    slug                        TEXT NOT NULL UNIQUE,
    description                 TEXT NOT NULL,
    estimated_duration_minutes  INTEGER NOT NULL,
    module_type                 TEXT NOT NULL,
    is_active                   INTEGER NOT NULL DEFAULT 1
);

CREATE TABLE IF NOT EXISTS module_progress (
    user_id          TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    module_id        INTEGER NOT NULL REFERENCES modules(id) ON DELETE CASCADE,
    status           TEXT NOT NULL DEFAULT 'IN_PROGRESS',
    started_at       TEXT,
    completed_at     TEXT,
    time_spent_secs  INTEGER,
    quiz_answers     TEXT,
    quiz_score       INTEGER,
    PRIMARY KEY (user_id, module_id)
);
"#;

/// SQLite database client.
#[derive(Clone)]
pub struct Db {
    pool: SqlitePool,
}

impl Db {
    /// Connect to the database and ensure the schema exists.
    pub async fn connect(database_url: &str) -> Result<Self, AppError> {
        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect(database_url)
            .await
            .map_err(|e| AppError::Database(format!("Failed to connect to SQLite: {}", e)))?;

        sqlx::query("PRAGMA foreign_keys = ON").execute(&pool).await?;

        let db = Self { pool };
        db.init_schema().await?;

        tracing::info!(url = database_url, "Connected to SQLite");
        Ok(db)
    }

    /// In-memory database for tests.
    ///
    /// Pinned to a single pooled connection: each in-memory SQLite
    /// connection is its own database.
    pub async fn in_memory() -> Result<Self, AppError> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect("sqlite::memory:")
            .await
            .map_err(|e| AppError::Database(format!("Failed to open in-memory SQLite: {}", e)))?;

        sqlx::query("PRAGMA foreign_keys = ON").execute(&pool).await?;

        let db = Self { pool };
        db.init_schema().await?;
        Ok(db)
    }

    async fn init_schema(&self) -> Result<(), AppError> {
        sqlx::raw_sql(SCHEMA).execute(&self.pool).await?;
        Ok(())
    }

    // ─── User Operations ─────────────────────────────────────────

    pub async fn get_user(&self, user_id: &str) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = ?")
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    pub async fn get_user_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = ?")
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    /// Insert a newly provisioned user.
    pub async fn insert_user(&self, user: &User) -> Result<(), AppError> {
        sqlx::query(
            "INSERT INTO users (id, email, name, image, role, is_member, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&user.id)
        .bind(&user.email)
        .bind(&user.name)
        .bind(&user.image)
        .bind(user.role)
        .bind(user.is_member)
        .bind(user.created_at)
        .bind(user.updated_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// Refresh mutable identity fields on a returning login.
    pub async fn update_user_login(
        &self,
        user_id: &str,
        name: Option<&str>,
        image: Option<&str>,
        now: DateTime<Utc>,
    ) -> Result<(), AppError> {
        sqlx::query("UPDATE users SET name = ?, image = ?, updated_at = ? WHERE id = ?")
            .bind(name)
            .bind(image)
            .bind(now)
            .bind(user_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    // ─── Profile Operations ──────────────────────────────────────

    pub async fn get_profile(&self, user_id: &str) -> Result<Option<Profile>, AppError> {
        let profile = sqlx::query_as::<_, Profile>("SELECT * FROM profiles WHERE user_id = ?")
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(profile)
    }

    /// Create or replace the intake profile for a user (idempotent upsert
    /// keyed by user id).
    pub async fn upsert_profile(&self, profile: &Profile) -> Result<(), AppError> {
        sqlx::query(
            "INSERT INTO profiles (
                user_id, birth_year, country, city, gender, institution,
                institution_type, has_advanced_imaging, medical_graduation_year,
                egd_start_year, egd_per_week, egd_per_week_midpoint,
                estimated_egd_per_year, has_fellowship, has_advanced_training,
                experience_level, knew_grace_before, uses_other_scales,
                uses_simethicone, completed_at
             ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
             ON CONFLICT(user_id) DO UPDATE SET
                birth_year = excluded.birth_year,
                country = excluded.country,
                city = excluded.city,
                gender = excluded.gender,
                institution = excluded.institution,
                institution_type = excluded.institution_type,
                has_advanced_imaging = excluded.has_advanced_imaging,
                medical_graduation_year = excluded.medical_graduation_year,
                egd_start_year = excluded.egd_start_year,
                egd_per_week = excluded.egd_per_week,
                egd_per_week_midpoint = excluded.egd_per_week_midpoint,
                estimated_egd_per_year = excluded.estimated_egd_per_year,
                has_fellowship = excluded.has_fellowship,
                has_advanced_training = excluded.has_advanced_training,
                experience_level = excluded.experience_level,
                knew_grace_before = excluded.knew_grace_before,
                uses_other_scales = excluded.uses_other_scales,
                uses_simethicone = excluded.uses_simethicone,
                completed_at = excluded.completed_at",
        )
        .bind(&profile.user_id)
        .bind(profile.birth_year)
        .bind(&profile.country)
        .bind(&profile.city)
        .bind(&profile.gender)
        .bind(&profile.institution)
        .bind(&profile.institution_type)
        .bind(profile.has_advanced_imaging)
        .bind(profile.medical_graduation_year)
        .bind(profile.egd_start_year)
        .bind(&profile.egd_per_week)
        .bind(profile.egd_per_week_midpoint)
        .bind(profile.estimated_egd_per_year)
        .bind(profile.has_fellowship)
        .bind(profile.has_advanced_training)
        .bind(profile.experience_level)
        .bind(profile.knew_grace_before)
        .bind(&profile.uses_other_scales)
        .bind(profile.uses_simethicone)
        .bind(profile.completed_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    // ─── Module Catalog Operations ───────────────────────────────

    /// Upsert a catalog entry by slug. Used by seeding only.
    #[allow(clippy::too_many_arguments)]
    pub async fn upsert_module(
        &self,
        order_index: i64,
        title: &str,
        slug: &str,
        description: &str,
        estimated_duration_minutes: i64,
        module_type: crate::models::ModuleType,
        is_active: bool,
    ) -> Result<(), AppError> {
        sqlx::query(
            "INSERT INTO modules (order_index, title, slug, description,
                                  estimated_duration_minutes, module_type, is_active)
             VALUES (?, ?, ?, ?, ?, ?, ?)
             ON CONFLICT(slug) DO UPDATE SET
                order_index = excluded.order_index,
                title = excluded.title,
                description = excluded.description,
                estimated_duration_minutes = excluded.estimated_duration_minutes,
                module_type = excluded.module_type,
                is_active = excluded.is_active",
        )
        .bind(order_index)
        .bind(title)
        .bind(slug)
        .bind(description)
        .bind(estimated_duration_minutes)
        .bind(module_type)
        .bind(is_active)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// Active catalog in `order_index` order.
    pub async fn list_active_modules(&self) -> Result<Vec<Module>, AppError> {
        let modules = sqlx::query_as::<_, Module>(
            "SELECT * FROM modules WHERE is_active = 1 ORDER BY order_index ASC",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(modules)
    }

    pub async fn get_module(&self, module_id: i64) -> Result<Option<Module>, AppError> {
        let module = sqlx::query_as::<_, Module>("SELECT * FROM modules WHERE id = ?")
            .bind(module_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(module)
    }

    pub async fn get_module_by_slug(&self, slug: &str) -> Result<Option<Module>, AppError> {
        let module = sqlx::query_as::<_, Module>("SELECT * FROM modules WHERE slug = ?")
            .bind(slug)
            .fetch_optional(&self.pool)
            .await?;
        Ok(module)
    }

    // ─── Progress Operations ─────────────────────────────────────

    pub async fn get_progress(
        &self,
        user_id: &str,
        module_id: i64,
    ) -> Result<Option<ModuleProgress>, AppError> {
        let progress = sqlx::query_as::<_, ModuleProgress>(
            "SELECT * FROM module_progress WHERE user_id = ? AND module_id = ?",
        )
        .bind(user_id)
        .bind(module_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(progress)
    }

    /// Insert an `IN_PROGRESS` row for the pair unless one already exists.
    ///
    /// The composite primary key makes this safe under concurrent calls;
    /// the loser of the race is a no-op.
    pub async fn insert_progress_if_absent(
        &self,
        user_id: &str,
        module_id: i64,
        started_at: DateTime<Utc>,
    ) -> Result<(), AppError> {
        sqlx::query(
            "INSERT INTO module_progress (user_id, module_id, status, started_at)
             VALUES (?, ?, 'IN_PROGRESS', ?)
             ON CONFLICT(user_id, module_id) DO NOTHING",
        )
        .bind(user_id)
        .bind(module_id)
        .bind(started_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// Mark an existing progress row completed, storing the quiz payload.
    pub async fn mark_progress_completed(
        &self,
        user_id: &str,
        module_id: i64,
        completed_at: DateTime<Utc>,
        time_spent_secs: i64,
        quiz_answers: Option<&HashMap<i64, i64>>,
        quiz_score: Option<i64>,
    ) -> Result<(), AppError> {
        sqlx::query(
            "UPDATE module_progress
             SET status = 'COMPLETED', completed_at = ?, time_spent_secs = ?,
                 quiz_answers = ?, quiz_score = ?
             WHERE user_id = ? AND module_id = ?",
        )
        .bind(completed_at)
        .bind(time_spent_secs)
        .bind(quiz_answers.map(|a| Json(a.clone())))
        .bind(quiz_score)
        .bind(user_id)
        .bind(module_id)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// All progress rows for a user.
    pub async fn list_progress_for_user(
        &self,
        user_id: &str,
    ) -> Result<Vec<ModuleProgress>, AppError> {
        let rows = sqlx::query_as::<_, ModuleProgress>(
            "SELECT * FROM module_progress WHERE user_id = ?",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    // ─── Admin Operations ────────────────────────────────────────

    /// Per-participant overview for the admin dashboard.
    pub async fn list_participants(&self) -> Result<Vec<ParticipantOverview>, AppError> {
        let rows = sqlx::query_as::<_, ParticipantOverview>(
            "SELECT u.id, u.email, u.name, u.role, u.is_member,
                    p.experience_level, p.completed_at AS profile_completed_at,
                    (SELECT COUNT(*) FROM module_progress mp
                      WHERE mp.user_id = u.id AND mp.status = 'COMPLETED') AS completed_modules
             FROM users u
             LEFT JOIN profiles p ON p.user_id = u.id
             ORDER BY u.created_at ASC",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }
}

/// One row of the admin participant listing.
#[derive(Debug, Clone, serde::Serialize, sqlx::FromRow)]
pub struct ParticipantOverview {
    pub id: String,
    pub email: String,
    pub name: Option<String>,
    pub role: crate::models::Role,
    pub is_member: bool,
    pub experience_level: Option<crate::models::ExperienceLevel>,
    pub profile_completed_at: Option<DateTime<Utc>>,
    pub completed_modules: i64,
}
