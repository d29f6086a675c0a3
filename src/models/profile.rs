//! Participant intake profile, completed once before the module catalog
//! becomes accessible.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Experience classification derived from professional history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
pub enum ExperienceLevel {
    #[serde(rename = "EXPERT")]
    #[sqlx(rename = "EXPERT")]
    Expert,
    #[serde(rename = "INTERMEDIATE")]
    #[sqlx(rename = "INTERMEDIATE")]
    Intermediate,
    #[serde(rename = "NON_EXPERT")]
    #[sqlx(rename = "NON_EXPERT")]
    NonExpert,
}

/// Intake profile, one-to-one with a user.
///
/// `egd_per_week_midpoint`, `estimated_egd_per_year` and `experience_level`
/// are derived at submission time and never edited directly. `completed_at`
/// is set exactly once submission succeeds; its presence is the sole gate
/// for accessing the module catalog.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Profile {
    pub user_id: String,
    pub birth_year: i32,
    pub country: String,
    pub city: Option<String>,
    pub gender: String,
    pub institution: Option<String>,
    pub institution_type: Option<String>,
    pub has_advanced_imaging: bool,
    pub medical_graduation_year: i32,
    /// Year the user started practicing upper endoscopy
    pub egd_start_year: i32,
    /// Weekly procedure volume bucket as submitted (e.g. "11-20")
    pub egd_per_week: String,
    /// Numeric midpoint of the selected volume bucket
    pub egd_per_week_midpoint: i32,
    /// Midpoint extrapolated to 50 working weeks
    pub estimated_egd_per_year: i32,
    pub has_fellowship: bool,
    pub has_advanced_training: bool,
    pub experience_level: ExperienceLevel,
    pub knew_grace_before: bool,
    /// Other cleanliness scales the user reports using (JSON array)
    pub uses_other_scales: sqlx::types::Json<Vec<String>>,
    pub uses_simethicone: bool,
    pub completed_at: DateTime<Utc>,
}
