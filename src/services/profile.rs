// SPDX-License-Identifier: MIT

//! Profile intake: validating parse, derived fields, and the upsert.
//!
//! Year fields arrive as form strings and are rejected with a validation
//! error when non-numeric; a malformed year never reaches the store.

use chrono::{Datelike, Utc};
use serde::Deserialize;
use sqlx::types::Json;
use validator::Validate;

use crate::db::Db;
use crate::error::AppError;
use crate::models::{ExperienceLevel, Profile};

/// Raw intake form fields as submitted by the onboarding UI.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ProfileForm {
    pub birth_year: String,
    #[validate(length(min = 1, message = "country is required"))]
    pub country: String,
    #[serde(default)]
    pub city: Option<String>,
    #[validate(length(min = 1, message = "gender is required"))]
    pub gender: String,
    #[serde(default)]
    pub institution: Option<String>,
    #[serde(default)]
    pub institution_type: Option<String>,
    #[serde(default)]
    pub has_advanced_imaging: bool,
    pub medical_graduation_year: String,
    pub egd_start_year: String,
    #[validate(length(min = 1, message = "egdPerWeek is required"))]
    pub egd_per_week: String,
    pub has_fellowship: bool,
    pub has_advanced_training: bool,
    pub knew_grace_before: bool,
    #[serde(default)]
    pub uses_other_scales: Vec<String>,
    pub uses_simethicone: bool,
}

/// Numeric midpoint for a weekly-volume bucket. Unrecognized buckets map
/// to 0, matching the intake form's fixed choices.
pub fn volume_midpoint(bucket: &str) -> i32 {
    match bucket {
        "<5" => 2,
        "5-10" => 7,
        "11-20" => 15,
        "21-30" => 25,
        ">30" => 35,
        _ => 0,
    }
}

/// Classify experience from years of endoscopy practice and estimated
/// annual volume.
pub fn classify_experience(years_of_practice: i32, estimated_annual: i32) -> ExperienceLevel {
    if years_of_practice >= 10 && estimated_annual >= 500 {
        ExperienceLevel::Expert
    } else if years_of_practice < 2 {
        ExperienceLevel::NonExpert
    } else {
        ExperienceLevel::Intermediate
    }
}

/// Parse a year form field, rejecting anything non-numeric.
fn parse_year(field: &str, value: &str) -> Result<i32, AppError> {
    value
        .trim()
        .parse::<i32>()
        .map_err(|_| AppError::Validation(format!("Field '{}' must be a valid year", field)))
}

/// Validate the form, compute the derived fields, and upsert the profile.
///
/// Idempotent per user: resubmission replaces the stored profile and
/// refreshes `completed_at`.
pub async fn save_profile(db: &Db, user_id: &str, form: ProfileForm) -> Result<Profile, AppError> {
    form.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let current_year = Utc::now().year();
    let derived = derive_fields(&form, current_year)?;

    let profile = Profile {
        user_id: user_id.to_string(),
        birth_year: derived.birth_year,
        country: form.country,
        city: form.city,
        gender: form.gender,
        institution: form.institution,
        institution_type: form.institution_type,
        has_advanced_imaging: form.has_advanced_imaging,
        medical_graduation_year: derived.medical_graduation_year,
        egd_start_year: derived.egd_start_year,
        egd_per_week: form.egd_per_week,
        egd_per_week_midpoint: derived.midpoint,
        estimated_egd_per_year: derived.estimated_annual,
        has_fellowship: form.has_fellowship,
        has_advanced_training: form.has_advanced_training,
        experience_level: derived.experience_level,
        knew_grace_before: form.knew_grace_before,
        uses_other_scales: Json(form.uses_other_scales),
        uses_simethicone: form.uses_simethicone,
        completed_at: Utc::now(),
    };

    db.upsert_profile(&profile).await?;

    tracing::info!(
        user_id,
        experience_level = ?profile.experience_level,
        estimated_egd_per_year = profile.estimated_egd_per_year,
        "Profile saved"
    );

    Ok(profile)
}

/// Values derived from the raw form at submission time.
#[derive(Debug, PartialEq, Eq)]
pub struct DerivedFields {
    pub birth_year: i32,
    pub medical_graduation_year: i32,
    pub egd_start_year: i32,
    pub midpoint: i32,
    pub estimated_annual: i32,
    pub experience_level: ExperienceLevel,
}

/// Parse year fields and compute the derived volume/experience values.
pub fn derive_fields(form: &ProfileForm, current_year: i32) -> Result<DerivedFields, AppError> {
    let birth_year = parse_year("birthYear", &form.birth_year)?;
    let medical_graduation_year =
        parse_year("medicalGraduationYear", &form.medical_graduation_year)?;
    let egd_start_year = parse_year("egdStartYear", &form.egd_start_year)?;

    let midpoint = volume_midpoint(&form.egd_per_week);
    let estimated_annual = midpoint * 50;
    let experience_level =
        classify_experience(current_year - egd_start_year, estimated_annual);

    Ok(DerivedFields {
        birth_year,
        medical_graduation_year,
        egd_start_year,
        midpoint,
        estimated_annual,
        experience_level,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(egd_per_week: &str, egd_start_year: String) -> ProfileForm {
        ProfileForm {
            birth_year: "1980".to_string(),
            country: "Argentina".to_string(),
            city: None,
            gender: "F".to_string(),
            institution: None,
            institution_type: None,
            has_advanced_imaging: false,
            medical_graduation_year: "2005".to_string(),
            egd_start_year,
            egd_per_week: egd_per_week.to_string(),
            has_fellowship: true,
            has_advanced_training: false,
            knew_grace_before: false,
            uses_other_scales: vec![],
            uses_simethicone: true,
        }
    }

    #[test]
    fn test_volume_midpoints() {
        assert_eq!(volume_midpoint("<5"), 2);
        assert_eq!(volume_midpoint("5-10"), 7);
        assert_eq!(volume_midpoint("11-20"), 15);
        assert_eq!(volume_midpoint("21-30"), 25);
        assert_eq!(volume_midpoint(">30"), 35);
        assert_eq!(volume_midpoint("whatever"), 0);
    }

    #[test]
    fn test_expert_classification() {
        let current_year = 2026;
        let derived = derive_fields(&form("11-20", (current_year - 12).to_string()), current_year)
            .unwrap();

        assert_eq!(derived.midpoint, 15);
        assert_eq!(derived.estimated_annual, 750);
        assert_eq!(derived.experience_level, ExperienceLevel::Expert);
    }

    #[test]
    fn test_non_expert_regardless_of_volume() {
        let current_year = 2026;
        let derived = derive_fields(&form(">30", (current_year - 1).to_string()), current_year)
            .unwrap();

        assert_eq!(derived.estimated_annual, 1750);
        assert_eq!(derived.experience_level, ExperienceLevel::NonExpert);
    }

    #[test]
    fn test_intermediate_when_volume_too_low_for_expert() {
        // 12 years of practice but 100 EGD/year: not expert, not novice
        let current_year = 2026;
        let derived =
            derive_fields(&form("<5", (current_year - 12).to_string()), current_year).unwrap();

        assert_eq!(derived.estimated_annual, 100);
        assert_eq!(derived.experience_level, ExperienceLevel::Intermediate);
    }

    #[test]
    fn test_expert_boundaries_are_inclusive() {
        assert_eq!(classify_experience(10, 500), ExperienceLevel::Expert);
        assert_eq!(classify_experience(9, 500), ExperienceLevel::Intermediate);
        assert_eq!(classify_experience(10, 499), ExperienceLevel::Intermediate);
        assert_eq!(classify_experience(1, 0), ExperienceLevel::NonExpert);
        assert_eq!(classify_experience(2, 0), ExperienceLevel::Intermediate);
    }

    #[test]
    fn test_malformed_year_rejected() {
        let err = derive_fields(&form("5-10", "not-a-year".to_string()), 2026).unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn test_unrecognized_bucket_gives_zero_annual() {
        let derived = derive_fields(&form("lots", "2010".to_string()), 2026).unwrap();
        assert_eq!(derived.midpoint, 0);
        assert_eq!(derived.estimated_annual, 0);
    }
}
