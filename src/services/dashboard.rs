// SPDX-License-Identifier: MIT

//! Dashboard statistics derived from the catalog and progress snapshot.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::models::{Module, ModuleProgress, ModuleType, ProgressStatus};
use crate::services::gating::status_for;

/// Aggregate display statistics for one user.
///
/// `round2_available_date` is always `None`: the re-evaluation cooldown is
/// not implemented, only the completion flags are tracked.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardStats {
    pub completed_modules: u32,
    pub total_modules: u32,
    pub progress_percentage: u32,
    pub round1_complete: bool,
    pub round2_complete: bool,
    pub round2_available_date: Option<DateTime<Utc>>,
}

/// Compute dashboard stats from the active catalog and the user's progress.
///
/// Completion counts cover EDUCATIONAL modules only; the evaluation rounds
/// are reported through the round flags, taken from the first and second
/// EVALUATION modules in catalog order.
pub fn compute_stats(catalog: &[Module], progress: &[ModuleProgress]) -> DashboardStats {
    let educational: Vec<&Module> = catalog
        .iter()
        .filter(|m| m.module_type == ModuleType::Educational)
        .collect();

    let total_modules = educational.len() as u32;
    let completed_modules = educational
        .iter()
        .filter(|m| status_for(progress, m.id) == ProgressStatus::Completed)
        .count() as u32;

    let progress_percentage = if total_modules > 0 {
        ((completed_modules as f64 / total_modules as f64) * 100.0).round() as u32
    } else {
        0
    };

    let mut evaluations: Vec<&Module> = catalog
        .iter()
        .filter(|m| m.module_type == ModuleType::Evaluation)
        .collect();
    evaluations.sort_by_key(|m| m.order_index);

    let round_complete = |index: usize| {
        evaluations
            .get(index)
            .map(|m| status_for(progress, m.id) == ProgressStatus::Completed)
            .unwrap_or(false)
    };

    DashboardStats {
        completed_modules,
        total_modules,
        progress_percentage,
        round1_complete: round_complete(0),
        round2_complete: round_complete(1),
        round2_available_date: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_module(id: i64, order_index: i64, module_type: ModuleType) -> Module {
        Module {
            id,
            order_index,
            title: format!("Module {}", id),
            slug: format!("module-{}", id),
            description: String::new(),
            estimated_duration_minutes: 15,
            module_type,
            is_active: true,
        }
    }

    fn completed(module_id: i64) -> ModuleProgress {
        ModuleProgress {
            user_id: "u1".to_string(),
            module_id,
            status: ProgressStatus::Completed,
            started_at: None,
            completed_at: None,
            time_spent_secs: None,
            quiz_answers: None,
            quiz_score: None,
        }
    }

    #[test]
    fn test_empty_catalog_has_zero_percentage() {
        let stats = compute_stats(&[], &[]);
        assert_eq!(stats.total_modules, 0);
        assert_eq!(stats.progress_percentage, 0);
    }

    #[test]
    fn test_only_educational_modules_counted() {
        let catalog = vec![
            make_module(1, 1, ModuleType::Educational),
            make_module(2, 2, ModuleType::Educational),
            make_module(3, 3, ModuleType::Evaluation),
        ];
        // Completing the evaluation must not move the educational counters
        let stats = compute_stats(&catalog, &[completed(1), completed(3)]);

        assert_eq!(stats.total_modules, 2);
        assert_eq!(stats.completed_modules, 1);
        assert_eq!(stats.progress_percentage, 50);
    }

    #[test]
    fn test_percentage_rounds_to_nearest() {
        let catalog = vec![
            make_module(1, 1, ModuleType::Educational),
            make_module(2, 2, ModuleType::Educational),
            make_module(3, 3, ModuleType::Educational),
        ];
        let stats = compute_stats(&catalog, &[completed(1)]);
        assert_eq!(stats.progress_percentage, 33);

        let stats = compute_stats(&catalog, &[completed(1), completed(2)]);
        assert_eq!(stats.progress_percentage, 67);
    }

    #[test]
    fn test_round_flags_follow_evaluation_order() {
        let catalog = vec![
            make_module(1, 1, ModuleType::Educational),
            make_module(5, 5, ModuleType::Evaluation),
            make_module(6, 6, ModuleType::Evaluation),
        ];

        let stats = compute_stats(&catalog, &[]);
        assert!(!stats.round1_complete);
        assert!(!stats.round2_complete);

        let stats = compute_stats(&catalog, &[completed(5)]);
        assert!(stats.round1_complete);
        assert!(!stats.round2_complete);

        let stats = compute_stats(&catalog, &[completed(5), completed(6)]);
        assert!(stats.round2_complete);
        assert!(stats.round2_available_date.is_none());
    }
}
