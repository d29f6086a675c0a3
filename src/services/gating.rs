// SPDX-License-Identifier: MIT

//! Sequential progression gating.
//!
//! Pure functions over the catalog and one user's progress snapshot.
//! The first module in `order_index` order is always accessible; every
//! later module is locked until its immediate predecessor is completed.
//! Evaluation modules gate exactly like educational ones.

use std::collections::HashMap;

use crate::models::{Module, ModuleProgress, ProgressStatus};

/// Status of a module for a user, defaulting to `NotStarted` when no
/// progress row exists.
pub fn status_for(progress: &[ModuleProgress], module_id: i64) -> ProgressStatus {
    progress
        .iter()
        .find(|p| p.module_id == module_id)
        .map(|p| p.status)
        .unwrap_or(ProgressStatus::NotStarted)
}

/// Compute the locked flag for every module in the catalog.
///
/// Walks the catalog sorted by `order_index` (adjacent-pair lookup, so gaps
/// in the numbering do not matter) and locks each module whose predecessor
/// is not `COMPLETED`.
pub fn lock_states(catalog: &[Module], progress: &[ModuleProgress]) -> HashMap<i64, bool> {
    let mut ordered: Vec<&Module> = catalog.iter().collect();
    ordered.sort_by_key(|m| m.order_index);

    let mut locks = HashMap::with_capacity(ordered.len());
    let mut previous: Option<&Module> = None;
    for module in ordered {
        let locked = match previous {
            None => false,
            Some(prev) => status_for(progress, prev.id) != ProgressStatus::Completed,
        };
        locks.insert(module.id, locked);
        previous = Some(module);
    }
    locks
}
