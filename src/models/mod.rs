// SPDX-License-Identifier: MIT

//! Data models for the application.

pub mod module;
pub mod profile;
pub mod progress;
pub mod user;

pub use module::{Module, ModuleType};
pub use profile::{ExperienceLevel, Profile};
pub use progress::{ModuleProgress, ProgressStatus};
pub use user::{Role, User};
