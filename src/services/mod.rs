// SPDX-License-Identifier: MIT

//! Services module - business logic layer.

pub mod catalog;
pub mod dashboard;
pub mod gating;
pub mod google_auth;
pub mod profile;
pub mod progress;
pub mod quiz;

pub use dashboard::DashboardStats;
pub use google_auth::{GoogleAuthService, GoogleUserInfo};
pub use profile::ProfileForm;
