// SPDX-License-Identifier: MIT

//! GRACE Training Platform backend.
//!
//! This crate provides the API for the GRACE endoscopy-cleanliness training
//! course: profile intake, the sequential module catalog, per-user progress
//! tracking, and quiz scoring.

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod time_utils;

use config::Config;
use db::Db;
use services::GoogleAuthService;

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub db: Db,
    pub google: GoogleAuthService,
}
