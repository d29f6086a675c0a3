// SPDX-License-Identifier: MIT

//! GRACE Training Platform API Server
//!
//! Serves the GRACE endoscopy-cleanliness course backend: profile intake,
//! the sequential module catalog, progress tracking and quiz scoring.

use grace_training::{
    config::Config, db::Db, services::catalog, services::GoogleAuthService, AppState,
};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging();

    let config = Config::from_env().expect("Failed to load configuration");
    tracing::info!(port = config.port, "Starting GRACE Training API");

    let db = Db::connect(&config.database_url)
        .await
        .expect("Failed to connect to database");

    catalog::seed_modules(&db)
        .await
        .expect("Failed to seed module catalog");

    let google = GoogleAuthService::new(
        config.google_client_id.clone(),
        config.google_client_secret.clone(),
    );

    let state = Arc::new(AppState { config: config.clone(), db, google });

    let app = grace_training::routes::create_router(state);

    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(address = %addr, "Server listening");

    axum::serve(listener, app).await?;
    Ok(())
}

/// Initialize structured JSON logging.
fn init_logging() {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("grace_training=debug".parse().unwrap())
                .add_directive("info".parse().unwrap()),
        )
        .with(format)
        .init();
}
