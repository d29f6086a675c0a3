// SPDX-License-Identifier: MIT

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use chrono::Utc;
use grace_training::config::Config;
use grace_training::db::Db;
use grace_training::middleware::auth::create_jwt;
use grace_training::models::{Role, User};
use grace_training::routes::create_router;
use grace_training::services::{catalog, GoogleAuthService};
use grace_training::AppState;
use std::sync::Arc;
use tower::ServiceExt;

/// Create a test app backed by a fresh in-memory database with the
/// catalog seeded. Returns the router and the shared state.
#[allow(dead_code)]
pub async fn create_test_app() -> (axum::Router, Arc<AppState>) {
    let config = Config::test_default();
    let db = Db::in_memory().await.expect("in-memory database");
    catalog::seed_modules(&db).await.expect("seed catalog");

    let google = GoogleAuthService::new(
        config.google_client_id.clone(),
        config.google_client_secret.clone(),
    );

    let state = Arc::new(AppState { config, db, google });
    (create_router(state.clone()), state)
}

/// Insert a user directly, bypassing the OAuth flow.
#[allow(dead_code)]
pub async fn create_user(state: &Arc<AppState>, email: &str, role: Role) -> User {
    let now = Utc::now();
    let user = User {
        id: uuid::Uuid::new_v4().to_string(),
        email: email.to_string(),
        name: Some("Test User".to_string()),
        image: None,
        role,
        is_member: false,
        created_at: now,
        updated_at: now,
    };
    state.db.insert_user(&user).await.expect("insert user");
    user
}

/// Create a session token for a user.
#[allow(dead_code)]
pub fn auth_token(state: &Arc<AppState>, user_id: &str) -> String {
    create_jwt(user_id, &state.config.jwt_signing_key).expect("create jwt")
}

/// Build a GET request, optionally authenticated.
#[allow(dead_code)]
pub fn get(uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    builder.body(Body::empty()).unwrap()
}

/// Build a JSON POST request, optionally authenticated.
#[allow(dead_code)]
pub fn post_json(uri: &str, token: Option<&str>, body: &serde_json::Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

/// Read a response body as JSON.
#[allow(dead_code)]
pub async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("read body");
    serde_json::from_slice(&bytes).expect("body is JSON")
}

/// A valid intake form with an EXPERT-profile history.
#[allow(dead_code)]
pub fn valid_profile_form() -> serde_json::Value {
    use chrono::Datelike;
    let current_year = Utc::now().year();
    serde_json::json!({
        "birthYear": "1980",
        "country": "Argentina",
        "city": "Buenos Aires",
        "gender": "F",
        "institution": "Hospital Central",
        "institutionType": "public",
        "hasAdvancedImaging": false,
        "medicalGraduationYear": "2005",
        "egdStartYear": (current_year - 12).to_string(),
        "egdPerWeek": "11-20",
        "hasFellowship": true,
        "hasAdvancedTraining": false,
        "knewGraceBefore": false,
        "usesOtherScales": ["BBPS"],
        "usesSimethicone": true
    })
}

/// Submit a valid profile for the user, asserting success.
#[allow(dead_code)]
pub async fn submit_profile(app: &axum::Router, token: &str) {
    let response = app
        .clone()
        .oneshot(post_json("/api/profile", Some(token), &valid_profile_form()))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}
