// SPDX-License-Identifier: MIT

//! Admin-only routes.

use crate::db::ParticipantOverview;
use crate::error::Result;
use crate::AppState;
use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;
use std::sync::Arc;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/api/admin/participants", get(list_participants))
}

#[derive(Serialize)]
pub struct ParticipantsResponse {
    pub participants: Vec<ParticipantOverview>,
    pub total: usize,
}

/// List all users with their profile summary and completed-module counts.
async fn list_participants(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ParticipantsResponse>> {
    let participants = state.db.list_participants().await?;
    let total = participants.len();
    Ok(Json(ParticipantsResponse {
        participants,
        total,
    }))
}
