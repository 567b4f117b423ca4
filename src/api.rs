//! HTTP API endpoints for operators.

use axum::{extract::State, Json};
use std::sync::Arc;

use crate::state::{AppState, RoomSummary};

/// List live rooms.
///
/// GET /api/rooms
///
/// Secret words are never part of the response.
pub async fn list_rooms(State(state): State<Arc<AppState>>) -> Json<Vec<RoomSummary>> {
    Json(state.room_summaries().await)
}
