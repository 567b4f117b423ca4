//! Room setup and round control messages
//!
//! Any connection may send these. The room's host is the usual sender, but
//! nothing here checks for it. Only a manual word has to come from a member.

use crate::error::GameError;
use crate::protocol::ServerMessage;
use crate::state::AppState;
use crate::types::{ConnectionId, GameMode, RoomCode};
use std::sync::Arc;

/// Room-scoped failures go to the room; if the room is gone, to the sender
async fn report_round_error(
    state: &Arc<AppState>,
    code: &str,
    err: GameError,
) -> Option<ServerMessage> {
    tracing::warn!("Round error in room {}: {}", code, err);
    let msg = ServerMessage::round_error(&err);
    if state.broadcast_to_code(code, msg.clone()).await {
        None
    } else {
        Some(msg)
    }
}

pub async fn handle_configure_game(
    state: &Arc<AppState>,
    connection_id: &ConnectionId,
    host_name: String,
    mode: GameMode,
    category: Option<String>,
    manual_word: Option<String>,
) -> Option<ServerMessage> {
    tracing::info!("Configure game: host={}, mode={:?}", host_name, mode);
    match state
        .configure(connection_id, host_name, mode, category, manual_word)
        .await
    {
        Ok(code) => Some(ServerMessage::RoomConfigured { code }),
        Err(e) => Some(ServerMessage::error(&e)),
    }
}

pub async fn handle_start_round(state: &Arc<AppState>, code: RoomCode) -> Option<ServerMessage> {
    match state.start_round(&code).await {
        Ok(_) => None,
        Err(e) => report_round_error(state, &code, e).await,
    }
}

pub async fn handle_rotate_word(state: &Arc<AppState>, code: RoomCode) -> Option<ServerMessage> {
    match state.rotate_word(&code).await {
        Ok(()) => None,
        Err(e) => Some(ServerMessage::error(&e)),
    }
}

pub async fn handle_submit_manual_word(
    state: &Arc<AppState>,
    connection_id: &ConnectionId,
    code: RoomCode,
    word: String,
) -> Option<ServerMessage> {
    match state.submit_manual_word(&code, connection_id, word).await {
        Ok(()) => None,
        Err(e) => Some(ServerMessage::error(&e)),
    }
}

pub async fn handle_request_replay(state: &Arc<AppState>, code: RoomCode) -> Option<ServerMessage> {
    if !state.request_replay(&code).await {
        tracing::debug!("Replay request for room {} ignored", code);
    }
    None
}
