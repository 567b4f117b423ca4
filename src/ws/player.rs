//! Player message handlers

use crate::protocol::ServerMessage;
use crate::state::AppState;
use crate::types::{ConnectionId, RoomCode};
use std::sync::Arc;

pub async fn handle_join_game(
    state: &Arc<AppState>,
    connection_id: &ConnectionId,
    code: RoomCode,
    name: String,
) -> Option<ServerMessage> {
    tracing::info!("Join request for room {}: {}", code, name);
    match state.join(&code, connection_id, name).await {
        Ok(()) => Some(ServerMessage::Joined {
            code,
            player_id: connection_id.clone(),
        }),
        Err(e) => {
            tracing::info!("Join refused: {}", e);
            Some(ServerMessage::join_error(&e))
        }
    }
}

pub async fn handle_replay_response(
    state: &Arc<AppState>,
    connection_id: &ConnectionId,
    code: RoomCode,
    accepted: bool,
) -> Option<ServerMessage> {
    if !state.record_response(&code, connection_id, accepted).await {
        tracing::debug!(
            "Replay response from {} for room {} ignored",
            connection_id,
            code
        );
    }
    None
}
