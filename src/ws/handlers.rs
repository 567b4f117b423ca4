//! WebSocket message dispatch
//!
//! Entry point for every parsed client message. Replies meant only for the
//! sender are returned; anything room-wide goes out through the state's
//! connection hub.

use crate::protocol::{ClientMessage, ServerMessage};
use crate::state::AppState;
use crate::types::{ConnectionId, RoomCode};
use std::sync::Arc;

use super::{host, player};

/// Room codes are shown in upper case but typed by hand
fn normalize_code(code: &str) -> RoomCode {
    code.trim().to_uppercase()
}

/// Handle a client message and return an optional reply for the sender
pub async fn handle_message(
    msg: ClientMessage,
    connection_id: &ConnectionId,
    state: &Arc<AppState>,
) -> Option<ServerMessage> {
    match msg {
        ClientMessage::ConfigureGame {
            host_name,
            mode,
            category,
            manual_word,
        } => {
            host::handle_configure_game(state, connection_id, host_name, mode, category, manual_word)
                .await
        }

        ClientMessage::JoinGame { code, name } => {
            player::handle_join_game(state, connection_id, normalize_code(&code), name).await
        }

        ClientMessage::StartRound { code } => {
            host::handle_start_round(state, normalize_code(&code)).await
        }

        ClientMessage::RotateWord { code } => {
            host::handle_rotate_word(state, normalize_code(&code)).await
        }

        ClientMessage::RequestReplay { code } => {
            host::handle_request_replay(state, normalize_code(&code)).await
        }

        ClientMessage::ReplayResponse { code, accepted } => {
            player::handle_replay_response(state, connection_id, normalize_code(&code), accepted)
                .await
        }

        ClientMessage::SubmitManualWord { code, word } => {
            host::handle_submit_manual_word(state, connection_id, normalize_code(&code), word)
                .await
        }
    }
}
