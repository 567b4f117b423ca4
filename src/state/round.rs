use super::AppState;
use crate::error::GameError;
use crate::protocol::ServerMessage;
use crate::types::*;

impl AppState {
    /// Pick an impostor and send every player their role.
    ///
    /// Returns the impostor's id. Errors are not broadcast here; the caller
    /// decides whether they go to the room or only to the sender.
    pub async fn start_round(&self, code: &str) -> Result<ConnectionId, GameError> {
        let mut rooms = self.rooms.write().await;
        let room = rooms
            .get_mut(code)
            .ok_or_else(|| GameError::RoomNotFound(code.to_string()))?;

        if room.players.len() < MIN_PLAYERS {
            return Err(GameError::NotEnoughPlayers {
                have: room.players.len(),
                need: MIN_PLAYERS,
            });
        }
        let word = room
            .word
            .clone()
            .ok_or_else(|| GameError::RoomNotReady(code.to_string()))?;

        let mut pool: Vec<&Player> = room
            .players
            .iter()
            .filter(|p| !(room.host_excluded && p.id == room.host_id))
            .collect();
        if pool.is_empty() {
            pool = room.players.iter().collect();
        }
        let impostor = pool[self.with_rng(|rng| rng.index(pool.len()))].id.clone();
        room.impostor = Some(impostor.clone());

        tracing::info!(
            "Round started in room {} with {} players",
            code,
            room.players.len()
        );

        for player in &room.players {
            let is_impostor = player.id == impostor;
            let msg = ServerMessage::YourRole {
                word: if is_impostor {
                    IMPOSTOR_MESSAGE.to_string()
                } else {
                    word.clone()
                },
                impostor: is_impostor,
                mode: room.mode,
                category: room.category.clone(),
            };
            self.send_to(&player.id, msg).await;
        }

        Ok(impostor)
    }

    /// Random modes get a fresh word broadcast to the room; manual rooms ask
    /// their host for the next one.
    pub async fn rotate_word(&self, code: &str) -> Result<(), GameError> {
        let mut rooms = self.rooms.write().await;
        let room = rooms
            .get_mut(code)
            .ok_or_else(|| GameError::RoomNotFound(code.to_string()))?;

        if room.mode.is_random() {
            if let Some(word) = self.draw_word(room.mode, room.category.as_deref()) {
                tracing::info!("Rotated word in room {}", code);
                room.word = Some(word.clone());
                self.broadcast_room(room, ServerMessage::WordUpdated { word }).await;
            }
        } else {
            tracing::info!("Asking host of room {} for a new word", code);
            self.send_to(
                &room.host_id,
                ServerMessage::ManualWordRequested {
                    code: code.to_string(),
                },
            )
            .await;
        }
        Ok(())
    }

    /// Overwrite the room's word with one typed by a room member
    pub async fn submit_manual_word(
        &self,
        code: &str,
        sender_id: &str,
        word: String,
    ) -> Result<(), GameError> {
        let word = word.trim().to_string();
        if word.is_empty() {
            return Err(GameError::InvalidWord);
        }

        let mut rooms = self.rooms.write().await;
        let room = rooms
            .get_mut(code)
            .ok_or_else(|| GameError::RoomNotFound(code.to_string()))?;
        if !room.has_player(sender_id) {
            return Err(GameError::NotInRoom(code.to_string()));
        }

        tracing::info!("Manual word submitted for room {}", code);
        room.word = Some(word.clone());
        self.broadcast_room(room, ServerMessage::WordUpdated { word }).await;
        Ok(())
    }
}
