use super::AppState;
use crate::error::GameError;
use crate::random;
use crate::types::*;
use serde::Serialize;
use std::collections::HashMap;

/// Room overview for the operator API (never includes the word)
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RoomSummary {
    pub code: RoomCode,
    pub players: usize,
    pub mode: GameMode,
    pub category: Option<String>,
    pub awaiting_confirmation: bool,
}

fn clean(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

impl AppState {
    /// Create a room with `host_id` as its only player and return the code
    pub async fn configure(
        &self,
        host_id: &str,
        host_name: String,
        mode: GameMode,
        category: Option<String>,
        manual_word: Option<String>,
    ) -> Result<RoomCode, GameError> {
        let host_name = clean(Some(host_name)).ok_or(GameError::InvalidName)?;
        let category = clean(category);

        let word = match mode {
            GameMode::Manual => clean(manual_word),
            _ => self.draw_word(mode, category.as_deref()),
        };

        let mut rooms = self.rooms.write().await;

        let code = loop {
            let code = self.with_rng(random::room_code);
            if !rooms.contains_key(&code) {
                break code;
            }
        };

        let room = Room {
            code: code.clone(),
            players: vec![Player {
                id: host_id.to_string(),
                name: host_name.clone(),
                is_host: true,
            }],
            word,
            impostor: None,
            mode,
            category,
            host_excluded: mode == GameMode::Manual,
            host_id: host_id.to_string(),
            host_name,
            replay_phase: ReplayPhase::Idle,
            confirmations: HashMap::new(),
        };

        tracing::info!(
            "Room {} configured by {} (mode {:?}, word set: {})",
            code,
            room.host_name,
            mode,
            room.word.is_some()
        );
        self.broadcast_roster(&room).await;
        rooms.insert(code.clone(), room);
        Ok(code)
    }

    /// Add a player to an existing room
    pub async fn join(&self, code: &str, player_id: &str, name: String) -> Result<(), GameError> {
        let name = clean(Some(name)).ok_or(GameError::InvalidName)?;

        let mut rooms = self.rooms.write().await;
        let room = rooms
            .get_mut(code)
            .ok_or_else(|| GameError::RoomNotFound(code.to_string()))?;

        if room.word.is_none() {
            return Err(GameError::RoomNotReady(code.to_string()));
        }
        if room.has_player(player_id) {
            return Err(GameError::AlreadyJoined(code.to_string()));
        }
        if room.name_taken(&name) {
            return Err(GameError::NameTaken(name));
        }

        tracing::info!("{} joined room {}", name, code);
        room.players.push(Player {
            id: player_id.to_string(),
            name,
            is_host: false,
        });
        self.broadcast_roster(room).await;
        Ok(())
    }

    /// Remove a connection from every room it is in. Rooms left empty are
    /// deleted. Returns the codes of the rooms the player was removed from.
    pub async fn remove_player(&self, player_id: &str) -> Vec<RoomCode> {
        let mut rooms = self.rooms.write().await;
        let mut affected = Vec::new();
        let mut emptied = Vec::new();

        for room in rooms.values_mut() {
            if room.remove_player(player_id).is_none() {
                continue;
            }
            affected.push(room.code.clone());
            if room.players.is_empty() {
                emptied.push(room.code.clone());
            } else {
                self.broadcast_roster(room).await;
            }
        }

        for code in &emptied {
            rooms.remove(code);
            tracing::info!("Room {} is empty, deleted", code);
        }

        if !affected.is_empty() {
            tracing::info!("Removed {} from rooms {:?}", player_id, affected);
        }
        affected
    }

    pub async fn get_room(&self, code: &str) -> Option<Room> {
        self.rooms.read().await.get(code).cloned()
    }

    pub async fn room_summaries(&self) -> Vec<RoomSummary> {
        let rooms = self.rooms.read().await;
        let mut summaries: Vec<_> = rooms
            .values()
            .map(|r| RoomSummary {
                code: r.code.clone(),
                players: r.players.len(),
                mode: r.mode,
                category: r.category.clone(),
                awaiting_confirmation: r.is_awaiting_confirmation(),
            })
            .collect();
        summaries.sort_by(|a, b| a.code.cmp(&b.code));
        summaries
    }
}
