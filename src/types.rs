use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Opaque ID types for type safety
pub type RoomCode = String;
pub type ConnectionId = String;

/// Minimum number of players needed to start or continue a round
pub const MIN_PLAYERS: usize = 3;

/// What the impostor sees instead of the secret word
pub const IMPOSTOR_MESSAGE: &str = "You are the impostor! Try to figure out the secret word.";

/// How the secret word of a room is chosen
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum GameMode {
    /// Host types the word
    Manual,
    /// Uniform pick over every word in the bank
    Random,
    /// Uniform pick within one category
    RandomCategory,
}

impl GameMode {
    pub fn is_random(&self) -> bool {
        !matches!(self, GameMode::Manual)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Player {
    pub id: ConnectionId,
    pub name: String,
    pub is_host: bool,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ReplayPhase {
    Idle,
    AwaitingConfirmation,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ConfirmationStatus {
    Pending,
    Accept,
    Reject,
}

#[derive(Debug, Clone)]
pub struct Room {
    pub code: RoomCode,
    /// Join order is preserved
    pub players: Vec<Player>,
    /// `None` until a manual-mode host supplies a word
    pub word: Option<String>,
    pub impostor: Option<ConnectionId>,
    pub mode: GameMode,
    pub category: Option<String>,
    /// Set for manual mode, where the host wrote the word and already knows it
    pub host_excluded: bool,
    pub host_id: ConnectionId,
    pub host_name: String,
    pub replay_phase: ReplayPhase,
    pub confirmations: HashMap<ConnectionId, ConfirmationStatus>,
}

impl Room {
    pub fn has_player(&self, id: &str) -> bool {
        self.players.iter().any(|p| p.id == id)
    }

    pub fn name_taken(&self, name: &str) -> bool {
        let lowered = name.to_lowercase();
        self.players.iter().any(|p| p.name.to_lowercase() == lowered)
    }

    pub fn is_awaiting_confirmation(&self) -> bool {
        self.replay_phase == ReplayPhase::AwaitingConfirmation
    }

    /// Drop a player and anything that still points at them
    pub fn remove_player(&mut self, id: &str) -> Option<Player> {
        let index = self.players.iter().position(|p| p.id == id)?;
        let player = self.players.remove(index);
        self.confirmations.remove(id);
        if self.impostor.as_deref() == Some(id) {
            self.impostor = None;
        }
        self.ensure_host();
        Some(player)
    }

    /// Hand the host role to the longest-standing player once the host is
    /// gone. `host_excluded` follows `host_id`, so it moves with the role.
    pub fn ensure_host(&mut self) {
        if self.has_player(&self.host_id) {
            return;
        }
        let Some(next) = self.players.first_mut() else {
            return;
        };
        next.is_host = true;
        self.host_id = next.id.clone();
        self.host_name = next.name.clone();
        tracing::info!("{} is now host of room {}", self.host_name, self.code);
    }
}
