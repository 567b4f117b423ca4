use crate::error::GameError;
use crate::types::*;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "t", rename_all = "snake_case")]
pub enum ClientMessage {
    /// Create a room with the sender as host
    ConfigureGame {
        host_name: String,
        mode: GameMode,
        #[serde(default)]
        category: Option<String>,
        #[serde(default)]
        manual_word: Option<String>,
    },
    JoinGame {
        code: RoomCode,
        name: String,
    },
    StartRound {
        code: RoomCode,
    },
    /// Pick a new word (random modes) or ask the host for one (manual mode)
    RotateWord {
        code: RoomCode,
    },
    /// Open the "play again" confirmation window
    RequestReplay {
        code: RoomCode,
    },
    ReplayResponse {
        code: RoomCode,
        accepted: bool,
    },
    SubmitManualWord {
        code: RoomCode,
        word: String,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "t", rename_all = "snake_case")]
pub enum ServerMessage {
    /// First message on every connection
    Welcome {
        protocol: String,
        connection_id: ConnectionId,
        server_now: String,
    },
    /// Sent to the host after configure_game
    RoomConfigured {
        code: RoomCode,
    },
    /// Sent to a player after a successful join
    Joined {
        code: RoomCode,
        player_id: ConnectionId,
    },
    RosterUpdated {
        code: RoomCode,
        players: Vec<PlayerInfo>,
    },
    JoinError {
        code: String,
        msg: String,
    },
    RoundError {
        code: String,
        msg: String,
    },
    /// Per-player role for the round that just started
    YourRole {
        word: String,
        impostor: bool,
        mode: GameMode,
        category: Option<String>,
    },
    ReplayRequested {
        seconds: u64,
        deadline: String,
    },
    /// Sent to players dropped at the end of a confirmation window
    Kicked {
        code: RoomCode,
        msg: String,
    },
    WordUpdated {
        word: String,
    },
    /// Sent to the host of a manual room when the next word is needed
    ManualWordRequested {
        code: RoomCode,
    },
    WaitingStatus {
        msg: String,
    },
    /// The room is ready; clients start the next round themselves
    ReadyForNextRound {
        code: RoomCode,
    },
    Error {
        code: String,
        msg: String,
    },
}

impl ServerMessage {
    pub fn join_error(err: &GameError) -> Self {
        ServerMessage::JoinError {
            code: err.code().to_string(),
            msg: err.to_string(),
        }
    }

    pub fn round_error(err: &GameError) -> Self {
        ServerMessage::RoundError {
            code: err.code().to_string(),
            msg: err.to_string(),
        }
    }

    pub fn error(err: &GameError) -> Self {
        ServerMessage::Error {
            code: err.code().to_string(),
            msg: err.to_string(),
        }
    }
}

/// Public player info (no connection internals beyond the id)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PlayerInfo {
    pub id: ConnectionId,
    pub name: String,
    pub is_host: bool,
}

impl From<&Player> for PlayerInfo {
    fn from(p: &Player) -> Self {
        Self {
            id: p.id.clone(),
            name: p.name.clone(),
            is_host: p.is_host,
        }
    }
}
