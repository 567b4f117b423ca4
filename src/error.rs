//! Validation errors reported back to clients
//!
//! None of these are fatal. The ws layer turns them into `join_error`,
//! `round_error` or `error` events using the stable code from [`GameError::code`].

use crate::types::RoomCode;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GameError {
    #[error("Room {0} does not exist")]
    RoomNotFound(RoomCode),

    #[error("Room {0} has no secret word yet")]
    RoomNotReady(RoomCode),

    #[error("You are already in room {0}")]
    AlreadyJoined(RoomCode),

    #[error("You are not in room {0}")]
    NotInRoom(RoomCode),

    #[error("The name {0:?} is already taken in this room")]
    NameTaken(String),

    #[error("Not enough players: {have} of {need} needed")]
    NotEnoughPlayers { have: usize, need: usize },

    #[error("Name must not be empty")]
    InvalidName,

    #[error("Word must not be empty")]
    InvalidWord,
}

impl GameError {
    pub fn code(&self) -> &'static str {
        match self {
            GameError::RoomNotFound(_) => "ROOM_NOT_FOUND",
            GameError::RoomNotReady(_) => "ROOM_NOT_READY",
            GameError::AlreadyJoined(_) => "ALREADY_JOINED",
            GameError::NotInRoom(_) => "NOT_IN_ROOM",
            GameError::NameTaken(_) => "NAME_TAKEN",
            GameError::NotEnoughPlayers { .. } => "NOT_ENOUGH_PLAYERS",
            GameError::InvalidName => "INVALID_NAME",
            GameError::InvalidWord => "INVALID_WORD",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_and_codes() {
        let err = GameError::NotEnoughPlayers { have: 2, need: 3 };
        assert_eq!(err.code(), "NOT_ENOUGH_PLAYERS");
        assert_eq!(err.to_string(), "Not enough players: 2 of 3 needed");

        let err = GameError::NameTaken("Bob".to_string());
        assert_eq!(err.to_string(), "The name \"Bob\" is already taken in this room");
    }
}
