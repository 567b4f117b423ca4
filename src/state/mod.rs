mod replay;
mod room;
mod round;

pub use replay::ReplayOutcome;
pub use room::RoomSummary;

use crate::config::ServerConfig;
use crate::protocol::{PlayerInfo, ServerMessage};
use crate::random::{self, RandomSource};
use crate::types::*;
use crate::words::WordBank;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::sync::{mpsc, RwLock};

/// Outbound half of a connection; sends never block
pub type ConnectionSender = mpsc::UnboundedSender<ServerMessage>;

/// Shared application state: the room registry plus the connection hub.
///
/// Every registry operation takes the `rooms` write lock once and holds it
/// until it is done, so operations never interleave. When both locks are
/// needed, `rooms` is always taken before `connections`.
#[derive(Clone)]
pub struct AppState {
    pub rooms: Arc<RwLock<HashMap<RoomCode, Room>>>,
    connections: Arc<RwLock<HashMap<ConnectionId, ConnectionSender>>>,
    rng: Arc<Mutex<Box<dyn RandomSource>>>,
    pub words: Arc<WordBank>,
    pub config: ServerConfig,
}

impl AppState {
    pub fn new() -> Self {
        Self::with_parts(ServerConfig::default(), WordBank::builtin(), random::from_entropy())
    }

    pub fn with_parts(config: ServerConfig, words: WordBank, rng: Box<dyn RandomSource>) -> Self {
        Self {
            rooms: Arc::new(RwLock::new(HashMap::new())),
            connections: Arc::new(RwLock::new(HashMap::new())),
            rng: Arc::new(Mutex::new(rng)),
            words: Arc::new(words),
            config,
        }
    }

    /// Run `f` with exclusive access to the random source
    fn with_rng<T>(&self, f: impl FnOnce(&mut dyn RandomSource) -> T) -> T {
        let mut rng = self.rng.lock().unwrap_or_else(|e| e.into_inner());
        f(rng.as_mut())
    }

    /// Draw a fresh word for a random-mode room
    fn draw_word(&self, mode: GameMode, category: Option<&str>) -> Option<String> {
        self.with_rng(|rng| match mode {
            GameMode::Manual => None,
            GameMode::Random => self.words.random_word(rng),
            GameMode::RandomCategory => self.words.random_word_in(category, rng),
        })
    }

    /// Register a new connection and hand back its id and inbox
    pub async fn register_connection(&self) -> (ConnectionId, mpsc::UnboundedReceiver<ServerMessage>) {
        let id = ulid::Ulid::new().to_string();
        let (tx, rx) = mpsc::unbounded_channel();
        self.connections.write().await.insert(id.clone(), tx);
        tracing::debug!("Connection {} registered", id);
        (id, rx)
    }

    pub async fn unregister_connection(&self, id: &str) {
        self.connections.write().await.remove(id);
        tracing::debug!("Connection {} unregistered", id);
    }

    pub async fn connection_count(&self) -> usize {
        self.connections.read().await.len()
    }

    /// Send to a single connection. Unknown or closed connections are skipped.
    pub async fn send_to(&self, id: &str, msg: ServerMessage) {
        if let Some(tx) = self.connections.read().await.get(id) {
            if tx.send(msg).is_err() {
                tracing::debug!("Connection {} already closed, dropping message", id);
            }
        }
    }

    /// Send to every player currently in `room`
    pub async fn broadcast_room(&self, room: &Room, msg: ServerMessage) {
        let connections = self.connections.read().await;
        for player in &room.players {
            if let Some(tx) = connections.get(&player.id) {
                let _ = tx.send(msg.clone());
            }
        }
    }

    /// Send to the room with `code`. Returns false when there is no such room.
    pub async fn broadcast_to_code(&self, code: &str, msg: ServerMessage) -> bool {
        let rooms = self.rooms.read().await;
        match rooms.get(code) {
            Some(room) => {
                self.broadcast_room(room, msg).await;
                true
            }
            None => false,
        }
    }

    pub async fn broadcast_roster(&self, room: &Room) {
        let msg = ServerMessage::RosterUpdated {
            code: room.code.clone(),
            players: room.players.iter().map(PlayerInfo::from).collect(),
        };
        self.broadcast_room(room, msg).await;
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}
