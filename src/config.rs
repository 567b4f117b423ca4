//! Server configuration loaded from environment variables

use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_REPLAY_WINDOW_SECS: u64 = 10;
const DEFAULT_STATIC_DIR: &str = "public";

#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// PORT
    pub port: u16,
    /// REPLAY_WINDOW_SECS: how long players have to confirm the next round
    pub replay_window: Duration,
    /// WORDS_PATH: optional JSON word bank replacing the built-in one
    pub words_path: Option<PathBuf>,
    /// STATIC_DIR: files served for any non-API route
    pub static_dir: PathBuf,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            replay_window: Duration::from_secs(DEFAULT_REPLAY_WINDOW_SECS),
            words_path: None,
            static_dir: PathBuf::from(DEFAULT_STATIC_DIR),
        }
    }
}

impl ServerConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let port = parse_env("PORT").unwrap_or(defaults.port);

        let replay_window = match parse_env::<u64>("REPLAY_WINDOW_SECS") {
            Some(0) => {
                tracing::warn!("REPLAY_WINDOW_SECS must be positive, using default");
                defaults.replay_window
            }
            Some(secs) => Duration::from_secs(secs),
            None => defaults.replay_window,
        };

        let words_path = non_empty_env("WORDS_PATH").map(PathBuf::from);
        let static_dir = non_empty_env("STATIC_DIR")
            .map(PathBuf::from)
            .unwrap_or(defaults.static_dir);

        Self {
            port,
            replay_window,
            words_path,
            static_dir,
        }
    }
}

fn non_empty_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

fn parse_env<T: std::str::FromStr>(key: &str) -> Option<T> {
    let raw = non_empty_env(key)?;
    match raw.parse() {
        Ok(value) => Some(value),
        Err(_) => {
            tracing::warn!("Ignoring invalid {}={:?}", key, raw);
            None
        }
    }
}
