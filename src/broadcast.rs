use crate::state::AppState;
use crate::types::RoomCode;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;

/// Spawn the one-shot task that closes a room's confirmation window.
///
/// There is no way to cancel it. When it fires it looks the room up again by
/// code, so a room that emptied out in the meantime is simply skipped.
pub fn spawn_replay_resolver(
    state: Arc<AppState>,
    code: RoomCode,
    window: Duration,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        tokio::time::sleep(window).await;

        match state.resolve_replay(&code).await {
            Some(outcome) if outcome.ready => {
                tracing::info!("Room {} is ready for the next round", code);
            }
            Some(_) => {
                tracing::info!("Room {} cannot continue after the replay window", code);
            }
            None => {
                tracing::debug!("Replay window for room {} had nothing to resolve", code);
            }
        }
    })
}
