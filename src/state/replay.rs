use super::AppState;
use crate::broadcast::spawn_replay_resolver;
use crate::error::GameError;
use crate::protocol::ServerMessage;
use crate::types::*;
use std::collections::HashMap;
use std::sync::Arc;

const KICKED_MESSAGE: &str = "You did not confirm the next round and were removed from the room.";
const WAITING_MESSAGE: &str = "Waiting for the next round to start...";

/// What a confirmation window ended with
#[derive(Debug, Clone, PartialEq)]
pub struct ReplayOutcome {
    pub kept: Vec<ConnectionId>,
    pub kicked: Vec<ConnectionId>,
    /// True when enough players stayed for another round
    pub ready: bool,
}

impl AppState {
    /// Open the confirmation window for `code` and schedule its resolution.
    /// Returns false when the room is missing or a window is already open.
    pub async fn request_replay(self: &Arc<Self>, code: &str) -> bool {
        let window = self.config.replay_window;
        {
            let mut rooms = self.rooms.write().await;
            let room = match rooms.get_mut(code) {
                Some(room) if !room.is_awaiting_confirmation() => room,
                _ => return false,
            };

            room.replay_phase = ReplayPhase::AwaitingConfirmation;
            room.confirmations = room
                .players
                .iter()
                .map(|p| (p.id.clone(), ConfirmationStatus::Pending))
                .collect::<HashMap<_, _>>();

            let deadline = chrono::Utc::now()
                + chrono::Duration::from_std(window).unwrap_or_else(|_| chrono::Duration::zero());
            tracing::info!(
                "Replay requested in room {}, {} players have {}s to confirm",
                code,
                room.players.len(),
                window.as_secs()
            );
            self.broadcast_room(
                room,
                ServerMessage::ReplayRequested {
                    seconds: window.as_secs(),
                    deadline: deadline.to_rfc3339(),
                },
            )
            .await;
        }

        spawn_replay_resolver(self.clone(), code.to_string(), window);
        true
    }

    /// Record a player's answer. Ignored outside a window or for players
    /// the window is not tracking.
    pub async fn record_response(&self, code: &str, player_id: &str, accepted: bool) -> bool {
        let mut rooms = self.rooms.write().await;
        let Some(room) = rooms.get_mut(code) else {
            return false;
        };
        if !room.is_awaiting_confirmation() {
            return false;
        }
        let Some(status) = room.confirmations.get_mut(player_id) else {
            return false;
        };

        *status = if accepted {
            ConfirmationStatus::Accept
        } else {
            ConfirmationStatus::Reject
        };
        tracing::debug!("{} answered {:?} in room {}", player_id, status, code);
        true
    }

    /// Close the confirmation window. Works on whatever the room looks like
    /// now; a room that is gone or no longer waiting is left alone.
    pub async fn resolve_replay(&self, code: &str) -> Option<ReplayOutcome> {
        let mut rooms = self.rooms.write().await;
        let room = rooms.get_mut(code)?;
        if !room.is_awaiting_confirmation() {
            return None;
        }

        let confirmations = std::mem::take(&mut room.confirmations);
        room.replay_phase = ReplayPhase::Idle;

        let (kept, kicked): (Vec<Player>, Vec<Player>) =
            room.players.drain(..).partition(|p| {
                confirmations.get(&p.id) == Some(&ConfirmationStatus::Accept)
            });
        room.players = kept;
        room.ensure_host();
        if let Some(impostor) = &room.impostor {
            if !room.has_player(impostor) {
                room.impostor = None;
            }
        }

        for player in &kicked {
            self.send_to(
                &player.id,
                ServerMessage::Kicked {
                    code: code.to_string(),
                    msg: KICKED_MESSAGE.to_string(),
                },
            )
            .await;
        }

        let mut outcome = ReplayOutcome {
            kept: room.players.iter().map(|p| p.id.clone()).collect(),
            kicked: kicked.into_iter().map(|p| p.id).collect(),
            ready: false,
        };
        tracing::info!(
            "Replay window closed in room {}: {} stay, {} removed",
            code,
            outcome.kept.len(),
            outcome.kicked.len()
        );

        if room.players.is_empty() {
            rooms.remove(code);
            tracing::info!("Room {} is empty, deleted", code);
            return Some(outcome);
        }

        if room.players.len() < MIN_PLAYERS {
            let err = GameError::NotEnoughPlayers {
                have: room.players.len(),
                need: MIN_PLAYERS,
            };
            self.broadcast_room(room, ServerMessage::round_error(&err)).await;
            self.broadcast_roster(room).await;
            return Some(outcome);
        }

        if room.mode.is_random() {
            if let Some(word) = self.draw_word(room.mode, room.category.as_deref()) {
                room.word = Some(word);
            }
        } else {
            self.send_to(
                &room.host_id,
                ServerMessage::ManualWordRequested {
                    code: code.to_string(),
                },
            )
            .await;
        }

        self.broadcast_roster(room).await;
        self.broadcast_room(
            room,
            ServerMessage::WaitingStatus {
                msg: WAITING_MESSAGE.to_string(),
            },
        )
        .await;
        self.broadcast_room(
            room,
            ServerMessage::ReadyForNextRound {
                code: code.to_string(),
            },
        )
        .await;

        outcome.ready = true;
        Some(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use super::*;
    use std::time::Duration;

    async fn room_with_players(state: &Arc<AppState>, ids: &[ConnectionId], mode: GameMode) -> RoomCode {
        let word = (mode == GameMode::Manual).then(|| "kite".to_string());
        let code = state
            .configure(&ids[0], "Player 0".into(), mode, None, word)
            .await
            .unwrap();
        for (i, id) in ids.iter().enumerate().skip(1) {
            state.join(&code, id, format!("Player {}", i)).await.unwrap();
        }
        code
    }

    #[tokio::test]
    async fn test_request_replay_marks_everyone_pending() {
        let state = scripted_state(varied());
        let mut conns = connect(&state, 3).await;
        let ids: Vec<_> = conns.iter().map(|(id, _)| id.clone()).collect();
        let code = room_with_players(&state, &ids, GameMode::Random).await;
        for (_, rx) in conns.iter_mut() {
            drain(rx);
        }

        assert!(state.request_replay(&code).await);
        assert!(!state.request_replay(&code).await, "window already open");
        assert!(!state.request_replay("NOPE00").await);

        let room = state.get_room(&code).await.unwrap();
        assert!(room.is_awaiting_confirmation());
        assert_eq!(room.confirmations.len(), 3);
        assert!(room
            .confirmations
            .values()
            .all(|s| *s == ConfirmationStatus::Pending));

        for (_, rx) in conns.iter_mut() {
            let msgs = drain(rx);
            assert!(matches!(
                &msgs[..],
                [ServerMessage::ReplayRequested { seconds: 10, .. }]
            ));
        }
    }

    #[tokio::test]
    async fn test_record_response_requires_open_window() {
        let state = scripted_state(varied());
        let ids: Vec<ConnectionId> = vec!["a".into(), "b".into(), "c".into()];
        let code = room_with_players(&state, &ids, GameMode::Random).await;

        assert!(!state.record_response(&code, "a", true).await);
        state.request_replay(&code).await;
        assert!(state.record_response(&code, "a", true).await);
        assert!(state.record_response(&code, "b", false).await);
        assert!(!state.record_response(&code, "stranger", true).await);

        let room = state.get_room(&code).await.unwrap();
        assert_eq!(room.confirmations["a"], ConfirmationStatus::Accept);
        assert_eq!(room.confirmations["b"], ConfirmationStatus::Reject);
        assert_eq!(room.confirmations["c"], ConfirmationStatus::Pending);
        assert!(room.is_awaiting_confirmation(), "answers never close the window");
    }

    #[tokio::test]
    async fn test_resolve_keeps_only_accepting_players() {
        let state = scripted_state(varied());
        let mut conns = connect(&state, 5).await;
        let ids: Vec<_> = conns.iter().map(|(id, _)| id.clone()).collect();
        let code = room_with_players(&state, &ids, GameMode::Random).await;

        state.request_replay(&code).await;
        for id in &ids[..3] {
            state.record_response(&code, id, true).await;
        }
        state.record_response(&code, &ids[3], false).await;
        for (_, rx) in conns.iter_mut() {
            drain(rx);
        }

        let outcome = state.resolve_replay(&code).await.unwrap();
        assert_eq!(outcome.kept, ids[..3].to_vec());
        assert_eq!(outcome.kicked, ids[3..].to_vec());
        assert!(outcome.ready);

        let room = state.get_room(&code).await.unwrap();
        assert_eq!(room.replay_phase, ReplayPhase::Idle);
        assert!(room.confirmations.is_empty());
        assert_eq!(room.players.len(), 3);

        for (id, rx) in conns.iter_mut() {
            let msgs = drain(rx);
            if ids[3..].contains(id) {
                assert!(matches!(&msgs[..], [ServerMessage::Kicked { .. }]));
            } else {
                assert!(matches!(
                    &msgs[..],
                    [
                        ServerMessage::RosterUpdated { players, .. },
                        ServerMessage::WaitingStatus { .. },
                        ServerMessage::ReadyForNextRound { .. },
                    ] if players.len() == 3
                ));
            }
        }

        assert!(state.resolve_replay(&code).await.is_none(), "already resolved");
    }

    #[tokio::test]
    async fn test_resolve_with_too_few_accepts() {
        let state = scripted_state(varied());
        let mut conns = connect(&state, 3).await;
        let ids: Vec<_> = conns.iter().map(|(id, _)| id.clone()).collect();
        let code = room_with_players(&state, &ids, GameMode::Random).await;
        let word_before = state.get_room(&code).await.unwrap().word;

        state.request_replay(&code).await;
        state.record_response(&code, &ids[0], true).await;
        state.record_response(&code, &ids[1], true).await;
        for (_, rx) in conns.iter_mut() {
            drain(rx);
        }

        let outcome = state.resolve_replay(&code).await.unwrap();
        assert!(!outcome.ready);
        assert_eq!(outcome.kicked, vec![ids[2].clone()]);

        let room = state.get_room(&code).await.unwrap();
        assert_eq!(room.word, word_before);
        assert_eq!(room.players.len(), 2);

        let msgs = drain(&mut conns[0].1);
        assert!(matches!(
            &msgs[..],
            [
                ServerMessage::RoundError { code, .. },
                ServerMessage::RosterUpdated { .. },
            ] if code == "NOT_ENOUGH_PLAYERS"
        ));
    }

    #[tokio::test]
    async fn test_resolve_deletes_room_when_nobody_accepts() {
        let state = scripted_state(varied());
        let ids: Vec<ConnectionId> = vec!["a".into(), "b".into(), "c".into()];
        let code = room_with_players(&state, &ids, GameMode::Random).await;

        state.request_replay(&code).await;
        let outcome = state.resolve_replay(&code).await.unwrap();
        assert!(outcome.kept.is_empty());
        assert_eq!(outcome.kicked.len(), 3);
        assert!(state.get_room(&code).await.is_none());
    }

    #[tokio::test]
    async fn test_resolve_manual_room_asks_host_for_word() {
        let state = scripted_state(varied());
        let mut conns = connect(&state, 3).await;
        let ids: Vec<_> = conns.iter().map(|(id, _)| id.clone()).collect();
        let code = room_with_players(&state, &ids, GameMode::Manual).await;

        state.request_replay(&code).await;
        for id in &ids {
            state.record_response(&code, id, true).await;
        }
        drain(&mut conns[0].1);

        let outcome = state.resolve_replay(&code).await.unwrap();
        assert!(outcome.ready);
        let msgs = drain(&mut conns[0].1);
        assert_eq!(
            msgs[0],
            ServerMessage::ManualWordRequested { code: code.clone() }
        );
        assert_eq!(
            state.get_room(&code).await.unwrap().word.as_deref(),
            Some("kite")
        );
    }

    #[tokio::test]
    async fn test_kicked_host_hands_over_word_request() {
        let state = scripted_state(varied());
        let mut conns = connect(&state, 4).await;
        let ids: Vec<_> = conns.iter().map(|(id, _)| id.clone()).collect();
        let code = room_with_players(&state, &ids, GameMode::Manual).await;

        state.request_replay(&code).await;
        state.record_response(&code, &ids[0], false).await;
        for id in &ids[1..] {
            state.record_response(&code, id, true).await;
        }
        for (_, rx) in conns.iter_mut() {
            drain(rx);
        }

        let outcome = state.resolve_replay(&code).await.unwrap();
        assert!(outcome.ready);
        assert_eq!(outcome.kicked, vec![ids[0].clone()]);

        let room = state.get_room(&code).await.unwrap();
        assert_eq!(room.host_id, ids[1]);
        assert_eq!(room.host_name, "Player 1");
        assert!(room.players[0].is_host);
        assert!(room.host_excluded);

        let old_host = drain(&mut conns[0].1);
        assert!(matches!(&old_host[..], [ServerMessage::Kicked { .. }]));
        let new_host = drain(&mut conns[1].1);
        assert_eq!(
            new_host[0],
            ServerMessage::ManualWordRequested { code: code.clone() }
        );
        assert!(!drain(&mut conns[2].1)
            .iter()
            .any(|m| matches!(m, ServerMessage::ManualWordRequested { .. })));

        // The removed host can no longer change the word
        assert_eq!(
            state
                .submit_manual_word(&code, &ids[0], "hijack".into())
                .await,
            Err(GameError::NotInRoom(code.clone()))
        );
        state
            .submit_manual_word(&code, &ids[1], "comet".into())
            .await
            .unwrap();
        assert_eq!(
            state.get_room(&code).await.unwrap().word.as_deref(),
            Some("comet")
        );
    }

    #[tokio::test]
    async fn test_late_joiner_is_not_tracked() {
        let state = scripted_state(varied());
        let ids: Vec<ConnectionId> = vec!["a".into(), "b".into(), "c".into()];
        let code = room_with_players(&state, &ids, GameMode::Random).await;

        state.request_replay(&code).await;
        state.join(&code, "late", "Latecomer".into()).await.unwrap();
        assert!(!state.record_response(&code, "late", true).await);
        for id in &ids {
            state.record_response(&code, id, true).await;
        }

        let outcome = state.resolve_replay(&code).await.unwrap();
        assert_eq!(outcome.kicked, vec!["late".to_string()]);
        assert!(outcome.ready);
    }

    #[tokio::test(start_paused = true)]
    async fn test_window_resolves_after_timeout() {
        let state = scripted_state(varied());
        let ids: Vec<ConnectionId> = vec!["a".into(), "b".into(), "c".into(), "d".into()];
        let code = room_with_players(&state, &ids, GameMode::Random).await;

        state.request_replay(&code).await;
        for id in &ids[..3] {
            state.record_response(&code, id, true).await;
        }

        tokio::time::sleep(Duration::from_secs(9)).await;
        assert!(state.get_room(&code).await.unwrap().is_awaiting_confirmation());

        tokio::time::sleep(Duration::from_secs(2)).await;
        let room = state.get_room(&code).await.unwrap();
        assert!(!room.is_awaiting_confirmation());
        assert_eq!(room.players.len(), 3);
        assert!(!room.has_player("d"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_timer_tolerates_deleted_room() {
        let state = scripted_state(varied());
        let ids: Vec<ConnectionId> = vec!["a".into(), "b".into(), "c".into()];
        let code = room_with_players(&state, &ids, GameMode::Random).await;

        state.request_replay(&code).await;
        for id in &ids {
            state.remove_player(id).await;
        }
        assert!(state.get_room(&code).await.is_none());

        tokio::time::sleep(Duration::from_secs(11)).await;
        assert!(state.rooms.read().await.is_empty());
    }
}
