use super::Session;
use crate::{clock, AppState, EventBus, GameHistory, GameState, HistoryPatch, SessionEvent};
use chrono::{DateTime, Utc};
use tracing::{debug, info};

/// Which record fields a reconciliation overwrites.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reconcile {
    /// Players, completion flag and final round.
    Full,
    /// Players only; used after score edits and roster changes.
    PlayersOnly,
}

impl Session<'_> {
    /// Syncs the live game into history: update the linked record, or create
    /// one when none represents this game yet.
    pub(super) fn reconcile(&mut self, mode: Reconcile, events: &mut EventBus) {
        let now = self.clock.now();
        let AppState {
            current_game,
            game_history,
        } = &mut *self.state;

        match linked_record(current_game, game_history.records(), now) {
            Some(id) => {
                let mut patch = HistoryPatch::players(current_game.players.clone());
                if mode == Reconcile::Full {
                    patch = patch.with_completion(
                        current_game.is_game_complete,
                        current_game.current_round,
                    );
                }
                game_history.update(&id, &patch);
                debug!(record = %id, ?mode, "history record updated");
                current_game.history_id = Some(id.clone());
                events.push(SessionEvent::HistoryUpdated { id });
            }
            None => {
                let id = self.ids.next_id();
                game_history.insert(GameHistory::snapshot(id.clone(), now, current_game));
                info!(record = %id, players = current_game.players.len(), "history record created");
                current_game.history_id = Some(id.clone());
                events.push(SessionEvent::HistoryCreated { id });
            }
        }
    }
}

/// The record representing `game`: its explicit link when that record still
/// exists, otherwise a record created today that shares a player with it.
fn linked_record(game: &GameState, records: &[GameHistory], now: DateTime<Utc>) -> Option<String> {
    if let Some(id) = game.history_id.as_deref() {
        if records.iter().any(|record| record.id == id) {
            return Some(id.to_string());
        }
    }
    let today = clock::day_prefix(now);
    records
        .iter()
        .find(|record| {
            record.shares_player_with(&game.players) && record.created_on_or_after(&today)
        })
        .map(|record| record.id.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Player, SequentialIds};
    use chrono::TimeZone;

    fn at(day: u32, hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, day, hour, 0, 0).unwrap()
    }

    fn game(ids: &[&str]) -> GameState {
        GameState::in_progress(
            ids.iter()
                .map(|id| Player::new(*id, *id, "#3B82F6"))
                .collect(),
        )
    }

    fn record_for(id: &str, created: DateTime<Utc>, source: &GameState) -> GameHistory {
        GameHistory::snapshot(id, created, source)
    }

    #[test]
    fn explicit_link_wins_over_heuristic() {
        let mut live = game(&["a", "b"]);
        live.history_id = Some("old".to_string());
        let records = vec![
            record_for("today", at(19, 8), &live),
            record_for("old", at(1, 8), &live),
        ];
        assert_eq!(linked_record(&live, &records, at(19, 12)).as_deref(), Some("old"));
    }

    #[test]
    fn dangling_link_falls_back_to_same_day_match() {
        let mut live = game(&["a", "b"]);
        live.history_id = Some("deleted".to_string());
        let records = vec![record_for("today", at(19, 8), &live)];
        assert_eq!(linked_record(&live, &records, at(19, 12)).as_deref(), Some("today"));
    }

    #[test]
    fn heuristic_needs_shared_player_and_today() {
        let live = game(&["a", "b"]);
        let strangers = game(&["x", "y"]);
        let records = vec![
            record_for("yesterday", at(18, 23), &live),
            record_for("strangers", at(19, 9), &strangers),
        ];
        assert_eq!(linked_record(&live, &records, at(19, 12)), None);
    }

    #[test]
    fn reconcile_creates_then_updates() {
        let mut state = AppState {
            current_game: game(&["a", "b"]),
            ..AppState::default()
        };
        let clock = crate::ManualClock::new(at(19, 10));
        let mut ids = SequentialIds::new("g");
        let mut events = EventBus::default();

        let mut session = Session::new(&mut state, &clock, &mut ids);
        session.reconcile(Reconcile::Full, &mut events);
        session.reconcile(Reconcile::Full, &mut events);

        assert_eq!(state.game_history.len(), 1);
        assert_eq!(state.current_game.history_id.as_deref(), Some("g-1"));
        let drained: Vec<_> = events.drain().collect();
        assert_eq!(
            drained,
            vec![
                SessionEvent::HistoryCreated { id: "g-1".to_string() },
                SessionEvent::HistoryUpdated { id: "g-1".to_string() },
            ]
        );
    }

    #[test]
    fn players_only_leaves_completion_fields() {
        let mut live = game(&["a", "b"]);
        let mut stale = record_for("g-1", at(19, 8), &live);
        stale.final_round = 4;
        stale.note = "keep".to_string();
        live.current_round = 7;
        live.is_game_complete = true;
        live.players[0].scores = vec![1, 2, 3, 4, 5, 6];
        let mut state = AppState {
            current_game: live,
            game_history: crate::History::from_records(vec![stale]),
        };
        let clock = crate::ManualClock::new(at(19, 10));
        let mut ids = SequentialIds::new("g");
        let mut events = EventBus::default();

        Session::new(&mut state, &clock, &mut ids).reconcile(Reconcile::PlayersOnly, &mut events);

        let record = &state.game_history.records()[0];
        assert_eq!(record.players[0].scores, vec![1, 2, 3, 4, 5, 6]);
        assert_eq!(record.final_round, 4);
        assert!(!record.is_complete);
        assert_eq!(record.note, "keep");
        assert_eq!(record.date, "2026-10-19T08:00:00.000Z");
    }
}
