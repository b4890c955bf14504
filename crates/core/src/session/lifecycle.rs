use super::{Reconcile, Session, SessionError};
use crate::{
    validate_players, EventBus, GamePhase, GameState, HistoryPatch, Landing, Operation, Player,
    SessionEvent, MIN_PLAYERS,
};
use tracing::{debug, info};

impl Session<'_> {
    /// Begins a fresh game with a validated roster. History is untouched
    /// until the first round is saved.
    pub fn start_game(
        &mut self,
        players: Vec<Player>,
        events: &mut EventBus,
    ) -> Result<(), SessionError> {
        self.require_phase(
            Operation::StartGame,
            &[GamePhase::NotStarted, GamePhase::AwaitingPlayers],
        )?;
        validate_players(&players)?;

        let count = players.len();
        self.state.current_game = GameState::in_progress(players);
        debug!(players = count, "game started");
        events.push(SessionEvent::GameStarted { players: count });
        Ok(())
    }

    /// Drops a player from the live game and from every saved snapshot.
    pub fn remove_player(
        &mut self,
        player_id: &str,
        events: &mut EventBus,
    ) -> Result<(), SessionError> {
        self.require_phase(
            Operation::RemovePlayer,
            &[GamePhase::InProgress, GamePhase::Complete],
        )?;
        let game = &self.state.current_game;
        let index = game
            .players
            .iter()
            .position(|player| player.id == player_id)
            .ok_or_else(|| SessionError::UnknownPlayer(player_id.to_string()))?;
        if game.players.len() <= MIN_PLAYERS {
            return Err(SessionError::NotEnoughPlayers { min: MIN_PLAYERS });
        }

        self.state.current_game.players.remove(index);
        let history_records = self.state.game_history.remove_player_everywhere(player_id);
        info!(player = player_id, history_records, "player removed");
        events.push(SessionEvent::PlayerRemoved {
            player_id: player_id.to_string(),
            history_records,
        });

        self.reconcile(Reconcile::PlayersOnly, events);
        Ok(())
    }

    /// Saves the outgoing game into history, then resets the live game to
    /// player setup or to the home screen.
    pub fn start_new_game(&mut self, landing: Landing, events: &mut EventBus) {
        let outgoing = &self.state.current_game;
        if !outgoing.players.is_empty() && !outgoing.is_game_complete {
            self.reconcile(Reconcile::Full, events);
        }
        self.state.current_game = match landing {
            Landing::Setup => GameState::awaiting_players(),
            Landing::Home => GameState::new(),
        };
        debug!(?landing, "session reset");
        events.push(SessionEvent::SessionReset { landing });
    }

    pub fn go_home(&mut self, events: &mut EventBus) {
        self.start_new_game(Landing::Home, events);
    }

    /// Makes a saved game live again, even a finished one. Unknown ids are ignored.
    pub fn load_game(&mut self, game_id: &str, events: &mut EventBus) {
        let Some(record) = self.state.game_history.find(game_id) else {
            debug!(game = game_id, "load ignored: no such record");
            return;
        };
        let complete = record.is_complete;
        self.state.current_game = GameState {
            players: record.players.clone(),
            current_round: record.final_round,
            is_game_started: true,
            is_game_complete: complete,
            history_id: Some(record.id.clone()),
        };
        debug!(game = game_id, complete, "game loaded");
        events.push(SessionEvent::GameLoaded {
            id: game_id.to_string(),
            complete,
        });
        if complete {
            events.push(SessionEvent::ResultsReady);
        }
    }

    /// Removes a saved game. The live game is left alone even if it shares players.
    pub fn delete_game(&mut self, game_id: &str, events: &mut EventBus) {
        if self.state.game_history.delete(game_id) == 0 {
            debug!(game = game_id, "delete ignored: no such record");
            return;
        }
        info!(game = game_id, "history record deleted");
        events.push(SessionEvent::GameDeleted {
            id: game_id.to_string(),
        });
    }

    pub fn update_note(&mut self, game_id: &str, note: &str, events: &mut EventBus) {
        if !self
            .state
            .game_history
            .update(game_id, &HistoryPatch::note(note))
        {
            debug!(game = game_id, "note ignored: no such record");
            return;
        }
        events.push(SessionEvent::NoteUpdated {
            id: game_id.to_string(),
        });
    }
}
