use super::{Reconcile, Session, SessionError};
use crate::{EventBus, GamePhase, Operation, SessionEvent, TOTAL_ROUNDS};
use tracing::debug;

impl Session<'_> {
    /// Appends one score per player (seat order), advances the round and
    /// syncs history. Saving round 11 completes the game.
    pub fn save_round(&mut self, scores: &[u32], events: &mut EventBus) -> Result<(), SessionError> {
        self.require_phase(Operation::SaveRound, &[GamePhase::InProgress])?;
        self.require_scores(scores)?;

        let game = &mut self.state.current_game;
        let round = game.current_round;
        for (player, score) in game.players.iter_mut().zip(scores) {
            player.scores.push(*score);
        }
        game.current_round = round.saturating_add(1);
        game.is_game_complete = game.current_round > TOTAL_ROUNDS;
        let complete = game.is_game_complete;
        debug!(round, complete, "round saved");
        events.push(SessionEvent::RoundSaved { round, complete });

        self.reconcile(Reconcile::Full, events);
        if complete {
            events.push(SessionEvent::ResultsReady);
        }
        Ok(())
    }

    /// Overwrites an already-played round for every player. The round counter
    /// and completion flag stay as they are, so finished games remain editable.
    pub fn edit_round(
        &mut self,
        round: u8,
        scores: &[u32],
        events: &mut EventBus,
    ) -> Result<(), SessionError> {
        self.require_phase(
            Operation::EditRound,
            &[GamePhase::InProgress, GamePhase::Complete],
        )?;
        let current_round = self.state.current_game.current_round;
        if round == 0 || round >= current_round {
            return Err(SessionError::RoundNotPlayed {
                round,
                current_round,
            });
        }
        self.require_scores(scores)?;

        let index = usize::from(round - 1);
        for (player, score) in self.state.current_game.players.iter_mut().zip(scores) {
            if player.scores.len() <= index {
                player.scores.resize(index + 1, 0);
            }
            player.scores[index] = *score;
        }
        debug!(round, "round edited");
        events.push(SessionEvent::RoundEdited { round });

        self.reconcile(Reconcile::PlayersOnly, events);
        Ok(())
    }

    /// Ends the game before round 11 without advancing the round counter.
    pub fn finish_game_early(&mut self, events: &mut EventBus) -> Result<(), SessionError> {
        self.require_phase(Operation::FinishGameEarly, &[GamePhase::InProgress])?;

        let game = &mut self.state.current_game;
        game.is_game_complete = true;
        let final_round = game.current_round;
        debug!(final_round, "game finished early");
        events.push(SessionEvent::GameFinished { final_round });

        self.reconcile(Reconcile::Full, events);
        events.push(SessionEvent::ResultsReady);
        Ok(())
    }
}
