use crate::{AppState, Clock, GamePhase, IdSource, Operation, SetupError, MAX_SCORE};
use thiserror::Error;

mod lifecycle;
mod reconcile;
mod rounds;

pub use reconcile::Reconcile;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("invalid player setup: {0}")]
    InvalidPlayerSetup(#[from] SetupError),
    #[error("cannot {operation} while the game is {phase:?}")]
    InvalidPhase {
        operation: Operation,
        phase: GamePhase,
    },
    #[error("expected {expected} scores, got {got}")]
    ScoreCountMismatch { expected: usize, got: usize },
    #[error("score {score} is above the maximum of {max}")]
    ScoreTooHigh { score: u32, max: u32 },
    #[error("round {round} has not been played yet (current round {current_round})")]
    RoundNotPlayed { round: u8, current_round: u8 },
    #[error("unknown player {0}")]
    UnknownPlayer(String),
    #[error("at least {min} players must remain in the game")]
    NotEnoughPlayers { min: usize },
}

impl SessionError {
    /// Precondition failures, as opposed to a rejected player roster.
    pub fn is_invalid_operation(&self) -> bool {
        !matches!(self, SessionError::InvalidPlayerSetup(_))
    }
}

/// The game-session state machine over a borrowed [`AppState`].
///
/// Every operation either fails without touching the state or applies its
/// whole transition, including history reconciliation. Persisting the result
/// is the owner's job.
pub struct Session<'a> {
    state: &'a mut AppState,
    clock: &'a dyn Clock,
    ids: &'a mut dyn IdSource,
}

impl<'a> Session<'a> {
    pub fn new(state: &'a mut AppState, clock: &'a dyn Clock, ids: &'a mut dyn IdSource) -> Self {
        Self { state, clock, ids }
    }

    pub fn state(&self) -> &AppState {
        self.state
    }

    fn require_phase(&self, operation: Operation, allowed: &[GamePhase]) -> Result<(), SessionError> {
        let phase = self.state.current_game.phase();
        if allowed.contains(&phase) {
            Ok(())
        } else {
            Err(SessionError::InvalidPhase { operation, phase })
        }
    }

    /// One score per seat, none above [`MAX_SCORE`].
    fn require_scores(&self, scores: &[u32]) -> Result<(), SessionError> {
        let expected = self.state.current_game.players.len();
        if scores.len() != expected {
            return Err(SessionError::ScoreCountMismatch {
                expected,
                got: scores.len(),
            });
        }
        match scores.iter().find(|score| **score > MAX_SCORE) {
            Some(score) => Err(SessionError::ScoreTooHigh {
                score: *score,
                max: MAX_SCORE,
            }),
            None => Ok(()),
        }
    }
}
