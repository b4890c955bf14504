use crate::{GamePhase, GameState};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Where a reset of the live game lands.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Landing {
    /// Player setup for a fresh game.
    Setup,
    Home,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    StartGame,
    SaveRound,
    EditRound,
    RemovePlayer,
    FinishGameEarly,
    StartNewGame,
    GoHome,
    LoadGame,
    DeleteGame,
    UpdateNote,
}

impl Operation {
    /// Whether the user must confirm before the operation runs against `game`.
    pub fn requires_confirmation(self, game: &GameState) -> bool {
        match self {
            Operation::DeleteGame | Operation::RemovePlayer | Operation::FinishGameEarly => true,
            Operation::StartNewGame => !game.players.is_empty(),
            Operation::GoHome => game.phase() == GamePhase::InProgress,
            Operation::StartGame
            | Operation::SaveRound
            | Operation::EditRound
            | Operation::LoadGame
            | Operation::UpdateNote => false,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Operation::StartGame => "start game",
            Operation::SaveRound => "save round",
            Operation::EditRound => "edit round",
            Operation::RemovePlayer => "remove player",
            Operation::FinishGameEarly => "finish game",
            Operation::StartNewGame => "start new game",
            Operation::GoHome => "go home",
            Operation::LoadGame => "load game",
            Operation::DeleteGame => "delete game",
            Operation::UpdateNote => "update note",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackAction {
    ExitApp,
    GoHome,
    /// Go home, but only after the user confirms.
    ConfirmGoHome,
}

/// Response to the platform back signal, computed from the live game.
pub fn back_action(game: &GameState) -> BackAction {
    match game.phase() {
        GamePhase::NotStarted => BackAction::ExitApp,
        GamePhase::AwaitingPlayers | GamePhase::Complete => BackAction::GoHome,
        GamePhase::InProgress => BackAction::ConfirmGoHome,
    }
}
