use crate::{clock, player, History, Player, TOTAL_ROUNDS};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum GamePhase {
    NotStarted,
    /// Started but no players yet: the setup screen.
    AwaitingPlayers,
    InProgress,
    Complete,
}

/// The single live game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GameState {
    pub players: Vec<Player>,
    /// 1-based; becomes `TOTAL_ROUNDS + 1` once the last round is saved.
    pub current_round: u8,
    pub is_game_started: bool,
    pub is_game_complete: bool,
    /// History record this game syncs into, once one exists.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub history_id: Option<String>,
}

impl Default for GameState {
    fn default() -> Self {
        Self {
            players: Vec::new(),
            current_round: 1,
            is_game_started: false,
            is_game_complete: false,
            history_id: None,
        }
    }
}

impl GameState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn awaiting_players() -> Self {
        Self {
            is_game_started: true,
            ..Self::default()
        }
    }

    pub fn in_progress(players: Vec<Player>) -> Self {
        Self {
            players,
            is_game_started: true,
            ..Self::default()
        }
    }

    pub fn phase(&self) -> GamePhase {
        if !self.is_game_started {
            GamePhase::NotStarted
        } else if self.players.is_empty() {
            GamePhase::AwaitingPlayers
        } else if self.is_game_complete {
            GamePhase::Complete
        } else {
            GamePhase::InProgress
        }
    }

    pub fn player(&self, id: &str) -> Option<&Player> {
        self.players.iter().find(|player| player.id == id)
    }

    pub fn rounds_played(&self) -> u8 {
        self.current_round.saturating_sub(1).min(TOTAL_ROUNDS)
    }
}

/// Persisted snapshot of a past or in-progress game.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GameHistory {
    pub id: String,
    /// ISO 8601 creation time, set once.
    pub date: String,
    pub players: Vec<Player>,
    /// Reserved; nothing writes a title today.
    pub title: String,
    pub note: String,
    pub is_complete: bool,
    pub final_round: u8,
}

impl GameHistory {
    pub fn snapshot(id: impl Into<String>, created: DateTime<Utc>, game: &GameState) -> Self {
        Self {
            id: id.into(),
            date: clock::iso_timestamp(created),
            players: game.players.clone(),
            title: String::new(),
            note: String::new(),
            is_complete: game.is_game_complete,
            final_round: game.current_round,
        }
    }

    pub fn shares_player_with(&self, players: &[Player]) -> bool {
        player::shares_any_player(&self.players, players)
    }

    /// True when `date` sorts after the start of `day` (`YYYY-MM-DD`).
    pub fn created_on_or_after(&self, day: &str) -> bool {
        self.date.as_str() > day
    }

    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        clock::parse_timestamp(&self.date)
    }

    pub fn day(&self) -> &str {
        self.date.get(..10).unwrap_or(&self.date)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AppState {
    pub current_game: GameState,
    pub game_history: History,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }
}
