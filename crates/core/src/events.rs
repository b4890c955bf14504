use crate::Landing;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum SessionEvent {
    GameStarted {
        players: usize,
    },
    RoundSaved {
        round: u8,
        complete: bool,
    },
    RoundEdited {
        round: u8,
    },
    PlayerRemoved {
        player_id: String,
        history_records: usize,
    },
    GameFinished {
        final_round: u8,
    },
    HistoryCreated {
        id: String,
    },
    HistoryUpdated {
        id: String,
    },
    GameLoaded {
        id: String,
        complete: bool,
    },
    GameDeleted {
        id: String,
    },
    NoteUpdated {
        id: String,
    },
    SessionReset {
        landing: Landing,
    },
    /// The presentation layer should show final standings.
    ResultsReady,
}

#[derive(Debug, Default)]
pub struct EventBus {
    queue: Vec<SessionEvent>,
}

impl EventBus {
    pub fn push(&mut self, event: SessionEvent) {
        self.queue.push(event);
    }

    pub fn drain(&mut self) -> impl Iterator<Item = SessionEvent> + '_ {
        self.queue.drain(..)
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}
