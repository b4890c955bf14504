use crate::{FileBackend, KeeperError, PersistentStore, StorageBackend, StoreConfig};
use crowns_core::{
    AppState, Clock, EventBus, GameHistory, IdSource, Landing, Player, Session, SessionError,
    SessionEvent, SetupDraft, SetupRng, SystemClock, UuidIds, PERSIST_KEY,
};
use tracing::{debug, error, warn};

/// Application root: owns the [`AppState`], runs every session operation
/// against it and writes the whole state back afterwards.
pub struct Scorekeeper<B> {
    state: AppState,
    store: PersistentStore<B>,
    key: String,
    clock: Box<dyn Clock>,
    ids: Box<dyn IdSource>,
    events: EventBus,
}

impl Scorekeeper<FileBackend> {
    pub fn from_config(config: &StoreConfig) -> Self {
        Self::open_with_key(
            config.open_store(),
            config.key.clone(),
            Box::new(SystemClock),
            Box::new(UuidIds),
        )
    }
}

impl<B: StorageBackend> Scorekeeper<B> {
    pub fn open(store: PersistentStore<B>, clock: Box<dyn Clock>, ids: Box<dyn IdSource>) -> Self {
        Self::open_with_key(store, PERSIST_KEY, clock, ids)
    }

    pub fn open_with_key(
        mut store: PersistentStore<B>,
        key: impl Into<String>,
        clock: Box<dyn Clock>,
        ids: Box<dyn IdSource>,
    ) -> Self {
        let key = key.into();
        let state = store.load(&key, AppState::default());
        debug!(
            key = %key,
            history = state.game_history.len(),
            phase = ?state.current_game.phase(),
            held = store.is_held(&key),
            "state loaded"
        );
        Self {
            state,
            store,
            key,
            clock,
            ids,
            events: EventBus::default(),
        }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn store(&self) -> &PersistentStore<B> {
        &self.store
    }

    pub fn drain_events(&mut self) -> Vec<SessionEvent> {
        self.events.drain().collect()
    }

    /// The history record linked to the live game, if it has one yet.
    pub fn current_history_record(&self) -> Option<&GameHistory> {
        let id = self.state.current_game.history_id.as_deref()?;
        self.state.game_history.find(id)
    }

    pub fn start_game(&mut self, players: Vec<Player>) -> Result<(), KeeperError> {
        self.apply(|session, events| session.start_game(players, events))
    }

    /// Finishes the setup draft (fresh ids, random names for blanks) and starts the game.
    pub fn start_game_from_draft(
        &mut self,
        draft: &SetupDraft,
        rng: &mut SetupRng,
    ) -> Result<(), KeeperError> {
        let players = draft
            .finish(rng, &mut *self.ids)
            .map_err(SessionError::from)?;
        self.start_game(players)
    }

    pub fn save_round(&mut self, scores: &[u32]) -> Result<(), KeeperError> {
        self.apply(|session, events| session.save_round(scores, events))
    }

    pub fn edit_round(&mut self, round: u8, scores: &[u32]) -> Result<(), KeeperError> {
        self.apply(|session, events| session.edit_round(round, scores, events))
    }

    pub fn remove_player(&mut self, player_id: &str) -> Result<(), KeeperError> {
        self.apply(|session, events| session.remove_player(player_id, events))
    }

    pub fn finish_game_early(&mut self) -> Result<(), KeeperError> {
        self.apply(|session, events| session.finish_game_early(events))
    }

    pub fn start_new_game(&mut self, landing: Landing) -> Result<(), KeeperError> {
        self.apply(|session, events| {
            session.start_new_game(landing, events);
            Ok(())
        })
    }

    pub fn go_home(&mut self) -> Result<(), KeeperError> {
        self.apply(|session, events| {
            session.go_home(events);
            Ok(())
        })
    }

    pub fn load_game(&mut self, game_id: &str) -> Result<(), KeeperError> {
        self.apply(|session, events| {
            session.load_game(game_id, events);
            Ok(())
        })
    }

    pub fn delete_game(&mut self, game_id: &str) -> Result<(), KeeperError> {
        self.apply(|session, events| {
            session.delete_game(game_id, events);
            Ok(())
        })
    }

    pub fn update_note(&mut self, game_id: &str, note: &str) -> Result<(), KeeperError> {
        self.apply(|session, events| {
            session.update_note(game_id, note, events);
            Ok(())
        })
    }

    fn apply<F>(&mut self, operation: F) -> Result<(), KeeperError>
    where
        F: FnOnce(&mut Session<'_>, &mut EventBus) -> Result<(), SessionError>,
    {
        let mut session = Session::new(&mut self.state, &*self.clock, &mut *self.ids);
        operation(&mut session, &mut self.events)?;
        self.persist()
    }

    /// Writes the whole state, retrying once. On failure the in-memory state
    /// is kept and the error is returned for the user to see.
    fn persist(&mut self) -> Result<(), KeeperError> {
        if let Err(first) = self.store.save(&self.key, &self.state) {
            warn!(key = %self.key, error = %first, "state write failed, retrying");
            if let Err(err) = self.store.save(&self.key, &self.state) {
                error!(key = %self.key, error = %err, "state write failed after retry");
                return Err(KeeperError::Persistence(err));
            }
        }
        Ok(())
    }
}
