use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use crowns_core::{
    back_action, AppState, BackAction, GameHistory, GamePhase, Landing, Operation, SessionEvent,
    SessionError, SetupDraft, SetupRng, RECENT_GAMES,
};
use crowns_store::{KeeperError, Scorekeeper, StorageBackend};
use std::collections::VecDeque;

const MAX_EVENT_LOG: usize = 100;
const MAX_SCORE_DIGITS: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiLocale {
    En,
    Es,
}

impl UiLocale {
    pub fn from_opt(value: Option<&str>) -> Self {
        match value.map(|raw| raw.trim().to_ascii_lowercase()) {
            Some(code) if code.starts_with("es") => Self::Es,
            _ => Self::En,
        }
    }

    pub fn code(self) -> &'static str {
        match self {
            Self::En => "en",
            Self::Es => "es",
        }
    }

    pub fn text<'a>(self, en: &'a str, es: &'a str) -> &'a str {
        if matches!(self, Self::Es) {
            es
        } else {
            en
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Home,
    Setup,
    Scorecard,
    Results,
}

impl Screen {
    pub fn for_phase(phase: GamePhase) -> Self {
        match phase {
            GamePhase::NotStarted => Screen::Home,
            GamePhase::AwaitingPlayers => Screen::Setup,
            GamePhase::InProgress => Screen::Scorecard,
            GamePhase::Complete => Screen::Results,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistoryTab {
    Recent,
    All,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptMode {
    PlayerName(usize),
    Note(String),
}

/// A destructive action waiting for a yes/no answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Pending {
    DeleteGame(String),
    RemovePlayer(String),
    FinishGame,
    NewGame,
    GoHome,
}

impl Pending {
    pub fn operation(&self) -> Operation {
        match self {
            Pending::DeleteGame(_) => Operation::DeleteGame,
            Pending::RemovePlayer(_) => Operation::RemovePlayer,
            Pending::FinishGame => Operation::FinishGameEarly,
            Pending::NewGame => Operation::StartNewGame,
            Pending::GoHome => Operation::GoHome,
        }
    }
}

pub struct App<B> {
    pub locale: UiLocale,
    pub keeper: Scorekeeper<B>,
    pub rng: SetupRng,
    pub draft: SetupDraft,
    pub history_tab: HistoryTab,
    pub home_cursor: usize,
    pub setup_cursor: usize,
    pub score_cursor: usize,
    pub score_inputs: Vec<String>,
    /// Round being corrected; `None` while entering the next round.
    pub editing_round: Option<u8>,
    pub scoreboard_open: bool,
    pub scoreboard_round: u8,
    pub prompt_mode: Option<PromptMode>,
    pub prompt_input: String,
    pub confirm: Option<Pending>,
    pub event_log: VecDeque<String>,
    pub status_line: String,
    pub show_help: bool,
    pub should_quit: bool,
}

impl<B: StorageBackend> App<B> {
    pub fn new(locale: UiLocale, keeper: Scorekeeper<B>, mut rng: SetupRng) -> Self {
        let draft = SetupDraft::new(&mut rng);
        let mut app = Self {
            locale,
            keeper,
            rng,
            draft,
            history_tab: HistoryTab::Recent,
            home_cursor: 0,
            setup_cursor: 0,
            score_cursor: 0,
            score_inputs: Vec::new(),
            editing_round: None,
            scoreboard_open: false,
            scoreboard_round: 1,
            prompt_mode: None,
            prompt_input: String::new(),
            confirm: None,
            event_log: VecDeque::new(),
            status_line: locale.text("ready", "listo").to_string(),
            show_help: false,
            should_quit: false,
        };
        app.normalize();
        app
    }

    pub fn state(&self) -> &AppState {
        self.keeper.state()
    }

    pub fn screen(&self) -> Screen {
        Screen::for_phase(self.state().current_game.phase())
    }

    pub fn history_rows(&self) -> Vec<&GameHistory> {
        let history = &self.state().game_history;
        match self.history_tab {
            HistoryTab::Recent => history.recent(RECENT_GAMES),
            HistoryTab::All => history.sorted_by_date_desc(),
        }
    }

    pub fn selected_history_id(&self) -> Option<String> {
        let rows = self.history_rows();
        if rows.is_empty() {
            return None;
        }
        rows.get(self.home_cursor.min(rows.len() - 1))
            .map(|record| record.id.clone())
    }

    pub fn rounds_played(&self) -> u8 {
        self.state().current_game.rounds_played()
    }

    pub fn next_hint(&self) -> &'static str {
        if self.confirm.is_some() {
            return self.locale.text("y confirm | n cancel", "y confirmar | n cancelar");
        }
        if self.prompt_mode.is_some() {
            return self
                .locale
                .text("Enter save | Esc cancel", "Enter guardar | Esc cancelar");
        }
        match self.screen() {
            Screen::Home => self.locale.text(
                "n new game | Enter load | Tab recent/all | e note | d delete",
                "n nueva partida | Enter cargar | Tab recientes/todas | e nota | d borrar",
            ),
            Screen::Setup => self.locale.text(
                "r rename | ←/→ color | a add | x remove | Enter start",
                "r renombrar | ←/→ color | a añadir | x quitar | Enter empezar",
            ),
            Screen::Scorecard if self.scoreboard_open => self.locale.text(
                "←/→ round | Enter edit round | s close",
                "←/→ ronda | Enter editar ronda | s cerrar",
            ),
            Screen::Scorecard => self.locale.text(
                "0-9 score | Enter save round | s scoreboard | f finish | x remove",
                "0-9 puntos | Enter guardar ronda | s marcador | f terminar | x quitar",
            ),
            Screen::Results => self.locale.text(
                "e note | s scoreboard | n new game | Esc home",
                "e nota | s marcador | n nueva partida | Esc inicio",
            ),
        }
    }

    pub fn move_cursor(&mut self, down: bool) {
        match self.screen() {
            Screen::Home => {
                let len = self.history_rows().len();
                move_index(&mut self.home_cursor, len, down);
            }
            Screen::Setup => {
                let len = self.draft.len();
                move_index(&mut self.setup_cursor, len, down);
            }
            Screen::Scorecard | Screen::Results => {
                if self.scoreboard_open {
                    self.move_scoreboard_round(down);
                } else {
                    let len = self.state().current_game.players.len();
                    move_index(&mut self.score_cursor, len, down);
                }
            }
        }
    }

    pub fn move_sideways(&mut self, forward: bool) {
        match self.screen() {
            Screen::Setup => {
                if let Err(err) = self.draft.cycle_color(self.setup_cursor, forward) {
                    self.push_status(err.to_string());
                }
            }
            Screen::Scorecard | Screen::Results if self.scoreboard_open => {
                self.move_scoreboard_round(forward);
            }
            _ => {}
        }
    }

    fn move_scoreboard_round(&mut self, forward: bool) {
        let played = usize::from(self.rounds_played());
        let mut index = usize::from(self.scoreboard_round.saturating_sub(1));
        move_index(&mut index, played, forward);
        self.scoreboard_round = u8::try_from(index + 1).unwrap_or(1);
    }

    pub fn switch_tab(&mut self) {
        if self.screen() != Screen::Home {
            return;
        }
        self.history_tab = match self.history_tab {
            HistoryTab::Recent => HistoryTab::All,
            HistoryTab::All => HistoryTab::Recent,
        };
        self.home_cursor = 0;
    }

    pub fn activate_primary(&mut self) {
        if self.show_help {
            self.show_help = false;
            return;
        }
        match self.screen() {
            Screen::Home => {
                if let Some(id) = self.selected_history_id() {
                    let result = self.keeper.load_game(&id);
                    self.report(result);
                }
            }
            Screen::Setup => self.start_game(),
            Screen::Scorecard | Screen::Results => {
                if self.scoreboard_open {
                    self.begin_edit(self.scoreboard_round);
                } else if self.screen() == Screen::Scorecard || self.editing_round.is_some() {
                    self.submit_scores();
                }
            }
        }
    }

    fn start_game(&mut self) {
        let result = self.keeper.start_game_from_draft(&self.draft, &mut self.rng);
        self.report(result);
    }

    fn accepts_scores(&self) -> bool {
        !self.scoreboard_open
            && match self.screen() {
                Screen::Scorecard => true,
                Screen::Results => self.editing_round.is_some(),
                Screen::Home | Screen::Setup => false,
            }
    }

    pub fn push_digit(&mut self, digit: u8) {
        if !self.accepts_scores() {
            return;
        }
        if let Some(input) = self.score_inputs.get_mut(self.score_cursor) {
            if input.len() < MAX_SCORE_DIGITS {
                input.push(char::from(b'0' + digit));
            }
        }
    }

    pub fn erase_digit(&mut self) {
        if !self.accepts_scores() {
            return;
        }
        if let Some(input) = self.score_inputs.get_mut(self.score_cursor) {
            input.pop();
        }
    }

    pub fn submit_scores(&mut self) {
        let scores = parse_scores(&self.score_inputs);
        let result = match self.editing_round {
            Some(round) => self.keeper.edit_round(round, &scores),
            None => self.keeper.save_round(&scores),
        };
        if !matches!(result, Err(KeeperError::Session(_))) {
            self.editing_round = None;
            self.score_inputs.iter_mut().for_each(String::clear);
            self.score_cursor = 0;
        }
        self.report(result);
    }

    /// Loads the stored scores of `round` into the inputs for correction.
    pub fn begin_edit(&mut self, round: u8) {
        if round == 0 || round > self.rounds_played() {
            return;
        }
        self.score_inputs = self
            .state()
            .current_game
            .players
            .iter()
            .map(|player| player.round_score(round).unwrap_or(0).to_string())
            .collect();
        self.editing_round = Some(round);
        self.scoreboard_open = false;
        self.score_cursor = 0;
        self.push_status(format!(
            "{} {round}",
            self.locale.text("editing round", "editando ronda")
        ));
    }

    pub fn toggle_scoreboard(&mut self) {
        if !matches!(self.screen(), Screen::Scorecard | Screen::Results) {
            return;
        }
        if self.scoreboard_open {
            self.scoreboard_open = false;
            return;
        }
        if self.rounds_played() == 0 {
            self.push_status(self.locale.text("no rounds played yet", "aún no hay rondas"));
            return;
        }
        self.scoreboard_round = self.rounds_played();
        self.scoreboard_open = true;
    }

    pub fn new_game(&mut self) {
        if matches!(self.screen(), Screen::Setup) {
            return;
        }
        self.request(Pending::NewGame);
    }

    pub fn finish_game(&mut self) {
        if self.screen() == Screen::Scorecard {
            self.request(Pending::FinishGame);
        }
    }

    pub fn add_slot(&mut self) {
        if self.screen() != Screen::Setup {
            return;
        }
        if self.draft.add_player(&mut self.rng) {
            self.setup_cursor = self.draft.len() - 1;
        } else {
            self.push_status(self.locale.text("at most 7 players", "máximo 7 jugadores"));
        }
    }

    pub fn remove_selected(&mut self) {
        match self.screen() {
            Screen::Setup => {
                if self.draft.remove_player(self.setup_cursor) {
                    self.normalize();
                } else {
                    self.push_status(self.locale.text("at least 2 players", "mínimo 2 jugadores"));
                }
            }
            Screen::Scorecard | Screen::Results => {
                let player = self
                    .state()
                    .current_game
                    .players
                    .get(self.score_cursor)
                    .map(|player| player.id.clone());
                if let Some(id) = player {
                    self.request(Pending::RemovePlayer(id));
                }
            }
            Screen::Home => {}
        }
    }

    pub fn delete_selected_game(&mut self) {
        if self.screen() != Screen::Home {
            return;
        }
        if let Some(id) = self.selected_history_id() {
            self.request(Pending::DeleteGame(id));
        }
    }

    pub fn open_rename_prompt(&mut self) {
        if self.screen() != Screen::Setup {
            return;
        }
        let Some(slot) = self.draft.slots().get(self.setup_cursor) else {
            return;
        };
        self.prompt_input = slot.name.clone();
        self.prompt_mode = Some(PromptMode::PlayerName(self.setup_cursor));
    }

    pub fn open_note_prompt(&mut self) {
        let record = match self.screen() {
            Screen::Home => self
                .selected_history_id()
                .and_then(|id| self.state().game_history.find(&id)),
            Screen::Results => self.keeper.current_history_record(),
            Screen::Setup | Screen::Scorecard => None,
        };
        let Some(record) = record else {
            return;
        };
        let (id, note) = (record.id.clone(), record.note.clone());
        self.prompt_input = note;
        self.prompt_mode = Some(PromptMode::Note(id));
    }

    pub fn handle_prompt_key(&mut self, key: KeyEvent) -> bool {
        let Some(mode) = self.prompt_mode.clone() else {
            return false;
        };
        match key.code {
            KeyCode::Esc => {
                self.prompt_mode = None;
                self.prompt_input.clear();
            }
            KeyCode::Enter => {
                self.prompt_mode = None;
                let input = std::mem::take(&mut self.prompt_input);
                match mode {
                    PromptMode::PlayerName(index) => {
                        if let Err(err) = self.draft.set_name(index, input) {
                            self.push_status(err.to_string());
                        }
                    }
                    PromptMode::Note(id) => {
                        let result = self.keeper.update_note(&id, &input);
                        self.report(result);
                    }
                }
            }
            KeyCode::Backspace => {
                self.prompt_input.pop();
            }
            KeyCode::Char(ch) => {
                if !key.modifiers.contains(KeyModifiers::CONTROL)
                    && !key.modifiers.contains(KeyModifiers::ALT)
                {
                    self.prompt_input.push(ch);
                }
            }
            _ => {}
        }
        true
    }

    pub fn handle_confirm_key(&mut self, key: KeyEvent) -> bool {
        let Some(pending) = self.confirm.clone() else {
            return false;
        };
        match key.code {
            KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => {
                self.confirm = None;
                self.perform(pending);
            }
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                self.confirm = None;
                self.push_status(self.locale.text("cancelled", "cancelado"));
            }
            _ => {}
        }
        true
    }

    pub fn confirm_question(&self, pending: &Pending) -> String {
        match pending {
            Pending::DeleteGame(_) => self
                .locale
                .text("Delete this game from history?", "¿Borrar esta partida del historial?")
                .to_string(),
            Pending::RemovePlayer(id) => {
                let name = self
                    .state()
                    .current_game
                    .player(id)
                    .map(|player| player.name.as_str())
                    .unwrap_or(id);
                format!(
                    "{} {name}? {}",
                    self.locale.text("Remove", "¿Quitar a"),
                    self.locale.text(
                        "Their scores are erased from every saved game.",
                        "Sus puntos se borran de todas las partidas guardadas."
                    )
                )
            }
            Pending::FinishGame => self
                .locale
                .text("Finish the game now?", "¿Terminar la partida ahora?")
                .to_string(),
            Pending::NewGame => self
                .locale
                .text("Start a new game?", "¿Empezar una nueva partida?")
                .to_string(),
            Pending::GoHome => self
                .locale
                .text("Leave this game and go home?", "¿Salir de la partida e ir al inicio?")
                .to_string(),
        }
    }

    /// Esc: close the innermost overlay, otherwise follow the back rules of
    /// the live game.
    pub fn back(&mut self) {
        if self.show_help {
            self.show_help = false;
            return;
        }
        if self.scoreboard_open {
            self.scoreboard_open = false;
            return;
        }
        if self.editing_round.take().is_some() {
            self.score_inputs.iter_mut().for_each(String::clear);
            self.push_status(self.locale.text("edit cancelled", "edición cancelada"));
            return;
        }
        match back_action(&self.state().current_game) {
            BackAction::ExitApp => self.should_quit = true,
            BackAction::GoHome => self.perform(Pending::GoHome),
            BackAction::ConfirmGoHome => self.confirm = Some(Pending::GoHome),
        }
    }

    fn request(&mut self, pending: Pending) {
        if pending
            .operation()
            .requires_confirmation(&self.state().current_game)
        {
            self.confirm = Some(pending);
        } else {
            self.perform(pending);
        }
    }

    fn perform(&mut self, pending: Pending) {
        let result = match &pending {
            Pending::DeleteGame(id) => self.keeper.delete_game(id),
            Pending::RemovePlayer(id) => self.keeper.remove_player(id),
            Pending::FinishGame => self.keeper.finish_game_early(),
            Pending::NewGame => self.keeper.start_new_game(Landing::Setup),
            Pending::GoHome => self.keeper.go_home(),
        };
        self.report(result);
    }

    fn report(&mut self, result: Result<(), KeeperError>) {
        match result {
            Ok(()) => {}
            Err(err @ KeeperError::Persistence(_)) => {
                tracing::warn!(error = %err, "change kept in memory only");
                self.push_status(format!(
                    "{}: {err}",
                    self.locale.text("warning", "aviso")
                ));
            }
            Err(KeeperError::Session(err)) => {
                let label = session_error_label(self.locale, &err);
                self.push_status(format!("{label}: {err}"));
            }
        }
        self.flush_events();
        self.normalize();
    }

    pub fn push_status(&mut self, value: impl Into<String>) {
        self.status_line = value.into();
    }

    fn flush_events(&mut self) {
        let drained = self.keeper.drain_events();
        for event in drained {
            match &event {
                SessionEvent::SessionReset {
                    landing: Landing::Setup,
                } => {
                    self.draft = SetupDraft::new(&mut self.rng);
                    self.setup_cursor = 0;
                }
                SessionEvent::ResultsReady => {
                    self.push_status(self.locale.text("game over", "fin de la partida"));
                }
                SessionEvent::RoundSaved { round, .. } => {
                    self.push_status(format!(
                        "{} {round}",
                        self.locale.text("saved round", "ronda guardada")
                    ));
                }
                _ => {}
            }
            self.push_event_line(format_event(self.locale, &event));
        }
    }

    fn push_event_line(&mut self, line: String) {
        if self.event_log.len() >= MAX_EVENT_LOG {
            let _ = self.event_log.pop_front();
        }
        self.event_log.push_back(line);
    }

    /// Keeps cursors and score inputs in range after the state changed.
    fn normalize(&mut self) {
        let players = self.state().current_game.players.len();
        self.score_inputs.resize(players, String::new());
        clamp_index(&mut self.score_cursor, players);
        clamp_index(&mut self.setup_cursor, self.draft.len());
        let rows = self.history_rows().len();
        clamp_index(&mut self.home_cursor, rows);
        if self.rounds_played() == 0 {
            self.scoreboard_open = false;
        }
        if !matches!(self.screen(), Screen::Scorecard | Screen::Results) {
            self.editing_round = None;
            self.scoreboard_open = false;
        }
    }
}

/// Status prefix telling a refused action apart from a rejected roster.
fn session_error_label(locale: UiLocale, err: &SessionError) -> &'static str {
    if err.is_invalid_operation() {
        locale.text("not allowed", "no permitido")
    } else {
        locale.text("check players", "revisa los jugadores")
    }
}

/// Blank or unparsable entries count as zero.
pub fn parse_scores(inputs: &[String]) -> Vec<u32> {
    inputs
        .iter()
        .map(|input| input.trim().parse::<u32>().unwrap_or(0))
        .collect()
}

fn move_index(value: &mut usize, len: usize, down: bool) {
    if len == 0 {
        *value = 0;
        return;
    }
    if down {
        *value = (*value + 1) % len;
    } else if *value == 0 {
        *value = len - 1;
    } else {
        *value -= 1;
    }
}

fn clamp_index(value: &mut usize, len: usize) {
    if len == 0 {
        *value = 0;
    } else if *value >= len {
        *value = len - 1;
    }
}

fn format_event(locale: UiLocale, event: &SessionEvent) -> String {
    match event {
        SessionEvent::GameStarted { players } => {
            format!("{} ({players})", locale.text("game started", "partida iniciada"))
        }
        SessionEvent::RoundSaved { round, complete } => format!(
            "{} {round}{}",
            locale.text("round saved", "ronda guardada"),
            if *complete { " *" } else { "" }
        ),
        SessionEvent::RoundEdited { round } => {
            format!("{} {round}", locale.text("round edited", "ronda editada"))
        }
        SessionEvent::PlayerRemoved {
            player_id,
            history_records,
        } => format!(
            "{} {player_id} ({history_records} {})",
            locale.text("player removed", "jugador eliminado"),
            locale.text("saved games touched", "partidas modificadas")
        ),
        SessionEvent::GameFinished { final_round } => format!(
            "{} {final_round}",
            locale.text("game finished at round", "partida terminada en la ronda")
        ),
        SessionEvent::HistoryCreated { id } => {
            format!("{} {id}", locale.text("history created", "historial creado"))
        }
        SessionEvent::HistoryUpdated { id } => {
            format!("{} {id}", locale.text("history updated", "historial actualizado"))
        }
        SessionEvent::GameLoaded { id, .. } => {
            format!("{} {id}", locale.text("game loaded", "partida cargada"))
        }
        SessionEvent::GameDeleted { id } => {
            format!("{} {id}", locale.text("game deleted", "partida borrada"))
        }
        SessionEvent::NoteUpdated { id } => {
            format!("{} {id}", locale.text("note saved", "nota guardada"))
        }
        SessionEvent::SessionReset { landing } => match landing {
            Landing::Setup => locale.text("new game", "nueva partida").to_string(),
            Landing::Home => locale.text("home", "inicio").to_string(),
        },
        SessionEvent::ResultsReady => locale.text("results", "resultados").to_string(),
    }
}
