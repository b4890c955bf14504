use anyhow::{bail, Context, Result};
use crowns_core::{
    cards_for_round, display_title, leaders, leaders_visible, standings, GameHistory, GamePhase,
    GameState, Landing, Operation, SessionError, SessionEvent, SetupDraft, SetupRng, MAX_PLAYERS,
    MAX_SCORE, MIN_PLAYERS, RECENT_GAMES, TOTAL_ROUNDS,
};
use crowns_store::{FileBackend, KeeperError, Scorekeeper, StoreConfig};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum UiLocale {
    En,
    Es,
}

impl UiLocale {
    fn code(self) -> &'static str {
        match self {
            Self::En => "en",
            Self::Es => "es",
        }
    }

    fn from_opt(value: Option<&str>) -> Self {
        match value.map(|raw| raw.trim().to_ascii_lowercase()) {
            Some(code) if code.starts_with("es") => Self::Es,
            _ => Self::En,
        }
    }

    fn text<'a>(self, en: &'a str, es: &'a str) -> &'a str {
        if matches!(self, Self::Es) {
            es
        } else {
            en
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Command {
    Status,
    Start(Vec<String>),
    Round(Vec<u32>),
    Edit { round: u8, scores: Vec<u32> },
    Remove(String),
    Finish,
    New,
    Home,
    History { all: bool },
    Load(String),
    Delete(String),
    Note { id: String, text: String },
    Tui,
    Help,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct CliOptions {
    data_dir: Option<PathBuf>,
    locale: UiLocale,
    yes: bool,
    verbose: bool,
    command: Command,
}

fn parse_cli_options(args: &[String]) -> Result<CliOptions, String> {
    let mut data_dir = None;
    let mut locale_arg: Option<String> = std::env::var("CROWNS_LANG").ok();
    let mut yes = false;
    let mut verbose = false;
    let mut rest: Vec<&str> = Vec::new();
    let mut idx = 0usize;
    while idx < args.len() {
        match args[idx].as_str() {
            "--yes" | "-y" => yes = true,
            "--verbose" | "-v" => verbose = true,
            "--lang" | "-l" => {
                let value = args.get(idx + 1).ok_or("--lang needs a value")?;
                locale_arg = Some(value.clone());
                idx += 1;
            }
            "--data-dir" => {
                let value = args.get(idx + 1).ok_or("--data-dir needs a path")?;
                data_dir = Some(PathBuf::from(value));
                idx += 1;
            }
            other => rest.push(other),
        }
        idx += 1;
    }
    Ok(CliOptions {
        data_dir,
        locale: UiLocale::from_opt(locale_arg.as_deref()),
        yes,
        verbose,
        command: parse_command(&rest)?,
    })
}

fn parse_command(args: &[&str]) -> Result<Command, String> {
    let Some((name, rest)) = args.split_first() else {
        return Ok(Command::Status);
    };
    let command = match *name {
        "status" | "s" => Command::Status,
        "start" => {
            if rest.len() < MIN_PLAYERS || rest.len() > MAX_PLAYERS {
                return Err(format!(
                    "start needs {MIN_PLAYERS} to {MAX_PLAYERS} player names, got {}",
                    rest.len()
                ));
            }
            Command::Start(rest.iter().map(|name| name.to_string()).collect())
        }
        "round" | "r" => Command::Round(parse_scores(rest)?),
        "edit" => {
            let (round, scores) = rest.split_first().ok_or("edit needs a round number")?;
            let round = round
                .parse::<u8>()
                .map_err(|_| format!("invalid round '{round}'"))?;
            Command::Edit {
                round,
                scores: parse_scores(scores)?,
            }
        }
        "remove" => Command::Remove(single_arg(rest, "remove needs a player id or name")?),
        "finish" => Command::Finish,
        "new" => Command::New,
        "home" => Command::Home,
        "history" | "ls" => Command::History {
            all: rest.contains(&"--all"),
        },
        "load" => Command::Load(single_arg(rest, "load needs a game id")?),
        "delete" => Command::Delete(single_arg(rest, "delete needs a game id")?),
        "note" => {
            let (id, text) = rest.split_first().ok_or("note needs a game id")?;
            Command::Note {
                id: id.to_string(),
                text: text.join(" "),
            }
        }
        "tui" | "ui" => Command::Tui,
        "help" | "h" | "?" | "--help" => Command::Help,
        other => return Err(format!("unknown command '{other}' (try 'help')")),
    };
    Ok(command)
}

fn single_arg(args: &[&str], missing: &str) -> Result<String, String> {
    match args {
        [value] => Ok(value.to_string()),
        [] => Err(missing.to_string()),
        _ => Err(format!("expected one argument, got {}", args.len())),
    }
}

/// Digits only, at most [`MAX_SCORE`]; `-` or an empty string stands for a
/// blank entry worth 0.
fn parse_scores(args: &[&str]) -> Result<Vec<u32>, String> {
    if args.is_empty() {
        return Err("missing scores".to_string());
    }
    args.iter()
        .map(|arg| match arg.trim() {
            "" | "-" => Ok(0),
            value if value.chars().all(|ch| ch.is_ascii_digit()) => value
                .parse::<u32>()
                .ok()
                .filter(|score| *score <= MAX_SCORE)
                .ok_or_else(|| format!("score too large '{value}' (max {MAX_SCORE})")),
            value => Err(format!("invalid score '{value}'")),
        })
        .collect()
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_env("CROWNS_LOG")
            .or_else(|_| EnvFilter::try_from_default_env())
            .unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn main() -> Result<()> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let options = match parse_cli_options(&args) {
        Ok(options) => options,
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(2);
        }
    };

    if options.command == Command::Tui {
        crowns_cui::init_file_logging()?;
        return crowns_cui::run(crowns_cui::LaunchOptions {
            locale: Some(options.locale.code().to_string()),
            data_dir: options.data_dir,
        });
    }
    init_logging(options.verbose);

    if options.command == Command::Help {
        print_help(options.locale);
        return Ok(());
    }

    let mut config = StoreConfig::from_env();
    if let Some(dir) = options.data_dir.clone() {
        config = config.with_data_dir(dir);
    }
    if config.data_dir.is_none() {
        tracing::warn!("no data directory (set CROWNS_DATA_DIR or HOME); nothing will be saved");
    }
    let mut keeper = Scorekeeper::from_config(&config);
    execute(&mut keeper, &options)
}

fn execute(keeper: &mut Scorekeeper<FileBackend>, options: &CliOptions) -> Result<()> {
    let locale = options.locale;
    let result = match &options.command {
        Command::Status => {
            print_status(locale, keeper);
            return Ok(());
        }
        Command::History { all } => {
            print_history(locale, keeper, *all);
            return Ok(());
        }
        Command::Start(names) => start_from_names(keeper, names),
        Command::Round(scores) => keeper.save_round(scores),
        Command::Edit { round, scores } => keeper.edit_round(*round, scores),
        Command::Remove(who) => {
            let Some(id) = resolve_player(&keeper.state().current_game, who) else {
                bail!("no player '{who}' in the current game");
            };
            if !confirmed(locale, options, Operation::RemovePlayer, keeper)? {
                return Ok(());
            }
            keeper.remove_player(&id)
        }
        Command::Finish => {
            if !confirmed(locale, options, Operation::FinishGameEarly, keeper)? {
                return Ok(());
            }
            keeper.finish_game_early()
        }
        Command::New => {
            if !confirmed(locale, options, Operation::StartNewGame, keeper)? {
                return Ok(());
            }
            keeper.start_new_game(Landing::Setup)
        }
        Command::Home => {
            if !confirmed(locale, options, Operation::GoHome, keeper)? {
                return Ok(());
            }
            keeper.go_home()
        }
        Command::Load(id) => {
            if keeper.state().game_history.find(id).is_none() {
                bail!("no saved game '{id}'");
            }
            keeper.load_game(id)
        }
        Command::Delete(id) => {
            if keeper.state().game_history.find(id).is_none() {
                bail!("no saved game '{id}'");
            }
            if !confirmed(locale, options, Operation::DeleteGame, keeper)? {
                return Ok(());
            }
            keeper.delete_game(id)
        }
        Command::Note { id, text } => {
            if keeper.state().game_history.find(id).is_none() {
                bail!("no saved game '{id}'");
            }
            keeper.update_note(id, text)
        }
        Command::Tui | Command::Help => return Ok(()),
    };

    let show_results = print_events(locale, keeper);
    match result {
        Ok(()) => {}
        Err(KeeperError::Session(err)) => bail!("{}", session_failure(locale, &err)),
        Err(err @ KeeperError::Persistence(_)) => {
            return Err(err).context(locale.text(
                "the change could not be written to disk",
                "no se pudo guardar el cambio en disco",
            ));
        }
    }
    if show_results {
        print_results(locale, keeper);
    } else if keeper.state().current_game.phase() == GamePhase::InProgress {
        print_status(locale, keeper);
    }
    Ok(())
}

fn session_failure(locale: UiLocale, err: &SessionError) -> String {
    let label = if err.is_invalid_operation() {
        locale.text("not allowed", "no permitido")
    } else {
        locale.text("invalid players", "jugadores no validos")
    };
    format!("{label}: {err}")
}

fn start_from_names(
    keeper: &mut Scorekeeper<FileBackend>,
    names: &[String],
) -> Result<(), KeeperError> {
    let mut rng = SetupRng::from_entropy();
    let mut draft = SetupDraft::new(&mut rng);
    while draft.len() < names.len() && draft.add_player(&mut rng) {}
    for (index, name) in names.iter().enumerate() {
        draft
            .set_name(index, name.as_str())
            .map_err(crowns_core::SessionError::from)?;
    }
    keeper.start_game_from_draft(&draft, &mut rng)
}

/// Player by id, falling back to a case-insensitive name match.
fn resolve_player(game: &GameState, who: &str) -> Option<String> {
    game.player(who)
        .or_else(|| {
            game.players
                .iter()
                .find(|player| player.name.eq_ignore_ascii_case(who))
        })
        .map(|player| player.id.clone())
}

fn confirmed(
    locale: UiLocale,
    options: &CliOptions,
    operation: Operation,
    keeper: &Scorekeeper<FileBackend>,
) -> Result<bool> {
    if options.yes || !operation.requires_confirmation(&keeper.state().current_game) {
        return Ok(true);
    }
    print!(
        "{} {operation}? [y/N] ",
        locale.text("Really", "¿Seguro que quieres")
    );
    io::stdout().flush().context("flush prompt")?;
    let mut answer = String::new();
    io::stdin()
        .lock()
        .read_line(&mut answer)
        .context("read confirmation")?;
    let accepted = matches!(answer.trim(), "y" | "Y" | "yes" | "s" | "si" | "sí");
    if !accepted {
        println!("{}", locale.text("cancelled", "cancelado"));
    }
    Ok(accepted)
}

/// Prints the drained events; true when the results view should follow.
fn print_events(locale: UiLocale, keeper: &mut Scorekeeper<FileBackend>) -> bool {
    let mut results = false;
    for event in keeper.drain_events() {
        tracing::debug!(?event, "session event");
        let line = match &event {
            SessionEvent::GameStarted { players } => Some(format!(
                "{} ({players})",
                locale.text("game started", "partida iniciada")
            )),
            SessionEvent::RoundSaved { round, .. } => Some(format!(
                "{} {round}",
                locale.text("saved round", "ronda guardada")
            )),
            SessionEvent::RoundEdited { round } => Some(format!(
                "{} {round}",
                locale.text("corrected round", "ronda corregida")
            )),
            SessionEvent::PlayerRemoved {
                player_id,
                history_records,
            } => Some(format!(
                "{} {player_id} ({history_records} {})",
                locale.text("removed player", "jugador eliminado"),
                locale.text("saved games updated", "partidas actualizadas")
            )),
            SessionEvent::GameLoaded { id, .. } => Some(format!(
                "{} {id}",
                locale.text("loaded game", "partida cargada")
            )),
            SessionEvent::GameDeleted { id } => Some(format!(
                "{} {id}",
                locale.text("deleted game", "partida borrada")
            )),
            SessionEvent::NoteUpdated { id } => Some(format!(
                "{} {id}",
                locale.text("note saved for", "nota guardada para")
            )),
            SessionEvent::SessionReset { landing } => Some(
                match landing {
                    Landing::Setup => locale.text(
                        "ready for a new game: crowns start <names...>",
                        "lista para una nueva partida: crowns start <nombres...>",
                    ),
                    Landing::Home => locale.text("back home", "de vuelta al inicio"),
                }
                .to_string(),
            ),
            SessionEvent::ResultsReady => {
                results = true;
                None
            }
            SessionEvent::GameFinished { .. }
            | SessionEvent::HistoryCreated { .. }
            | SessionEvent::HistoryUpdated { .. } => None,
        };
        if let Some(line) = line {
            println!("{line}");
        }
    }
    results
}

fn print_status(locale: UiLocale, keeper: &Scorekeeper<FileBackend>) {
    let game = &keeper.state().current_game;
    match game.phase() {
        GamePhase::NotStarted => {
            println!(
                "{}",
                locale.text(
                    "No game in progress. Start one with: crowns start <names...>",
                    "No hay partida. Empieza una con: crowns start <nombres...>"
                )
            );
            print_history(locale, keeper, false);
        }
        GamePhase::AwaitingPlayers => println!(
            "{}",
            locale.text(
                "Waiting for players: crowns start <names...>",
                "Esperando jugadores: crowns start <nombres...>"
            )
        ),
        GamePhase::Complete => print_results(locale, keeper),
        GamePhase::InProgress => {
            let round = game.current_round.min(TOTAL_ROUNDS);
            println!(
                "{} {round}/{TOTAL_ROUNDS} - {} {}",
                locale.text("Round", "Ronda"),
                cards_for_round(round),
                locale.text("cards each", "cartas cada uno")
            );
            let leader_ids: Vec<&str> = if leaders_visible(game) {
                leaders(&game.players)
                    .into_iter()
                    .map(|player| player.id.as_str())
                    .collect()
            } else {
                Vec::new()
            };
            for player in &game.players {
                let crown = if leader_ids.contains(&player.id.as_str()) {
                    " *"
                } else {
                    ""
                };
                let scores: Vec<String> = player.scores.iter().map(u32::to_string).collect();
                println!(
                    "  {:<20} {:>5}{crown}  [{}]",
                    player.name,
                    player.total(),
                    scores.join(" ")
                );
            }
        }
    }
}

fn print_results(locale: UiLocale, keeper: &Scorekeeper<FileBackend>) {
    let game = &keeper.state().current_game;
    println!("{}", locale.text("Final standings", "Clasificación final"));
    for (idx, row) in standings(&game.players).iter().enumerate() {
        println!("  {:>2}. {:<20} {:>5}", idx + 1, row.player.name, row.total);
    }
    if let Some(record) = keeper.current_history_record() {
        if !record.note.is_empty() {
            println!("{}: {}", locale.text("Note", "Nota"), record.note);
        }
        println!("{}: {}", locale.text("Game id", "Id de partida"), record.id);
    }
}

fn print_history(locale: UiLocale, keeper: &Scorekeeper<FileBackend>, all: bool) {
    let history = &keeper.state().game_history;
    let rows = if all {
        history.sorted_by_date_desc()
    } else {
        history.recent(RECENT_GAMES)
    };
    if rows.is_empty() {
        println!("{}", locale.text("No saved games.", "No hay partidas guardadas."));
        return;
    }
    println!(
        "{}",
        if all {
            locale.text("All games", "Todas las partidas")
        } else {
            locale.text("Recent games", "Partidas recientes")
        }
    );
    for record in rows {
        println!("  {}", history_line(locale, record));
    }
}

fn history_line(locale: UiLocale, record: &GameHistory) -> String {
    let names: Vec<&str> = record
        .players
        .iter()
        .map(|player| player.name.as_str())
        .collect();
    let status = if record.is_complete {
        locale.text("finished", "terminada")
    } else {
        locale.text("in progress", "en curso")
    };
    let mut line = format!(
        "{}  {}  {}  ({status}, {} {})",
        record.id,
        display_title(record),
        names.join(", "),
        locale.text("round", "ronda"),
        record.final_round.min(TOTAL_ROUNDS)
    );
    if !record.note.is_empty() {
        line.push_str(&format!("  \"{}\"", record.note));
    }
    line
}

fn print_help(locale: UiLocale) {
    println!("crowns [--data-dir <path>] [--lang en|es] [--yes] [--verbose] <command>");
    println!();
    let rows = [
        ("status", locale.text("show the current game", "muestra la partida actual")),
        ("start <name>...", locale.text("start a game with 2-7 players", "empieza una partida con 2-7 jugadores")),
        ("round <score>...", locale.text("save the next round, one score per player", "guarda la siguiente ronda")),
        ("edit <round> <score>...", locale.text("correct a played round", "corrige una ronda jugada")),
        ("remove <player>", locale.text("remove a player (also from saved games)", "quita un jugador (también del historial)")),
        ("finish", locale.text("end the game now", "termina la partida ahora")),
        ("new", locale.text("save this game and prepare a new one", "guarda y prepara una nueva partida")),
        ("home", locale.text("save this game and leave it", "guarda y sal de la partida")),
        ("history [--all]", locale.text("list saved games", "lista las partidas guardadas")),
        ("load <id>", locale.text("resume a saved game", "reanuda una partida guardada")),
        ("delete <id>", locale.text("delete a saved game", "borra una partida guardada")),
        ("note <id> <text>", locale.text("attach a note to a saved game", "añade una nota a una partida")),
        ("tui", locale.text("open the terminal interface", "abre la interfaz de terminal")),
    ];
    for (usage, text) in rows {
        println!("  {usage:<26} {text}");
    }
    println!();
    println!(
        "{}",
        locale.text(
            "Scores: digits only, '-' for a blank entry (counts as 0). Lowest total wins.",
            "Puntos: solo dígitos, '-' para una casilla vacía (cuenta 0). Gana el total más bajo."
        )
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(values: &[&str]) -> Vec<String> {
        values.iter().map(|value| value.to_string()).collect()
    }

    macro_rules! command_case {
        ($name:ident, [$($arg:expr),*], $expected:expr) => {
            #[test]
            fn $name() {
                let options = parse_cli_options(&args(&[$($arg),*])).expect("parse");
                assert_eq!(options.command, $expected);
            }
        };
    }

    command_case!(no_args_means_status, [], Command::Status);
    command_case!(parses_start, ["start", "Alice", "Bob"], Command::Start(vec!["Alice".to_string(), "Bob".to_string()]));
    command_case!(parses_round_with_blank, ["round", "12", "-", "0"], Command::Round(vec![12, 0, 0]));
    command_case!(parses_edit, ["edit", "3", "5", "7"], Command::Edit { round: 3, scores: vec![5, 7] });
    command_case!(parses_history_all, ["history", "--all"], Command::History { all: true });
    command_case!(parses_note_text, ["note", "g1", "great", "game"], Command::Note { id: "g1".to_string(), text: "great game".to_string() });
    command_case!(flags_anywhere, ["--yes", "finish", "--verbose"], Command::Finish);

    #[test]
    fn parses_flags() {
        let options =
            parse_cli_options(&args(&["--data-dir", "/tmp/c", "--lang", "es", "-y", "status"]))
                .expect("parse");
        assert_eq!(options.data_dir, Some(PathBuf::from("/tmp/c")));
        assert_eq!(options.locale, UiLocale::Es);
        assert!(options.yes);
        assert!(!options.verbose);
    }

    #[test]
    fn rejects_bad_input() {
        assert!(parse_cli_options(&args(&["start", "Solo"])).is_err());
        assert!(parse_cli_options(&args(&["round", "-3"])).is_err());
        assert!(parse_cli_options(&args(&["round", "4x"])).is_err());
        assert!(parse_cli_options(&args(&["round"])).is_err());
        assert!(parse_cli_options(&args(&["round", "10000", "0"])).is_err());
        assert!(parse_cli_options(&args(&["round", "4294967295", "0"])).is_err());
        assert!(parse_cli_options(&args(&["edit", "twelve", "1"])).is_err());
        assert!(parse_cli_options(&args(&["load"])).is_err());
        assert!(parse_cli_options(&args(&["dance"])).is_err());
        assert!(parse_cli_options(&args(&["--data-dir"])).is_err());
    }

    #[test]
    fn score_cap_is_inclusive() {
        assert_eq!(parse_scores(&["9999", "-"]), Ok(vec![MAX_SCORE, 0]));
    }

    #[test]
    fn session_failures_name_their_kind() {
        let refused = SessionError::RoundNotPlayed {
            round: 4,
            current_round: 2,
        };
        assert!(session_failure(UiLocale::En, &refused).starts_with("not allowed: "));
        let roster = SessionError::from(crowns_core::SetupError::DuplicateName("Bo".to_string()));
        assert!(session_failure(UiLocale::En, &roster).starts_with("invalid players: "));
    }

    #[test]
    fn resolves_players_by_id_or_name() {
        let game = GameState::in_progress(vec![
            crowns_core::Player::new("p1", "Alice", "#3B82F6"),
            crowns_core::Player::new("p2", "Bob", "#EF4444"),
        ]);
        assert_eq!(resolve_player(&game, "p2").as_deref(), Some("p2"));
        assert_eq!(resolve_player(&game, "alice").as_deref(), Some("p1"));
        assert_eq!(resolve_player(&game, "Cleo"), None);
    }
}
