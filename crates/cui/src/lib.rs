mod actions;
mod app;
mod input;
mod view;

use anyhow::{Context, Result};
use app::{App, UiLocale};
use crossterm::event::{self, Event as CEvent, KeyEventKind};
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use crossterm::{execute, ExecutableCommand};
use crowns_core::SetupRng;
use crowns_store::{Scorekeeper, StorageBackend, StoreConfig};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use std::fs::OpenOptions;
use std::io::{self, stdout, IsTerminal};
use std::path::PathBuf;
use std::sync::Mutex;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

pub const LOG_FILE_ENV: &str = "CROWNS_LOG_FILE";

#[derive(Debug, Clone, Default)]
pub struct LaunchOptions {
    pub locale: Option<String>,
    pub data_dir: Option<PathBuf>,
}

pub fn run(options: LaunchOptions) -> Result<()> {
    let locale = UiLocale::from_opt(options.locale.as_deref());
    let mut config = StoreConfig::from_env();
    if let Some(dir) = options.data_dir {
        config = config.with_data_dir(dir);
    }
    if config.data_dir.is_none() {
        tracing::warn!("no data directory available, games will not be saved");
    }
    let keeper = Scorekeeper::from_config(&config);
    let mut app = App::new(locale, keeper, SetupRng::from_entropy());

    ensure_interactive_terminal()?;

    enable_raw_mode().map_err(|err| {
        anyhow::anyhow!(
            "failed to enable raw mode; ensure the process owns an interactive terminal: {err}"
        )
    })?;
    let mut stdout = stdout();
    stdout
        .execute(EnterAlternateScreen)
        .context("enter alternate screen")?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("create terminal")?;

    let run_result = run_loop(&mut terminal, &mut app);
    restore_terminal(&mut terminal)?;
    run_result
}

pub fn run_with_args(args: &[String]) -> Result<()> {
    let options = parse_options(args);
    run(options)
}

/// Sends logs to the file named by `CROWNS_LOG_FILE`; without it nothing is
/// logged, since stderr shares the terminal with the UI.
pub fn init_file_logging() -> Result<()> {
    let Some(path) = std::env::var_os(LOG_FILE_ENV) else {
        return Ok(());
    };
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("open log file {}", PathBuf::from(&path).display()))?;
    let filter = EnvFilter::try_from_env("CROWNS_LOG")
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init()
        .map_err(|err| anyhow::anyhow!(err))
        .context("install log subscriber")
}

fn parse_options(args: &[String]) -> LaunchOptions {
    let mut locale = std::env::var("CROWNS_LANG").ok();
    let mut data_dir = None;
    let mut idx = 0usize;
    while idx < args.len() {
        match args[idx].as_str() {
            "--lang" | "-l" => {
                if let Some(value) = args.get(idx + 1) {
                    locale = Some(value.clone());
                    idx += 1;
                }
            }
            "--data-dir" => {
                if let Some(value) = args.get(idx + 1) {
                    data_dir = Some(PathBuf::from(value));
                    idx += 1;
                }
            }
            _ => {}
        }
        idx += 1;
    }
    LaunchOptions { locale, data_dir }
}

fn run_loop<B: StorageBackend>(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App<B>,
) -> Result<()> {
    let tick_rate = Duration::from_millis(200);
    while !app.should_quit {
        terminal.draw(|frame| view::draw(frame, app))?;
        if event::poll(tick_rate)? {
            if let CEvent::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                if app.handle_confirm_key(key) || app.handle_prompt_key(key) {
                    continue;
                }
                let action = input::map_key(key);
                actions::dispatch(app, action);
            }
        }
    }
    Ok(())
}

fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
    disable_raw_mode().context("disable raw mode")?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen).context("leave alternate screen")?;
    terminal.show_cursor().context("show cursor")?;
    Ok(())
}

fn ensure_interactive_terminal() -> Result<()> {
    if io::stdin().is_terminal() && io::stdout().is_terminal() {
        return Ok(());
    }
    anyhow::bail!(
        "the scorekeeper UI requires an interactive TTY (run it directly in a terminal, not a piped shell)"
    );
}
