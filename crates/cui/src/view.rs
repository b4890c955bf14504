use crate::app::{App, HistoryTab, PromptMode, Screen};
use crowns_core::{
    cards_for_round, display_title, leaders, leaders_visible, palette, running_totals, standings,
    TOTAL_ROUNDS,
};
use crowns_store::StorageBackend;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::prelude::{Alignment, Color, Line, Modifier, Span, Style, Stylize};
use ratatui::widgets::{Block, Borders, Cell, Clear, List, ListItem, ListState, Paragraph, Row, Table, Wrap};
use ratatui::Frame;

pub fn draw<B: StorageBackend>(frame: &mut Frame, app: &App<B>) {
    let root = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4),
            Constraint::Min(10),
            Constraint::Length(6),
        ])
        .split(frame.area());

    draw_header(frame, root[0], app);
    match app.screen() {
        Screen::Home => draw_home(frame, root[1], app),
        Screen::Setup => draw_setup(frame, root[1], app),
        Screen::Scorecard => draw_scorecard(frame, root[1], app),
        Screen::Results => draw_results(frame, root[1], app),
    }
    draw_events(frame, root[2], app);

    if app.scoreboard_open {
        draw_scoreboard(frame, app);
    }
    if app.show_help {
        draw_help_popup(frame, app);
    }
    if app.prompt_mode.is_some() {
        draw_prompt(frame, app);
    }
    if app.confirm.is_some() {
        draw_confirm(frame, app);
    }
}

fn draw_header<B: StorageBackend>(frame: &mut Frame, area: Rect, app: &App<B>) {
    let screen = match app.screen() {
        Screen::Home => app.locale.text("Home", "Inicio"),
        Screen::Setup => app.locale.text("Players", "Jugadores"),
        Screen::Scorecard => app.locale.text("Scorecard", "Marcador"),
        Screen::Results => app.locale.text("Results", "Resultados"),
    };
    let lines = vec![
        Line::from(format!(
            "{} | {screen} | {}",
            app.locale.text("Five Crowns", "Five Crowns"),
            app.next_hint()
        ))
        .bold(),
        Line::from(format!(
            "{}: {}",
            app.locale.text("Status", "Estado"),
            app.status_line
        )),
    ];
    let block = Block::default().borders(Borders::ALL);
    frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: true }).block(block), area);
}

fn draw_home<B: StorageBackend>(frame: &mut Frame, area: Rect, app: &App<B>) {
    let rows = app.history_rows();
    let items: Vec<ListItem<'_>> = if rows.is_empty() {
        vec![ListItem::new(
            app.locale.text("no saved games yet", "todavía no hay partidas"),
        )]
    } else {
        rows.iter()
            .map(|record| {
                let names: Vec<&str> = record.players.iter().map(|p| p.name.as_str()).collect();
                let status = if record.is_complete {
                    app.locale.text("finished", "terminada")
                } else {
                    app.locale.text("in progress", "en curso")
                };
                let mut line = format!(
                    "{}  {}  [{status}, {} {}]",
                    display_title(record),
                    names.join(", "),
                    app.locale.text("round", "ronda"),
                    record.final_round.min(TOTAL_ROUNDS)
                );
                if !record.note.is_empty() {
                    line.push_str(&format!("  \"{}\"", record.note));
                }
                ListItem::new(line)
            })
            .collect()
    };
    let title = match app.history_tab {
        HistoryTab::Recent => app.locale.text("Recent games", "Partidas recientes"),
        HistoryTab::All => app.locale.text("All games", "Todas las partidas"),
    };
    let mut state = ListState::default();
    if !rows.is_empty() {
        state.select(Some(app.home_cursor.min(rows.len() - 1)));
    }
    frame.render_stateful_widget(highlight_list(items, title), area, &mut state);
}

fn draw_setup<B: StorageBackend>(frame: &mut Frame, area: Rect, app: &App<B>) {
    let items: Vec<ListItem<'_>> = app
        .draft
        .slots()
        .iter()
        .enumerate()
        .map(|(idx, slot)| {
            let color_name = palette::color_name(&slot.color).unwrap_or("-");
            ListItem::new(Line::from(vec![
                Span::styled("■ ", Style::default().fg(player_color(&slot.color))),
                Span::raw(format!("{}. {}  ({color_name})", idx + 1, slot.name)),
            ]))
        })
        .collect();
    let title = format!(
        "{} {}/7",
        app.locale.text("Players", "Jugadores"),
        app.draft.len()
    );
    let mut state = ListState::default();
    state.select(Some(app.setup_cursor.min(app.draft.len().saturating_sub(1))));
    frame.render_stateful_widget(highlight_list(items, &title), area, &mut state);
}

fn draw_scorecard<B: StorageBackend>(frame: &mut Frame, area: Rect, app: &App<B>) {
    let game = &app.state().current_game;
    let show_leaders = leaders_visible(game);
    let leader_ids: Vec<&str> = if show_leaders {
        leaders(&game.players)
            .into_iter()
            .map(|p| p.id.as_str())
            .collect()
    } else {
        Vec::new()
    };
    let rows: Vec<Row<'_>> = game
        .players
        .iter()
        .enumerate()
        .map(|(idx, player)| {
            let crown = if leader_ids.contains(&player.id.as_str()) {
                "♛"
            } else {
                ""
            };
            let input = app.score_inputs.get(idx).map(String::as_str).unwrap_or("");
            let entry = if idx == app.score_cursor {
                format!("[{input:>4}_]")
            } else {
                format!("[{input:>4} ]")
            };
            Row::new(vec![
                Cell::from(Span::styled("■", Style::default().fg(player_color(&player.color)))),
                Cell::from(format!("{} {crown}", player.name)),
                Cell::from(player.total().to_string()),
                Cell::from(entry),
            ])
        })
        .collect();
    let title = match app.editing_round {
        Some(round) => format!(
            "{} {round} ({} {})",
            app.locale.text("Editing round", "Editando ronda"),
            cards_for_round(round),
            app.locale.text("cards", "cartas")
        ),
        None => format!(
            "{} {}/{TOTAL_ROUNDS}  {} {}",
            app.locale.text("Round", "Ronda"),
            game.current_round.min(TOTAL_ROUNDS),
            cards_for_round(game.current_round.min(TOTAL_ROUNDS)),
            app.locale.text("cards", "cartas")
        ),
    };
    let table = Table::new(
        rows,
        [
            Constraint::Length(2),
            Constraint::Min(16),
            Constraint::Length(8),
            Constraint::Length(8),
        ],
    )
    .header(
        Row::new(vec![
            "",
            app.locale.text("Player", "Jugador"),
            app.locale.text("Total", "Total"),
            app.locale.text("Score", "Puntos"),
        ])
        .bold(),
    )
    .block(Block::default().borders(Borders::ALL).title(title));
    frame.render_widget(table, area);
}

fn draw_results<B: StorageBackend>(frame: &mut Frame, area: Rect, app: &App<B>) {
    if app.editing_round.is_some() {
        draw_scorecard(frame, area, app);
        return;
    }
    let game = &app.state().current_game;
    let table = standings(&game.players);
    let best = table.first().map(|row| row.total);
    let mut lines: Vec<Line<'_>> = table
        .iter()
        .enumerate()
        .map(|(idx, row)| {
            let mut line = Line::from(vec![
                Span::raw(format!("{:>2}. ", idx + 1)),
                Span::styled("■ ", Style::default().fg(player_color(&row.player.color))),
                Span::raw(format!("{:<20} {:>5}", row.player.name, row.total)),
            ]);
            if Some(row.total) == best {
                line = line.bold();
            }
            line
        })
        .collect();
    if let Some(record) = app.keeper.current_history_record() {
        lines.push(Line::from(""));
        lines.push(Line::from(format!(
            "{}: {}",
            app.locale.text("Note", "Nota"),
            if record.note.is_empty() { "-" } else { record.note.as_str() }
        )));
    }
    let block = Block::default()
        .borders(Borders::ALL)
        .title(app.locale.text("Final standings", "Clasificación final"));
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn draw_events<B: StorageBackend>(frame: &mut Frame, area: Rect, app: &App<B>) {
    let capacity = area.height.saturating_sub(2) as usize;
    let start = app.event_log.len().saturating_sub(capacity);
    let lines: Vec<Line<'_>> = app
        .event_log
        .iter()
        .skip(start)
        .map(|line| Line::from(line.clone()))
        .collect();
    let block = Block::default()
        .borders(Borders::ALL)
        .title(app.locale.text("Log", "Registro"));
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn draw_scoreboard<B: StorageBackend>(frame: &mut Frame, app: &App<B>) {
    let area = centered_rect(90, 80, frame.area());
    frame.render_widget(Clear, area);
    let game = &app.state().current_game;
    let played = app.rounds_played();

    let mut header = vec![Cell::from(app.locale.text("Round", "Ronda"))];
    header.extend(game.players.iter().map(|player| {
        Cell::from(Span::styled(
            player.name.clone(),
            Style::default().fg(player_color(&player.color)),
        ))
    }));
    let totals: Vec<Vec<u32>> = game
        .players
        .iter()
        .map(|player| running_totals(&player.scores))
        .collect();
    let rows: Vec<Row<'_>> = (1..=played)
        .map(|round| {
            let mut cells = vec![Cell::from(format!(
                "{round} ({})",
                cards_for_round(round)
            ))];
            for (player, running) in game.players.iter().zip(&totals) {
                let idx = usize::from(round - 1);
                let score = player.round_score(round).unwrap_or(0);
                let total = running.get(idx).copied().unwrap_or(0);
                cells.push(Cell::from(format!("{score:>3} / {total:<4}")));
            }
            let row = Row::new(cells);
            if round == app.scoreboard_round {
                row.style(Style::default().fg(Color::Black).bg(Color::Yellow))
            } else {
                row
            }
        })
        .collect();
    let widths: Vec<Constraint> = std::iter::once(Constraint::Length(8))
        .chain(game.players.iter().map(|_| Constraint::Min(10)))
        .collect();
    let table = Table::new(rows, widths)
        .header(Row::new(header).bold())
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan))
                .title(app.locale.text(
                    "Scoreboard (round / running total)",
                    "Marcador (ronda / total acumulado)",
                )),
        );
    frame.render_widget(table, area);
}

fn draw_help_popup<B: StorageBackend>(frame: &mut Frame, app: &App<B>) {
    let area = centered_rect(70, 60, frame.area());
    frame.render_widget(Clear, area);
    let lines = vec![
        Line::from(app.locale.text(
            "q quit | ? help | Esc back | arrows/hjkl move",
            "q salir | ? ayuda | Esc atrás | flechas/hjkl mover",
        )),
        Line::from(app.locale.text(
            "Home: n new game | Enter load | Tab recent/all | e note | d delete",
            "Inicio: n nueva | Enter cargar | Tab recientes/todas | e nota | d borrar",
        )),
        Line::from(app.locale.text(
            "Setup: r rename | ←/→ color | a add | x remove | Enter start",
            "Jugadores: r renombrar | ←/→ color | a añadir | x quitar | Enter empezar",
        )),
        Line::from(app.locale.text(
            "Scorecard: 0-9 type score | Backspace erase | Enter save round",
            "Marcador: 0-9 puntos | Retroceso borrar | Enter guardar ronda",
        )),
        Line::from(app.locale.text(
            "s scoreboard, Enter there edits a round | f finish | x remove player | n new game",
            "s marcador, Enter edita una ronda | f terminar | x quitar jugador | n nueva",
        )),
        Line::from(app.locale.text(
            "Lowest total wins. Blank scores count as 0.",
            "Gana el total más bajo. Las casillas vacías cuentan 0.",
        )),
    ];
    let block = Block::default()
        .title(app.locale.text("Help", "Ayuda"))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));
    frame.render_widget(
        Paragraph::new(lines).block(block).wrap(Wrap { trim: true }),
        area,
    );
}

fn draw_prompt<B: StorageBackend>(frame: &mut Frame, app: &App<B>) {
    let Some(mode) = app.prompt_mode.as_ref() else {
        return;
    };
    let area = centered_rect(60, 24, frame.area());
    frame.render_widget(Clear, area);
    let title = match mode {
        PromptMode::PlayerName(_) => app.locale.text("Player name", "Nombre del jugador"),
        PromptMode::Note(_) => app.locale.text("Game note", "Nota de la partida"),
    };
    let lines = vec![
        Line::from(app.locale.text("Enter=save  Esc=cancel", "Enter=guardar  Esc=cancelar")),
        Line::from(""),
        Line::from(format!("> {}", app.prompt_input)),
    ];
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Green));
    frame.render_widget(
        Paragraph::new(lines).block(block).wrap(Wrap { trim: false }),
        area,
    );
}

fn draw_confirm<B: StorageBackend>(frame: &mut Frame, app: &App<B>) {
    let Some(pending) = app.confirm.as_ref() else {
        return;
    };
    let area = centered_rect(50, 20, frame.area());
    frame.render_widget(Clear, area);
    let lines = vec![
        Line::from(app.confirm_question(pending)),
        Line::from(""),
        Line::from(app.locale.text("[y] yes    [n] no", "[y] sí    [n] no")),
    ];
    let block = Block::default()
        .title(pending.operation().label())
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Red));
    frame.render_widget(
        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .block(block)
            .wrap(Wrap { trim: true }),
        area,
    );
}

fn highlight_list<'a>(items: Vec<ListItem<'a>>, title: &'a str) -> List<'a> {
    List::new(items)
        .block(Block::default().borders(Borders::ALL).title(title))
        .highlight_style(
            Style::default()
                .fg(Color::Black)
                .bg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol(">> ")
}

fn player_color(value: &str) -> Color {
    palette::rgb(value)
        .map(|(r, g, b)| Color::Rgb(r, g, b))
        .unwrap_or(Color::White)
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);
    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
