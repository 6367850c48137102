//! Terminal setup, teardown and the key-dispatch loop.

use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::time::Duration;

use crontick_common::crontab::SystemCrontab;

use super::render::draw_ui;
use super::state::{App, ViewMode};

/// Run the TUI until the user quits.
pub fn run() -> Result<()> {
    enable_raw_mode().map_err(|e| {
        anyhow::anyhow!(
            "Failed to enable raw mode: {}. Ensure you're running in a real terminal (TTY).",
            e
        )
    })?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen).map_err(|e| {
        let _ = disable_raw_mode();
        anyhow::anyhow!("Failed to initialize terminal: {}", e)
    })?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(Box::new(SystemCrontab));
    let result = run_event_loop(&mut terminal, &mut app);

    let cleanup = restore_terminal(&mut terminal);
    result.and(cleanup)
}

fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}

fn run_event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> Result<()> {
    loop {
        terminal.draw(|f| draw_ui(f, app))?;

        if app.should_quit {
            return Ok(());
        }

        // Blocking poll with a timeout so a resize repaints promptly.
        if !event::poll(Duration::from_millis(250))? {
            continue;
        }
        match event::read()? {
            Event::Key(key) if key.kind != KeyEventKind::Release => handle_key(app, key),
            _ => {}
        }
    }
}

fn handle_key(app: &mut App, key: KeyEvent) {
    match app.mode {
        ViewMode::Table => handle_table_key(app, key),
        ViewMode::Edit => handle_edit_key(app, key),
        ViewMode::History => handle_history_key(app, key),
        ViewMode::Help => handle_help_key(app, key),
    }
}

fn handle_table_key(app: &mut App, key: KeyEvent) {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        app.should_quit = true;
        return;
    }
    match key.code {
        KeyCode::Char('q') => app.should_quit = true,
        KeyCode::Char('n') => app.start_new(),
        KeyCode::Char('e') => app.start_edit(),
        KeyCode::Char('d') => app.delete_selected(),
        KeyCode::Char('h') => app.open_history(),
        KeyCode::Char('r') => {
            app.load_jobs();
            app.message = Some("Refreshed cron jobs".to_string());
        }
        KeyCode::Down | KeyCode::Char('j') => app.select_next(),
        KeyCode::Up | KeyCode::Char('k') => app.select_previous(),
        _ => {}
    }
}

fn handle_edit_key(app: &mut App, key: KeyEvent) {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        match key.code {
            KeyCode::Char('c') => app.cancel_edit(),
            KeyCode::Char('s') => app.save_form(),
            _ => {}
        }
        return;
    }
    match key.code {
        KeyCode::Esc => app.cancel_edit(),
        KeyCode::Tab | KeyCode::Enter | KeyCode::Down => app.next_field(),
        KeyCode::BackTab | KeyCode::Up => app.previous_field(),
        KeyCode::F(1) => app.mode = ViewMode::Help,
        KeyCode::Backspace => app.inputs[app.active_input].pop(),
        KeyCode::Char(c) => app.inputs[app.active_input].push(c),
        _ => {}
    }
}

fn handle_history_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc | KeyCode::Char('q') => app.close_history(),
        _ => {}
    }
}

fn handle_help_key(app: &mut App, key: KeyEvent) {
    match key.code {
        // Help is reached from the edit form; return there.
        KeyCode::Esc | KeyCode::Char('q') => app.mode = ViewMode::Edit,
        _ => {}
    }
}
