//! Drawing functions for the four views.

use chrono::{DateTime, Local};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState, Wrap},
    Frame,
};

use crontick_common::describe::describe_expression;
use crontick_common::schedule::validate_expression;
use crontick_common::timestamp;

use super::help::help_lines;
use super::state::{App, ViewMode, FIELD_COMMAND, FIELD_DESCRIPTION, FIELD_EXPRESSION, FIELD_LOG_ID};

/// History rows shown on screen; aggregation caps at 50, display at 20.
const HISTORY_DISPLAY_LIMIT: usize = 20;

fn title_style() -> Style {
    Style::default()
        .fg(Color::Cyan)
        .add_modifier(Modifier::BOLD)
}

fn error_style() -> Style {
    Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)
}

fn success_style() -> Style {
    Style::default()
        .fg(Color::Green)
        .add_modifier(Modifier::BOLD)
}

fn dim_style() -> Style {
    Style::default().fg(Color::DarkGray)
}

fn format_run(t: Option<DateTime<Local>>) -> String {
    match t {
        Some(t) => t.format("%b %-d, %H:%M").to_string(),
        None => "Never".to_string(),
    }
}

pub fn draw_ui(f: &mut Frame, app: &App) {
    match app.mode {
        ViewMode::Table => draw_table(f, app),
        ViewMode::Edit => draw_edit(f, app),
        ViewMode::History => draw_history(f, app),
        ViewMode::Help => draw_help(f),
    }
}

fn chrome(f: &mut Frame, title: &str, app: &App) -> Rect {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // title
            Constraint::Length(1), // message line
            Constraint::Min(3),    // content
            Constraint::Length(1), // keybindings
        ])
        .split(f.size());

    f.render_widget(Paragraph::new(title).style(title_style()), chunks[0]);

    if let Some(error) = &app.error {
        f.render_widget(
            Paragraph::new(format!("Error: {}", error)).style(error_style()),
            chunks[1],
        );
    } else if let Some(message) = &app.message {
        f.render_widget(Paragraph::new(message.as_str()).style(success_style()), chunks[1]);
    }

    let footer = chunks[3];
    let bindings = match app.mode {
        ViewMode::Table => "n: new job • e: edit job • d: delete • h: job history • r: refresh • q: quit",
        ViewMode::Edit => "Tab: navigate fields • Ctrl+S: save • Ctrl+C: cancel • F1: help",
        ViewMode::History | ViewMode::Help => "Esc: back • q: back",
    };
    f.render_widget(Paragraph::new(bindings).style(dim_style()), footer);

    chunks[2]
}

fn draw_table(f: &mut Frame, app: &App) {
    let area = chrome(f, "Crontick - Cron Job Manager", app);

    let header = Row::new(vec![
        "Description",
        "Cron Expression",
        "Next Run",
        "Last Run",
        "Command",
    ])
    .style(Style::default().add_modifier(Modifier::BOLD))
    .bottom_margin(1);

    let rows: Vec<Row> = app
        .jobs
        .iter()
        .map(|job| {
            let description = if job.description.is_empty() {
                "No description"
            } else {
                &job.description
            };
            Row::new(vec![
                Cell::from(description.to_string()),
                Cell::from(job.expression.clone()),
                Cell::from(format_run(job.next_run)),
                Cell::from(format_run(job.last_run)),
                Cell::from(job.command.clone()),
            ])
        })
        .collect();

    let table = Table::new(
        rows,
        [
            Constraint::Length(25),
            Constraint::Length(15),
            Constraint::Length(14),
            Constraint::Length(14),
            Constraint::Min(30),
        ],
    )
    .header(header)
    .block(Block::default().borders(Borders::ALL))
    .highlight_style(
        Style::default()
            .bg(Color::Indexed(57))
            .fg(Color::Indexed(229)),
    );

    let mut table_state = TableState::default();
    if !app.jobs.is_empty() {
        table_state.select(Some(app.selected));
    }
    f.render_stateful_widget(table, area, &mut table_state);
}

fn draw_edit(f: &mut Frame, app: &App) {
    let title = if app.edit_index.is_some() {
        "Edit Cron Job"
    } else {
        "Add New Cron Job"
    };
    let area = chrome(f, title, app);

    let mut lines: Vec<Line> = Vec::new();
    let fields = [
        (FIELD_DESCRIPTION, "Description"),
        (FIELD_EXPRESSION, "Cron Expression"),
        (FIELD_COMMAND, "Command"),
        (FIELD_LOG_ID, "Log name (optional, enables execution logging)"),
    ];

    for (index, label) in fields {
        let marker = if index == app.active_input { "> " } else { "  " };
        lines.push(Line::from(Span::styled(
            format!("{}{}:", marker, label),
            if index == app.active_input {
                title_style()
            } else {
                Style::default()
            },
        )));

        let value = &app.inputs[index].value;
        let shown = if index == app.active_input {
            format!("  {}_", value)
        } else {
            format!("  {}", value)
        };
        lines.push(Line::from(shown));

        // Live preview of the expression in human terms.
        if index == FIELD_EXPRESSION && !value.is_empty() && validate_expression(value).is_ok() {
            lines.push(Line::from(Span::styled(
                format!("  ({})", describe_expression(value)),
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::ITALIC),
            )));
        }
        lines.push(Line::from(""));
    }

    let form = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL))
        .wrap(Wrap { trim: false });
    f.render_widget(form, area);
}

fn draw_history(f: &mut Frame, app: &App) {
    let area = chrome(
        f,
        &format!("Execution History: {}", app.history_title),
        app,
    );

    let mut lines: Vec<Line> = vec![
        Line::from(Span::styled(
            format!("Command: {}", app.selected_command()),
            dim_style(),
        )),
        Line::from(""),
    ];

    match &app.history {
        Some(report) => {
            if !report.log_configured {
                lines.push(Line::from(Span::styled(
                    "No log configured for this entry; showing system log matches only.",
                    Style::default().fg(Color::Yellow),
                )));
                lines.push(Line::from(""));
            }
            if report.entries.is_empty() {
                lines.push(Line::from(Span::styled(
                    "No execution history found",
                    dim_style(),
                )));
            }
            for entry in report.entries.iter().take(HISTORY_DISPLAY_LIMIT) {
                let instant = match entry.timestamp {
                    Some(t) => timestamp::format_second(t),
                    None => "unknown time       ".to_string(),
                };
                lines.push(Line::from(format!(
                    "{} [{}] {}",
                    instant, entry.status, entry.message
                )));
            }
        }
        None => lines.push(Line::from(Span::styled(
            "No execution history found",
            dim_style(),
        ))),
    }

    let body = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL))
        .wrap(Wrap { trim: false });
    f.render_widget(body, area);
}

fn draw_help(f: &mut Frame) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(3), Constraint::Length(1)])
        .split(f.size());

    f.render_widget(
        Paragraph::new("Cron Expression Help").style(title_style()),
        chunks[0],
    );
    f.render_widget(
        Paragraph::new(help_lines()).block(Block::default().borders(Borders::ALL)),
        chunks[1],
    );
    f.render_widget(
        Paragraph::new("Esc: back to edit • q: back to edit").style(dim_style()),
        chunks[2],
    );
}
