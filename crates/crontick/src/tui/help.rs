//! Static help screen content: field layout, special characters and
//! common expression examples.

use ratatui::{
    style::{Color, Modifier, Style},
    text::{Line, Span},
};

const EXAMPLES: &[(&str, &str)] = &[
    ("0 0 * * *", "Daily at midnight"),
    ("0 9 * * *", "Daily at 9:00 AM"),
    ("0 9 * * 1", "Every Monday at 9:00 AM"),
    ("0 9-17 * * *", "Every hour from 9 AM to 5 PM"),
    ("*/15 * * * *", "Every 15 minutes"),
    ("0 */2 * * *", "Every 2 hours"),
    ("0 9 1 * *", "First day of every month at 9:00 AM"),
    ("0 9 * * 1-5", "Weekdays (Mon-Fri) at 9:00 AM"),
    ("0 0 1 1 *", "New Year's Day at midnight"),
    ("0 12 * * 0", "Every Sunday at noon"),
];

pub fn help_lines() -> Vec<Line<'static>> {
    let bold = Style::default().add_modifier(Modifier::BOLD);
    let example = Style::default().fg(Color::Yellow);

    let mut lines = vec![
        Line::from(Span::styled("Cron Expression Format:", bold)),
        Line::from("* * * * *"),
        Line::from("│ │ │ │ │"),
        Line::from("│ │ │ │ └─── day of week (0-7, 0 or 7 = Sunday)"),
        Line::from("│ │ │ └───── month (1-12)"),
        Line::from("│ │ └─────── day of month (1-31)"),
        Line::from("│ └───────── hour (0-23)"),
        Line::from("└─────────── minute (0-59)"),
        Line::from(""),
        Line::from(Span::styled("Special Characters:", bold)),
        Line::from("*     - Any value (wildcard)"),
        Line::from(",     - Value list separator (e.g., 1,3,5)"),
        Line::from("-     - Range of values (e.g., 1-5)"),
        Line::from("/     - Step values (e.g., */5 = every 5)"),
        Line::from(""),
        Line::from(Span::styled("Common Examples:", bold)),
    ];

    for (expr, meaning) in EXAMPLES {
        lines.push(Line::from(vec![
            Span::styled(format!("{:<14}", expr), example),
            Span::raw(*meaning),
        ]));
    }

    lines.extend([
        Line::from(""),
        Line::from(Span::styled("Tips:", bold)),
        Line::from("• Use absolute paths for commands and scripts"),
        Line::from("• Set a log name to track execution history for the job"),
        Line::from("• Test your cron expressions before saving"),
        Line::from("• Consider timezone differences"),
    ]);

    lines
}
