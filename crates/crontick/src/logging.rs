//! Tracing initialization for the crontick binary.
//!
//! The TUI owns the terminal, so diagnostics never go to stdout: they are
//! appended to `~/.crontick_history/crontick.log`. `CRONTICK_LOG` selects
//! the filter (`tracing_subscriber` EnvFilter syntax); default is `warn`
//! so routine use writes nothing.

use std::fs::OpenOptions;
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

pub fn init() {
    let filter = EnvFilter::try_from_env("CRONTICK_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));

    let log_path = crontick_common::paths::history_dir().join("crontick.log");
    if let Some(parent) = log_path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }

    let file = OpenOptions::new().create(true).append(true).open(&log_path);

    match file {
        Ok(file) => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(Mutex::new(file))
                .with_ansi(false)
                .init();
        }
        Err(_) => {
            // Fall back to stderr; better than losing diagnostics entirely.
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
}
