//! Crontick - interactive crontab manager with execution-history
//! reconstruction.
//!
//! Running without a subcommand opens the TUI. The subcommands cover the
//! scripting surface: `list` prints the schedule, `history` reconstructs a
//! job's timeline, `record` appends to a command's custom execution log
//! (useful from cron lines themselves).

use anyhow::Result;
use clap::{Parser, Subcommand};

use crontick::{commands, logging, tui};

#[derive(Parser)]
#[command(name = "crontick")]
#[command(about = "Interactive crontab manager with execution history", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// List schedule entries with next/last run times
    List {
        /// Emit JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Show reconstructed execution history for an entry or command
    History {
        /// Entry number (as shown by `list`) or a literal command line
        selector: String,
    },

    /// Append an execution record to a command's custom log
    Record {
        /// The command the record is for
        command: String,

        /// Status classification ("completed", "failed", ...)
        #[arg(long, default_value = "completed")]
        status: String,

        /// Free-text detail
        #[arg(long, default_value = "")]
        message: String,
    },
}

fn main() -> Result<()> {
    logging::init();

    let cli = Cli::parse();
    match cli.command {
        None => tui::run(),
        Some(Commands::List { json }) => commands::list(json),
        Some(Commands::History { selector }) => commands::history(&selector),
        Some(Commands::Record {
            command,
            status,
            message,
        }) => commands::record(&command, &status, &message),
    }
}
