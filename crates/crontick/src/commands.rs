//! Non-interactive subcommand handlers.

use anyhow::{bail, Context, Result};
use chrono::{DateTime, Local};

use crontick_common::crontab::{self, SystemCrontab};
use crontick_common::history::{ExecutionLogger, HistoryResolver};
use crontick_common::schedule::CronJob;
use crontick_common::timestamp;

fn format_instant(t: Option<DateTime<Local>>) -> String {
    match t {
        Some(t) => timestamp::format_second(t),
        None => "Never".to_string(),
    }
}

/// `crontick list` - print the schedule with derived run times.
pub fn list(json: bool) -> Result<()> {
    let jobs = load_with_last_runs()?;

    if json {
        println!("{}", serde_json::to_string_pretty(&jobs)?);
        return Ok(());
    }

    if jobs.is_empty() {
        println!("No schedule entries.");
        return Ok(());
    }

    for (i, job) in jobs.iter().enumerate() {
        let description = if job.description.is_empty() {
            "No description"
        } else {
            &job.description
        };
        println!("{:>3}. {}", i + 1, description);
        println!("     {}  {}", job.expression, job.command);
        println!(
            "     next: {}  last: {}  log: {}",
            format_instant(job.next_run),
            format_instant(job.last_run),
            job.log_id.as_deref().unwrap_or("not configured"),
        );
    }
    Ok(())
}

/// `crontick history <selector>` - reconstructed timeline for an entry
/// number or a literal command line.
pub fn history(selector: &str) -> Result<()> {
    let resolver = HistoryResolver::new();

    if let Ok(index) = selector.parse::<usize>() {
        let jobs = crontab::load_jobs(&SystemCrontab)?;
        if index == 0 || index > jobs.len() {
            bail!("no entry {} (schedule has {} entries)", index, jobs.len());
        }
        let job = &jobs[index - 1];
        let report = resolver.history_for_job(job);
        if !report.log_configured {
            println!("No log configured for this entry; showing system log matches only.");
        }
        print_entries(&report.entries);
        return Ok(());
    }

    print_entries(&resolver.history(selector));
    Ok(())
}

fn print_entries(entries: &[crontick_common::LogEntry]) {
    if entries.is_empty() {
        println!("No execution history found.");
        return;
    }
    for entry in entries {
        println!(
            "{} [{}] {}",
            format_instant(entry.timestamp),
            entry.status,
            entry.message
        );
    }
}

/// `crontick record` - append to a command's custom execution log.
pub fn record(command: &str, status: &str, message: &str) -> Result<()> {
    ExecutionLogger::new()
        .record(command, status, message)
        .context("failed to record execution")
}

/// Load the schedule and resolve last runs for display.
pub fn load_with_last_runs() -> Result<Vec<CronJob>> {
    let mut jobs = crontab::load_jobs(&SystemCrontab)?;
    let resolver = HistoryResolver::new();
    for job in &mut jobs {
        job.last_run = resolver.last_run_for_job(job);
    }
    Ok(jobs)
}
