//! History aggregation, last-run resolution and the custom execution logger.
//!
//! The resolver merges the four sources into one timeline: custom log first
//! (authoritative), then journal, syslog and the cron daemon's log in fixed
//! priority order. Sub-query failures were already absorbed by the readers,
//! so no partial-failure handling exists at this layer.

use chrono::{DateTime, Local};
use std::collections::HashSet;
use std::fs::OpenOptions;
use std::io::Write;
use std::os::unix::fs::DirBuilderExt;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::Error;
use crate::paths;
use crate::schedule::CronJob;
use crate::signature::CommandSignature;
use crate::sources::{
    CronLogReader, CustomLogReader, JournalReader, LogEntry, LogSource, SyslogReader,
};
use crate::timestamp;

/// Hard cap on aggregated history entries.
const HISTORY_CAP: usize = 50;

/// Aggregated history for one schedule entry.
#[derive(Debug)]
pub struct JobHistory {
    /// False when the entry has no log identifier: no custom execution log
    /// exists and none was opened. The UI renders this as an explicit
    /// "no log configured" state rather than an empty history.
    pub log_configured: bool,
    pub entries: Vec<LogEntry>,
}

/// Merges the log sources into ordered timelines and resolves last runs.
pub struct HistoryResolver {
    custom: Box<dyn LogSource>,
    /// Journal, syslog, cron log - in trust order.
    system: Vec<Box<dyn LogSource>>,
}

impl HistoryResolver {
    pub fn new() -> Self {
        Self {
            custom: Box::new(CustomLogReader::new()),
            system: vec![
                Box::new(JournalReader),
                Box::new(SyslogReader::new()),
                Box::new(CronLogReader::new()),
            ],
        }
    }

    /// Substitute sources; the first is the custom (authoritative) log,
    /// the rest are the system fallbacks in priority order.
    pub fn with_sources(custom: Box<dyn LogSource>, system: Vec<Box<dyn LogSource>>) -> Self {
        Self { custom, system }
    }

    /// Full history for a command, keyed by its derived safe identifier.
    pub fn history(&self, command: &str) -> Vec<LogEntry> {
        let sig = CommandSignature::new(command);
        self.collect(&sig, true)
    }

    /// Full history for a schedule entry. Entries without a log identifier
    /// never touch any custom log file; the system sources still fill in
    /// what they can.
    pub fn history_for_job(&self, job: &CronJob) -> JobHistory {
        let log_configured = job.log_id.is_some();
        let sig = CommandSignature::with_log_id(&job.command, job.log_id.as_deref());
        JobHistory {
            log_configured,
            entries: self.collect(&sig, log_configured),
        }
    }

    /// Most recent execution instant for a command. The custom log short-
    /// circuits: when it yields a valid instant no other source is queried,
    /// which keeps routine table refresh cheap.
    pub fn last_run(&self, command: &str) -> Option<DateTime<Local>> {
        let sig = CommandSignature::new(command);
        self.resolve_last_run(&sig, true)
    }

    /// Last run for a schedule entry, honoring the no-log-configured gate.
    pub fn last_run_for_job(&self, job: &CronJob) -> Option<DateTime<Local>> {
        let sig = CommandSignature::with_log_id(&job.command, job.log_id.as_deref());
        self.resolve_last_run(&sig, job.log_id.is_some())
    }

    fn collect(&self, sig: &CommandSignature, include_custom: bool) -> Vec<LogEntry> {
        let mut entries = Vec::new();

        if include_custom {
            entries.extend(self.custom.find(sig));
        }
        // The other sources are queried even when the custom log already
        // has data: they may hold executions that predate custom logging.
        for source in &self.system {
            let found = source.find(sig);
            debug!("{} source yielded {} entries", source.name(), found.len());
            entries.extend(found);
        }

        // Newest first; unknown instants after all valid ones.
        entries.sort_by_key(|e| std::cmp::Reverse(e.timestamp));

        // Two sources describing the same execution collapse to one. The
        // sort is stable, so the custom-log version wins ties.
        let mut seen = HashSet::new();
        entries.retain(|e| {
            let instant = match e.timestamp {
                Some(t) => timestamp::format_second(t),
                None => String::new(),
            };
            seen.insert((instant, e.message.clone()))
        });

        entries.truncate(HISTORY_CAP);
        entries
    }

    fn resolve_last_run(
        &self,
        sig: &CommandSignature,
        include_custom: bool,
    ) -> Option<DateTime<Local>> {
        if include_custom {
            if let Some(t) = newest(&self.custom.find(sig)) {
                return Some(t);
            }
        }
        for source in &self.system {
            if let Some(t) = newest(&source.find(sig)) {
                return Some(t);
            }
        }
        None
    }
}

impl Default for HistoryResolver {
    fn default() -> Self {
        Self::new()
    }
}

fn newest(entries: &[LogEntry]) -> Option<DateTime<Local>> {
    entries.iter().filter_map(|e| e.timestamp).max()
}

// ---------------------------------------------------------------------------
// Custom execution logger
// ---------------------------------------------------------------------------

/// Append-only writer for the per-job custom log, the ground-truth source
/// when present. A failed append never corrupts existing content.
pub struct ExecutionLogger {
    dir: PathBuf,
}

impl ExecutionLogger {
    pub fn new() -> Self {
        Self {
            dir: paths::history_dir(),
        }
    }

    pub fn with_dir(dir: PathBuf) -> Self {
        Self { dir }
    }

    /// Append one execution record for `command`, keyed by its derived
    /// safe identifier.
    pub fn record(&self, command: &str, status: &str, message: &str) -> Result<(), Error> {
        ensure_dir(&self.dir)?;

        let sig = CommandSignature::new(command);
        let path = self.dir.join(sig.log_filename());

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|e| Error::LogAppend {
                path: path.display().to_string(),
                source: e,
            })?;

        let line = format!(
            "{}|{}|{}|{}\n",
            Local::now().format("%Y-%m-%d %H:%M:%S"),
            status,
            command,
            message
        );
        file.write_all(line.as_bytes()).map_err(|e| Error::LogAppend {
            path: path.display().to_string(),
            source: e,
        })
    }
}

impl Default for ExecutionLogger {
    fn default() -> Self {
        Self::new()
    }
}

/// Create the history directory if needed (0755, idempotent).
pub fn ensure_dir(dir: &Path) -> Result<(), Error> {
    if dir.is_dir() {
        return Ok(());
    }
    std::fs::DirBuilder::new()
        .recursive(true)
        .mode(0o755)
        .create(dir)
        .map_err(|e| Error::HistoryDir {
            path: dir.display().to_string(),
            source: e,
        })
}

/// Create the default history directory (used before crontab writes, since
/// attached redirection targets it).
pub fn ensure_history_dir() -> Result<(), Error> {
    ensure_dir(&paths::history_dir())
}
