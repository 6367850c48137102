//! Log-source readers for execution-history reconstruction.
//!
//! Four sources, one contract: `find(signature) -> Vec<LogEntry>`. Every
//! source is unreliable by nature (rotated away, permissions, absent
//! daemon), so the contract makes "no data" and "error querying"
//! indistinguishable: both yield an empty vec and the aggregator never
//! needs per-source error branches.
//!
//! The scraping regexes are deliberately loose. Log line shapes vary
//! slightly between distributions and the skip-on-no-match tolerance is
//! what keeps the readers forward compatible; do not tighten them.

use chrono::{DateTime, Local};
use regex::Regex;
use serde::Serialize;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::PathBuf;
use std::process::Command;
use tracing::{debug, warn};

use crate::paths;
use crate::signature::CommandSignature;
use crate::timestamp;

/// One historical observation of a job execution. Ephemeral: recomputed on
/// every query, never persisted by the aggregator.
#[derive(Debug, Clone, Serialize)]
pub struct LogEntry {
    /// When it reportedly ran. `None` means the source could not say.
    pub timestamp: Option<DateTime<Local>>,
    /// Free-text classification; sources differ in vocabulary
    /// ("completed", "executed", "log", ...).
    pub status: String,
    pub message: String,
}

/// Common capability of the four log sources.
pub trait LogSource {
    fn name(&self) -> &'static str;

    /// All observations matching the signature, most-recent-first or
    /// unordered. Empty on any failure.
    fn find(&self, sig: &CommandSignature) -> Vec<LogEntry>;
}

// ---------------------------------------------------------------------------
// Custom per-job append log (ground truth when present)
// ---------------------------------------------------------------------------

/// Reads the `|`-delimited per-job log written by [`crate::ExecutionLogger`]
/// and by the output redirection attached to scheduled commands.
pub struct CustomLogReader {
    dir: PathBuf,
}

impl CustomLogReader {
    pub fn new() -> Self {
        Self {
            dir: paths::history_dir(),
        }
    }

    pub fn with_dir(dir: PathBuf) -> Self {
        Self { dir }
    }
}

impl Default for CustomLogReader {
    fn default() -> Self {
        Self::new()
    }
}

impl LogSource for CustomLogReader {
    fn name(&self) -> &'static str {
        "custom"
    }

    fn find(&self, sig: &CommandSignature) -> Vec<LogEntry> {
        let path = self.dir.join(sig.log_filename());
        let file = match File::open(&path) {
            Ok(f) => f,
            // File doesn't exist yet; not an error.
            Err(_) => return Vec::new(),
        };

        let mut entries = Vec::new();
        for line in BufReader::new(file).lines() {
            let line = match line {
                Ok(l) => l,
                Err(_) => break,
            };
            // timestamp|status|original command|message
            let parts: Vec<&str> = line.splitn(4, '|').collect();
            if parts.len() != 4 {
                continue;
            }
            let timestamp = match timestamp::parse_full(parts[0]) {
                Some(t) => t,
                None => continue,
            };
            entries.push(LogEntry {
                timestamp: Some(timestamp),
                status: parts[1].to_string(),
                message: parts[3].to_string(),
            });
        }

        entries.sort_by_key(|e| std::cmp::Reverse(e.timestamp));
        entries
    }
}

// ---------------------------------------------------------------------------
// systemd journal
// ---------------------------------------------------------------------------

/// Queries the systemd journal through `journalctl`, filtered by the cron
/// unit, a one-month window and the command's main token.
pub struct JournalReader;

impl LogSource for JournalReader {
    fn name(&self) -> &'static str {
        "journal"
    }

    fn find(&self, sig: &CommandSignature) -> Vec<LogEntry> {
        if sig.main_token.is_empty() {
            return Vec::new();
        }

        let output = Command::new("journalctl")
            .args([
                "--user",
                "-u",
                "cron",
                "--since",
                "1 month ago",
                "--grep",
                &sig.main_token,
                "-n",
                "100",
                "--output",
                "short-iso",
            ])
            .output();

        let output = match output {
            Ok(o) if o.status.success() => o,
            Ok(o) => {
                debug!(
                    "journalctl exited with {}: {}",
                    o.status,
                    String::from_utf8_lossy(&o.stderr).trim()
                );
                return Vec::new();
            }
            Err(e) => {
                debug!("failed to run journalctl: {}", e);
                return Vec::new();
            }
        };

        parse_journal_output(&String::from_utf8_lossy(&output.stdout))
    }
}

/// One line per record: `2023-08-12T10:30:15+0000 hostname message...`
fn parse_journal_output(output: &str) -> Vec<LogEntry> {
    let re = Regex::new(r"(\d{4}-\d{2}-\d{2}T\d{2}:\d{2}:\d{2}[+-]\d{4})\s+\S+\s+(.*)")
        .expect("static regex");

    let mut entries = Vec::new();
    for line in output.lines() {
        let caps = match re.captures(line) {
            Some(c) => c,
            None => continue,
        };
        let timestamp = match timestamp::parse_journal(&caps[1]) {
            Some(t) => t,
            None => continue,
        };
        entries.push(LogEntry {
            timestamp: Some(timestamp),
            status: "executed".to_string(),
            message: caps[2].to_string(),
        });
    }
    entries
}

// ---------------------------------------------------------------------------
// Rotating syslog
// ---------------------------------------------------------------------------

/// Scans `/var/log/syslog` and its first rotated backup for CRON lines
/// mentioning the main token.
pub struct SyslogReader {
    files: Vec<PathBuf>,
}

impl SyslogReader {
    pub fn new() -> Self {
        Self {
            files: vec![
                PathBuf::from("/var/log/syslog"),
                PathBuf::from("/var/log/syslog.1"),
            ],
        }
    }

    pub fn with_files(files: Vec<PathBuf>) -> Self {
        Self { files }
    }
}

impl Default for SyslogReader {
    fn default() -> Self {
        Self::new()
    }
}

impl LogSource for SyslogReader {
    fn name(&self) -> &'static str {
        "syslog"
    }

    fn find(&self, sig: &CommandSignature) -> Vec<LogEntry> {
        // Requires the CRON marker so unrelated daemon chatter that happens
        // to mention the token does not count as an execution.
        scan_files(&self.files, &sig.main_token, Some("CRON"))
    }
}

// ---------------------------------------------------------------------------
// Dedicated cron daemon log
// ---------------------------------------------------------------------------

/// Same shape as [`SyslogReader`] but targets the cron daemon's own log,
/// where every line is already cron's, so no marker is required.
pub struct CronLogReader {
    files: Vec<PathBuf>,
}

impl CronLogReader {
    pub fn new() -> Self {
        Self {
            files: vec![
                PathBuf::from("/var/log/cron"),
                PathBuf::from("/var/log/cron.1"),
            ],
        }
    }

    pub fn with_files(files: Vec<PathBuf>) -> Self {
        Self { files }
    }
}

impl Default for CronLogReader {
    fn default() -> Self {
        Self::new()
    }
}

impl LogSource for CronLogReader {
    fn name(&self) -> &'static str {
        "cronlog"
    }

    fn find(&self, sig: &CommandSignature) -> Vec<LogEntry> {
        scan_files(&self.files, &sig.main_token, None)
    }
}

/// Scan plain-text log files for lines with a short timestamp, an optional
/// marker token and the command's main token. Group 1 is the timestamp,
/// group 2 the text after the token (the message). Missing files are
/// skipped, as are lines whose timestamp fails to parse.
fn scan_files(files: &[PathBuf], main_token: &str, marker: Option<&str>) -> Vec<LogEntry> {
    if main_token.is_empty() {
        return Vec::new();
    }

    let pattern = match marker {
        Some(marker) => format!(
            r"(\w{{3}}\s+\d{{1,2}}\s+\d{{2}}:\d{{2}}:\d{{2}}).*{}.*{}(.*)",
            regex::escape(marker),
            regex::escape(main_token)
        ),
        None => format!(
            r"(\w{{3}}\s+\d{{1,2}}\s+\d{{2}}:\d{{2}}:\d{{2}}).*{}(.*)",
            regex::escape(main_token)
        ),
    };
    let re = match Regex::new(&pattern) {
        Ok(re) => re,
        Err(e) => {
            warn!("bad log scan pattern: {}", e);
            return Vec::new();
        }
    };

    let mut entries = Vec::new();
    for path in files {
        let file = match File::open(path) {
            Ok(f) => f,
            Err(_) => continue,
        };
        for line in BufReader::new(file).lines() {
            let line = match line {
                Ok(l) => l,
                Err(_) => break,
            };
            let caps = match re.captures(&line) {
                Some(c) => c,
                None => continue,
            };
            let timestamp = match timestamp::parse_short(&caps[1]) {
                Some(t) => t,
                None => continue,
            };
            entries.push(LogEntry {
                timestamp: Some(timestamp),
                status: "executed".to_string(),
                message: caps[2].trim().to_string(),
            });
        }
    }
    entries
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn journal_output_parsing() {
        let output = "\
2023-08-12T10:30:15+0000 myhost CRON[1234]: (user) CMD (/home/user/backup.sh)
garbage line without a timestamp
2023-08-13T10:30:15+0000 myhost CRON[1235]: (user) CMD (/home/user/backup.sh)
";
        let entries = parse_journal_output(output);
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].status, "executed");
        assert!(entries[0].message.contains("backup.sh"));
    }

    #[test]
    fn empty_main_token_matches_nothing() {
        // A whitespace-only command has an empty main token; both the
        // journal reader and the file scanners bail before touching
        // anything external.
        let sig = CommandSignature::new("   ");
        assert!(JournalReader.find(&sig).is_empty());
        assert!(scan_files(&[PathBuf::from("/var/log/syslog")], "", Some("CRON")).is_empty());
    }
}
