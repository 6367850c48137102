//! Schedule model and crontab text parsing/serialization.
//!
//! The crontab itself is treated as an opaque line-oriented text blob: a
//! comment directly above an entry becomes its description, five
//! whitespace-delimited fields plus the remainder form an entry. Commands
//! are stored in the crontab with output redirection attached (only when a
//! log identifier is configured) and stripped back to the bare command for
//! display and matching.

use chrono::{DateTime, Local};
use cron::Schedule;
use regex::Regex;
use serde::Serialize;
use std::str::FromStr;

use crate::error::Error;
use crate::paths;

/// A single crontab entry.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CronJob {
    /// Free-text description, taken from the comment above the entry.
    pub description: String,
    /// Five-field cron expression.
    pub expression: String,
    /// The bare command, without logging redirection.
    pub command: String,
    /// Log identifier (custom log filename without extension). `None`
    /// means no custom log and no output redirection for this entry.
    pub log_id: Option<String>,
    /// Derived, not stored.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_run: Option<DateTime<Local>>,
    /// Derived, not stored.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_run: Option<DateTime<Local>>,
}

impl CronJob {
    /// Validate the user-editable fields before any write.
    pub fn validate(&self) -> Result<(), Error> {
        if self.expression.trim().is_empty() {
            return Err(Error::MissingField { field: "cron expression" });
        }
        if self.command.trim().is_empty() {
            return Err(Error::MissingField { field: "command" });
        }
        validate_expression(&self.expression)
    }
}

/// The `cron` crate wants six fields (with seconds); crontab expressions
/// have five. Prepend a zero seconds field and rewrite numeric weekdays to
/// names before parsing: crontab counts Sunday as 0 or 7, which is not the
/// crate's numbering, while names mean the same thing everywhere.
fn to_schedule(expr: &str) -> Result<Schedule, Error> {
    let trimmed = expr.trim();
    let fields: Vec<&str> = trimmed.split_whitespace().collect();
    if fields.len() != 5 {
        return Err(Error::InvalidExpression {
            expression: trimmed.to_string(),
            reason: "expected 5 fields (minute hour day month weekday)".to_string(),
        });
    }
    let normalized = format!(
        "0 {} {} {} {} {}",
        fields[0],
        fields[1],
        fields[2],
        fields[3],
        normalize_weekday_field(fields[4])
    );
    Schedule::from_str(&normalized).map_err(|e| Error::InvalidExpression {
        expression: trimmed.to_string(),
        reason: e.to_string(),
    })
}

/// Rewrite numeric day-of-week tokens (crontab convention: 0-7 with both 0
/// and 7 meaning Sunday) to day names, leaving everything else untouched.
fn normalize_weekday_field(field: &str) -> String {
    fn token(t: &str) -> String {
        match t {
            "0" | "7" => "Sun".to_string(),
            "1" => "Mon".to_string(),
            "2" => "Tue".to_string(),
            "3" => "Wed".to_string(),
            "4" => "Thu".to_string(),
            "5" => "Fri".to_string(),
            "6" => "Sat".to_string(),
            other => other.to_string(),
        }
    }

    field
        .split(',')
        .map(|part| {
            // A part may carry a step suffix ("1-5/2") and/or a range.
            let (range, step) = match part.split_once('/') {
                Some((r, s)) => (r, Some(s)),
                None => (part, None),
            };
            let mapped = match range.split_once('-') {
                Some((a, b)) => format!("{}-{}", token(a), token(b)),
                None => token(range),
            };
            match step {
                Some(s) => format!("{}/{}", mapped, s),
                None => mapped,
            }
        })
        .collect::<Vec<_>>()
        .join(",")
}

/// Check that a five-field cron expression is valid.
pub fn validate_expression(expr: &str) -> Result<(), Error> {
    to_schedule(expr).map(|_| ())
}

/// Next execution instant for a five-field cron expression.
pub fn next_run(expr: &str) -> Option<DateTime<Local>> {
    to_schedule(expr).ok()?.upcoming(Local).next()
}

/// Wrap a command with timestamped output redirection into its custom log.
/// Entries without a log identifier are written to the crontab untouched.
pub fn attach_logging(command: &str, log_id: Option<&str>) -> String {
    let log_id = match log_id {
        Some(id) if !id.is_empty() => id,
        _ => return command.to_string(),
    };
    let log_path = paths::log_file_path(log_id);
    let log_path = log_path.display();
    format!(
        "echo \"$(date +'%Y-%m-%d %H:%M:%S') - Starting job\" >> {} && {} >> {} 2>&1",
        log_path, command, log_path
    )
}

/// Recover the bare command from a crontab line that carries logging
/// redirection.
pub fn strip_logging(command: &str) -> String {
    // The wrapper puts the real command between the first "&&" and its ">>".
    if command.contains("echo") && command.contains("Starting job") {
        let parts: Vec<&str> = command.splitn(2, " && ").collect();
        if parts.len() == 2 {
            let main = parts[1];
            if let Some(idx) = main.find(" >>") {
                return main[..idx].trim().to_string();
            }
            return main.trim().to_string();
        }
    }
    if let Some(idx) = command.find(" >>") {
        return command[..idx].trim().to_string();
    }
    command.to_string()
}

/// Pull the log identifier back out of a command with redirection attached.
/// Hyphens are common in user-entered log names, so the capture allows them.
pub fn extract_log_id(command: &str) -> Option<String> {
    let re = Regex::new(r"\.crontick_history/([\w-]+)\.log").ok()?;
    re.captures(command).map(|c| c[1].to_string())
}

/// Parse raw crontab text into jobs. Malformed and invalid-expression lines
/// are skipped, comments directly above an entry become its description.
pub fn parse_crontab(content: &str) -> Vec<CronJob> {
    let comment_re = Regex::new(r"^\s*#\s*(.*)$").expect("static regex");
    let entry_re = Regex::new(r"^\s*(\S+\s+\S+\s+\S+\s+\S+\s+\S+)\s+(.+)$").expect("static regex");

    let mut jobs = Vec::new();
    let mut description = String::new();

    for line in content.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        if let Some(caps) = comment_re.captures(line) {
            // Managed-header comments mention "cron"; ignore those.
            let text = caps[1].trim().to_string();
            if !text.to_lowercase().contains("cron") {
                description = text;
            }
            continue;
        }

        if let Some(caps) = entry_re.captures(line) {
            let expression = caps[1].to_string();
            let raw_command = caps[2].to_string();

            let command = strip_logging(&raw_command);
            let log_id = extract_log_id(&raw_command);

            let next = match next_run(&expression) {
                Some(t) => t,
                None => {
                    tracing::warn!("skipping entry with invalid expression: {}", expression);
                    description.clear();
                    continue;
                }
            };

            jobs.push(CronJob {
                description: std::mem::take(&mut description),
                expression,
                command,
                log_id,
                next_run: Some(next),
                last_run: None,
            });
        }
    }

    jobs
}

/// Serialize jobs back to crontab text, re-attaching redirection for
/// entries that have a log identifier.
pub fn serialize_crontab(jobs: &[CronJob]) -> String {
    let mut out = String::new();
    out.push_str("# Managed by crontick\n");
    out.push_str(&format!(
        "# Generated on {}\n\n",
        Local::now().format("%Y-%m-%d %H:%M:%S")
    ));

    for job in jobs {
        if !job.description.is_empty() {
            out.push_str(&format!("# {}\n", job.description));
        }
        let command = attach_logging(&job.command, job.log_id.as_deref());
        out.push_str(&format!("{} {}\n\n", job.expression, command));
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validates_common_expressions() {
        assert!(validate_expression("0 2 * * *").is_ok());
        assert!(validate_expression("*/15 * * * *").is_ok());
        assert!(validate_expression("0 9 * * 1-5").is_ok());
        // Crontab's Sunday spellings.
        assert!(validate_expression("0 3 * * 0").is_ok());
        assert!(validate_expression("0 3 * * 7").is_ok());
    }

    #[test]
    fn weekday_zero_means_sunday() {
        use chrono::{Datelike, Weekday};
        let next = next_run("0 12 * * 0").unwrap();
        assert_eq!(next.weekday(), Weekday::Sun);
    }

    #[test]
    fn weekday_field_normalization() {
        assert_eq!(normalize_weekday_field("0"), "Sun");
        assert_eq!(normalize_weekday_field("1-5"), "Mon-Fri");
        assert_eq!(normalize_weekday_field("1,3,5"), "Mon,Wed,Fri");
        assert_eq!(normalize_weekday_field("*"), "*");
        assert_eq!(normalize_weekday_field("Mon"), "Mon");
    }

    #[test]
    fn rejects_bad_expressions() {
        assert!(validate_expression("not an expression").is_err());
        assert!(validate_expression("0 2 * *").is_err());
        assert!(validate_expression("61 2 * * *").is_err());
    }

    #[test]
    fn next_run_is_in_the_future() {
        let next = next_run("* * * * *").unwrap();
        assert!(next > Local::now());
    }

    #[test]
    fn validate_requires_expression_and_command() {
        let job = CronJob {
            expression: "0 2 * * *".to_string(),
            ..Default::default()
        };
        assert!(matches!(
            job.validate(),
            Err(Error::MissingField { field: "command" })
        ));

        let job = CronJob {
            command: "/bin/true".to_string(),
            ..Default::default()
        };
        assert!(matches!(
            job.validate(),
            Err(Error::MissingField { field: "cron expression" })
        ));
    }

    #[test]
    fn attach_logging_only_with_log_id() {
        let plain = attach_logging("/home/user/backup.sh", None);
        assert_eq!(plain, "/home/user/backup.sh");
        assert!(!plain.contains(">>"));

        let wrapped = attach_logging("/home/user/backup.sh", Some("backup"));
        assert!(wrapped.contains("Starting job"));
        assert!(wrapped.contains("backup.log"));
        assert!(wrapped.ends_with("2>&1"));
    }

    #[test]
    fn strip_logging_round_trips() {
        let wrapped = attach_logging("/home/user/backup.sh --full", Some("backup"));
        assert_eq!(strip_logging(&wrapped), "/home/user/backup.sh --full");
    }

    #[test]
    fn strip_logging_handles_bare_redirection() {
        assert_eq!(
            strip_logging("/home/user/backup.sh >> /tmp/out.log 2>&1"),
            "/home/user/backup.sh"
        );
        assert_eq!(strip_logging("/home/user/backup.sh"), "/home/user/backup.sh");
    }

    #[test]
    fn extract_log_id_from_wrapped_command() {
        let wrapped = attach_logging("/home/user/backup.sh", Some("backup"));
        assert_eq!(extract_log_id(&wrapped), Some("backup".to_string()));
        assert_eq!(extract_log_id("/home/user/backup.sh"), None);
    }

    #[test]
    fn hyphenated_log_id_round_trips() {
        let wrapped = attach_logging("/home/user/backup.sh", Some("my-backup"));
        assert_eq!(extract_log_id(&wrapped), Some("my-backup".to_string()));

        let jobs = vec![CronJob {
            expression: "0 2 * * *".to_string(),
            command: "/home/user/backup.sh".to_string(),
            log_id: Some("my-backup".to_string()),
            ..Default::default()
        }];
        let parsed = parse_crontab(&serialize_crontab(&jobs));
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed[0].log_id, Some("my-backup".to_string()));
        assert_eq!(parsed[0].command, "/home/user/backup.sh");
    }

    #[test]
    fn parses_descriptions_and_entries() {
        let content = "\
# Managed by crontick
# Generated on 2024-01-01 00:00:00

# Daily backup
0 2 * * * /home/user/backup.sh

0 * * * * /usr/bin/cleanup.sh
";
        let jobs = parse_crontab(content);
        assert_eq!(jobs.len(), 2);
        assert_eq!(jobs[0].description, "Daily backup");
        assert_eq!(jobs[0].command, "/home/user/backup.sh");
        assert!(jobs[0].next_run.is_some());
        assert_eq!(jobs[1].description, "");
    }

    #[test]
    fn skips_invalid_expressions() {
        let content = "99 99 * * * /bin/broken\n0 2 * * * /bin/ok\n";
        let jobs = parse_crontab(content);
        assert_eq!(jobs.len(), 1);
        assert_eq!(jobs[0].command, "/bin/ok");
    }

    #[test]
    fn serialize_round_trips_log_id() {
        let jobs = vec![CronJob {
            description: "Daily backup".to_string(),
            expression: "0 2 * * *".to_string(),
            command: "/home/user/backup.sh".to_string(),
            log_id: Some("backup".to_string()),
            ..Default::default()
        }];
        let text = serialize_crontab(&jobs);
        let parsed = parse_crontab(&text);
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed[0].description, "Daily backup");
        assert_eq!(parsed[0].command, "/home/user/backup.sh");
        assert_eq!(parsed[0].log_id, Some("backup".to_string()));
    }

    #[test]
    fn serialize_without_log_id_has_no_redirection() {
        let jobs = vec![CronJob {
            expression: "0 2 * * *".to_string(),
            command: "/home/user/backup.sh".to_string(),
            ..Default::default()
        }];
        let text = serialize_crontab(&jobs);
        assert!(!text.contains(">>"));
        assert!(!text.contains("Starting job"));
    }
}
