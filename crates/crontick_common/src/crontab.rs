//! Crontab storage backend.
//!
//! The schedule store is an opaque text blob with a `read`/`write` contract.
//! The system implementation shells out to `crontab`; tests and dry runs use
//! [`MemoryBackend`]. Every write is preceded by a snapshot into the backup
//! directory so a bad save is always recoverable by hand.

use chrono::Local;
use std::io::Write;
use std::process::{Command, Stdio};
use std::sync::Mutex;
use tracing::{info, warn};

use crate::error::Error;
use crate::history;
use crate::paths;
use crate::schedule::{self, CronJob};

/// Read/write access to the user's schedule as raw text.
pub trait ScheduleBackend {
    fn read(&self) -> Result<String, Error>;
    fn write(&self, content: &str) -> Result<(), Error>;
}

/// The real crontab, via the `crontab` binary.
pub struct SystemCrontab;

impl ScheduleBackend for SystemCrontab {
    fn read(&self) -> Result<String, Error> {
        let output = Command::new("crontab")
            .arg("-l")
            .output()
            .map_err(|e| Error::BackendRead(e.to_string()))?;

        if output.status.success() {
            return Ok(String::from_utf8_lossy(&output.stdout).into_owned());
        }

        let stderr = String::from_utf8_lossy(&output.stderr);
        // An absent crontab is an empty schedule, not an error.
        if stderr.contains("no crontab") {
            return Ok(String::new());
        }
        Err(Error::BackendRead(stderr.trim().to_string()))
    }

    fn write(&self, content: &str) -> Result<(), Error> {
        // `crontab -` installs from stdin; no temp file needed.
        let mut child = Command::new("crontab")
            .arg("-")
            .stdin(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| Error::BackendWrite(e.to_string()))?;

        if let Some(stdin) = child.stdin.take() {
            let mut stdin = stdin;
            stdin
                .write_all(content.as_bytes())
                .map_err(|e| Error::BackendWrite(e.to_string()))?;
        }

        let output = child
            .wait_with_output()
            .map_err(|e| Error::BackendWrite(e.to_string()))?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(Error::BackendWrite(stderr.trim().to_string()));
        }
        Ok(())
    }
}

/// In-memory backend for tests and `--dry-run` style flows.
pub struct MemoryBackend {
    content: Mutex<String>,
}

impl MemoryBackend {
    pub fn new(initial: &str) -> Self {
        Self {
            content: Mutex::new(initial.to_string()),
        }
    }

    pub fn contents(&self) -> String {
        self.content.lock().expect("backend lock").clone()
    }
}

impl ScheduleBackend for MemoryBackend {
    fn read(&self) -> Result<String, Error> {
        Ok(self.contents())
    }

    fn write(&self, content: &str) -> Result<(), Error> {
        *self.content.lock().expect("backend lock") = content.to_string();
        Ok(())
    }
}

/// Load and parse the schedule.
pub fn load_jobs(backend: &dyn ScheduleBackend) -> Result<Vec<CronJob>, Error> {
    let raw = backend.read()?;
    let jobs = schedule::parse_crontab(&raw);
    info!("loaded {} schedule entries", jobs.len());
    Ok(jobs)
}

/// Serialize and install the schedule. Backs up the current crontab and
/// ensures the history directory first (attached redirection targets it).
/// On any failure the backend is left untouched, so retry is safe.
pub fn save_jobs(backend: &dyn ScheduleBackend, jobs: &[CronJob]) -> Result<(), Error> {
    backup(backend)?;
    history::ensure_history_dir()?;
    backend.write(&schedule::serialize_crontab(jobs))
}

/// Snapshot the current crontab into the backup directory.
pub fn backup(backend: &dyn ScheduleBackend) -> Result<std::path::PathBuf, Error> {
    let dir = paths::backup_dir();
    std::fs::create_dir_all(&dir).map_err(Error::Backup)?;

    let content = match backend.read() {
        Ok(c) if !c.is_empty() => c,
        Ok(_) => "# No crontab found\n".to_string(),
        Err(e) => {
            warn!("backing up unreadable crontab as empty: {}", e);
            "# No crontab found\n".to_string()
        }
    };

    let path = dir.join(format!(
        "crontab_backup_{}",
        Local::now().format("%Y-%m-%d_%H-%M-%S")
    ));
    std::fs::write(&path, content).map_err(Error::Backup)?;
    info!("crontab backed up to {}", path.display());
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_backend_round_trip() {
        let backend = MemoryBackend::new("# Daily backup\n0 2 * * * /home/user/backup.sh\n");
        let jobs = load_jobs(&backend).unwrap();
        assert_eq!(jobs.len(), 1);
        assert_eq!(jobs[0].description, "Daily backup");
    }
}
