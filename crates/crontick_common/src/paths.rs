//! Path helpers for crontick's on-disk state.
//!
//! Everything lives under the user's home directory: the per-job execution
//! logs in `~/.crontick_history` and crontab snapshots in
//! `~/.crontick_backups`. `CRONTICK_HISTORY_DIR` / `CRONTICK_BACKUP_DIR`
//! override the defaults (used by the test suite to stay out of `$HOME`).

use std::path::PathBuf;

const HISTORY_DIR_NAME: &str = ".crontick_history";
const BACKUP_DIR_NAME: &str = ".crontick_backups";

/// Directory holding the per-job execution logs.
pub fn history_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("CRONTICK_HISTORY_DIR") {
        return PathBuf::from(dir);
    }
    match dirs::home_dir() {
        Some(home) => home.join(HISTORY_DIR_NAME),
        None => PathBuf::from("/tmp").join(HISTORY_DIR_NAME),
    }
}

/// Directory holding crontab snapshots taken before each write.
pub fn backup_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("CRONTICK_BACKUP_DIR") {
        return PathBuf::from(dir);
    }
    match dirs::home_dir() {
        Some(home) => home.join(BACKUP_DIR_NAME),
        None => PathBuf::from("/tmp").join(BACKUP_DIR_NAME),
    }
}

/// Full path of a job's execution log given its log identifier
/// (without the `.log` extension).
pub fn log_file_path(log_id: &str) -> PathBuf {
    history_dir().join(format!("{}.log", log_id))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_file_path_appends_extension() {
        let path = log_file_path("backup");
        assert!(path.to_string_lossy().ends_with("backup.log"));
    }
}
