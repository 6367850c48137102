//! Save-path integration test: backup before write, redirection gating,
//! round-trip through the backend.
//!
//! Kept as a single test function because it points the history/backup
//! directories at a temp dir through environment variables, which are
//! process-global.

use crontick_common::crontab::{self, MemoryBackend};
use crontick_common::schedule::CronJob;

#[test]
fn save_backs_up_and_gates_redirection_on_log_id() {
    let dir = tempfile::tempdir().unwrap();
    let history_dir = dir.path().join(".crontick_history");
    let backup_dir = dir.path().join("backups");
    std::env::set_var("CRONTICK_HISTORY_DIR", &history_dir);
    std::env::set_var("CRONTICK_BACKUP_DIR", &backup_dir);

    let backend = MemoryBackend::new("# Old entry\n0 1 * * * /bin/old.sh\n");

    let jobs = vec![
        CronJob {
            description: "Daily backup".to_string(),
            expression: "0 2 * * *".to_string(),
            command: "/home/user/backup.sh".to_string(),
            log_id: Some("backup".to_string()),
            ..Default::default()
        },
        CronJob {
            description: String::new(),
            expression: "0 3 * * 0".to_string(),
            command: "/usr/bin/cleanup.sh".to_string(),
            log_id: None,
            ..Default::default()
        },
    ];

    crontab::save_jobs(&backend, &jobs).unwrap();

    // The pre-write snapshot holds the previous schedule.
    let backups: Vec<_> = std::fs::read_dir(&backup_dir).unwrap().collect();
    assert_eq!(backups.len(), 1);
    let backup_content =
        std::fs::read_to_string(backups[0].as_ref().unwrap().path()).unwrap();
    assert!(backup_content.contains("/bin/old.sh"));

    // History dir exists for the attached redirection to target.
    assert!(history_dir.is_dir());

    let written = backend.contents();
    // The entry with a log identifier carries redirection into its log...
    assert!(written.contains("backup.log"));
    assert!(written.contains("Starting job"));
    // ...the entry without one is written untouched.
    let cleanup_line = written
        .lines()
        .find(|l| l.contains("cleanup.sh"))
        .expect("cleanup entry present");
    assert!(!cleanup_line.contains(">>"));

    // And the written text parses back to the same schedule.
    let parsed = crontab::load_jobs(&backend).unwrap();
    assert_eq!(parsed.len(), 2);
    assert_eq!(parsed[0].log_id, Some("backup".to_string()));
    assert_eq!(parsed[0].command, "/home/user/backup.sh");
    assert_eq!(parsed[1].log_id, None);
    assert_eq!(parsed[1].command, "/usr/bin/cleanup.sh");
}
