//! Error types for schedule validation and crontab writes.
//!
//! Only failures that could corrupt the authoritative schedule surface as
//! errors. History reconstruction never fails: unreadable sources yield
//! empty data and malformed lines are skipped at the readers.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid cron expression '{expression}': {reason}")]
    InvalidExpression { expression: String, reason: String },

    #[error("{field} is required")]
    MissingField { field: &'static str },

    #[error("failed to read crontab: {0}")]
    BackendRead(String),

    #[error("failed to install crontab: {0}")]
    BackendWrite(String),

    #[error("failed to back up crontab: {0}")]
    Backup(#[source] std::io::Error),

    #[error("failed to create history directory {path}: {source}")]
    HistoryDir {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to append to execution log {path}: {source}")]
    LogAppend {
        path: String,
        #[source]
        source: std::io::Error,
    },
}
