//! Crontick engine - crontab management and execution-history reconstruction.
//!
//! The interesting part lives in [`sources`] and [`history`]: a job's past
//! executions are reconstructed by correlating its command against several
//! log sources of differing trustworthiness (our own per-job append log, the
//! systemd journal, rotating syslog files and the cron daemon's log) and
//! merging the observations into one ordered timeline.

pub mod crontab;
pub mod describe;
pub mod error;
pub mod history;
pub mod paths;
pub mod schedule;
pub mod signature;
pub mod sources;
pub mod timestamp;

pub use error::Error;
pub use history::{ExecutionLogger, HistoryResolver, JobHistory};
pub use schedule::CronJob;
pub use signature::CommandSignature;
pub use sources::{LogEntry, LogSource};
