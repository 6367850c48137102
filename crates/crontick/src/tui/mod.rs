//! Interactive terminal interface.
//!
//! Four views: the job table, the edit form, the reconstructed history
//! timeline and a cron-expression help screen. Everything runs on the
//! calling thread; history queries block until done, which is acceptable
//! because they are user-triggered.

mod event_loop;
mod help;
mod render;
mod state;

pub use event_loop::run;
pub use state::{App, ViewMode};
