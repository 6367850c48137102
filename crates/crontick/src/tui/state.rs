//! TUI application state and the transitions driven by the event loop.

use crontick_common::crontab::{self, ScheduleBackend};
use crontick_common::history::{HistoryResolver, JobHistory};
use crontick_common::schedule::CronJob;
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewMode {
    Table,
    Edit,
    History,
    Help,
}

/// Edit-form fields, in tab order.
pub const FIELD_DESCRIPTION: usize = 0;
pub const FIELD_EXPRESSION: usize = 1;
pub const FIELD_COMMAND: usize = 2;
pub const FIELD_LOG_ID: usize = 3;
pub const FIELD_COUNT: usize = 4;

/// A minimal line-input buffer.
#[derive(Debug, Default, Clone)]
pub struct Input {
    pub value: String,
}

impl Input {
    pub fn push(&mut self, c: char) {
        self.value.push(c);
    }

    pub fn pop(&mut self) {
        self.value.pop();
    }

    pub fn set(&mut self, value: &str) {
        self.value = value.to_string();
    }

    pub fn clear(&mut self) {
        self.value.clear();
    }
}

pub struct App {
    pub mode: ViewMode,
    pub jobs: Vec<CronJob>,
    pub selected: usize,
    /// Index of the job being edited; `None` while adding a new one.
    pub edit_index: Option<usize>,
    pub inputs: [Input; FIELD_COUNT],
    pub active_input: usize,
    pub history: Option<JobHistory>,
    /// Shown above the history timeline.
    pub history_title: String,
    pub error: Option<String>,
    pub message: Option<String>,
    pub should_quit: bool,

    backend: Box<dyn ScheduleBackend>,
    resolver: HistoryResolver,
}

impl App {
    pub fn new(backend: Box<dyn ScheduleBackend>) -> Self {
        let mut app = Self {
            mode: ViewMode::Table,
            jobs: Vec::new(),
            selected: 0,
            edit_index: None,
            inputs: Default::default(),
            active_input: 0,
            history: None,
            history_title: String::new(),
            error: None,
            message: None,
            should_quit: false,
            backend,
            resolver: HistoryResolver::new(),
        };
        app.load_jobs();
        app
    }

    /// Reload the schedule and re-resolve last runs.
    pub fn load_jobs(&mut self) {
        match crontab::load_jobs(self.backend.as_ref()) {
            Ok(mut jobs) => {
                for job in &mut jobs {
                    job.last_run = self.resolver.last_run_for_job(job);
                }
                self.jobs = jobs;
                if self.selected >= self.jobs.len() {
                    self.selected = self.jobs.len().saturating_sub(1);
                }
                self.error = None;
            }
            Err(e) => self.error = Some(format!("Error loading cron jobs: {}", e)),
        }
    }

    pub fn select_next(&mut self) {
        if !self.jobs.is_empty() && self.selected + 1 < self.jobs.len() {
            self.selected += 1;
        }
    }

    pub fn select_previous(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    /// Enter the edit form for a new entry.
    pub fn start_new(&mut self) {
        self.mode = ViewMode::Edit;
        self.edit_index = None;
        self.reset_inputs();
        self.error = None;
    }

    /// Enter the edit form for the selected entry.
    pub fn start_edit(&mut self) {
        if self.jobs.is_empty() {
            return;
        }
        let job = self.jobs[self.selected].clone();
        self.mode = ViewMode::Edit;
        self.edit_index = Some(self.selected);
        self.inputs[FIELD_DESCRIPTION].set(&job.description);
        self.inputs[FIELD_EXPRESSION].set(&job.expression);
        self.inputs[FIELD_COMMAND].set(&job.command);
        self.inputs[FIELD_LOG_ID].set(job.log_id.as_deref().unwrap_or(""));
        self.active_input = 0;
        self.error = None;
    }

    pub fn cancel_edit(&mut self) {
        self.mode = ViewMode::Table;
        self.error = None;
    }

    pub fn next_field(&mut self) {
        self.active_input = (self.active_input + 1) % FIELD_COUNT;
    }

    pub fn previous_field(&mut self) {
        self.active_input = (self.active_input + FIELD_COUNT - 1) % FIELD_COUNT;
    }

    /// Validate the form and write the schedule. Validation failures keep
    /// the form open with an actionable message; nothing is written.
    pub fn save_form(&mut self) {
        let log_id = self.inputs[FIELD_LOG_ID].value.trim();
        let job = CronJob {
            description: self.inputs[FIELD_DESCRIPTION].value.trim().to_string(),
            expression: self.inputs[FIELD_EXPRESSION].value.trim().to_string(),
            command: self.inputs[FIELD_COMMAND].value.trim().to_string(),
            log_id: if log_id.is_empty() {
                None
            } else {
                Some(log_id.to_string())
            },
            next_run: None,
            last_run: None,
        };

        if let Err(e) = job.validate() {
            self.error = Some(e.to_string());
            return;
        }

        // Entries are replaced whole; the in-memory list only changes once
        // the write succeeds, so a failed save leaves retry safe.
        let mut jobs = self.jobs.clone();
        match self.edit_index {
            Some(i) if i < jobs.len() => jobs[i] = job,
            _ => jobs.push(job),
        }

        if let Err(e) = crontab::save_jobs(self.backend.as_ref(), &jobs) {
            self.error = Some(format!("Error saving crontab: {}", e));
            return;
        }

        info!("schedule saved with {} entries", jobs.len());
        self.mode = ViewMode::Table;
        self.message = Some("Job saved successfully".to_string());
        self.error = None;
        self.load_jobs();
    }

    /// Delete the selected entry and rewrite the schedule.
    pub fn delete_selected(&mut self) {
        if self.jobs.is_empty() {
            return;
        }
        let mut jobs = self.jobs.clone();
        let removed = jobs.remove(self.selected);

        if let Err(e) = crontab::save_jobs(self.backend.as_ref(), &jobs) {
            self.error = Some(format!("Error saving crontab: {}", e));
            return;
        }

        info!("deleted schedule entry: {}", removed.command);
        self.message = Some(format!("Deleted: {}", removed.command));
        self.error = None;
        self.load_jobs();
    }

    /// Reconstruct and show history for the selected entry.
    pub fn open_history(&mut self) {
        if self.jobs.is_empty() {
            return;
        }
        let job = &self.jobs[self.selected];
        self.history_title = if job.description.is_empty() {
            job.command.clone()
        } else {
            job.description.clone()
        };
        self.history = Some(self.resolver.history_for_job(job));
        self.mode = ViewMode::History;
    }

    pub fn close_history(&mut self) {
        self.mode = ViewMode::Table;
        self.history = None;
    }

    fn reset_inputs(&mut self) {
        for input in &mut self.inputs {
            input.clear();
        }
        self.active_input = 0;
    }

    /// Command of the selected job, for the history header.
    pub fn selected_command(&self) -> &str {
        self.jobs
            .get(self.selected)
            .map(|j| j.command.as_str())
            .unwrap_or("")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crontick_common::crontab::MemoryBackend;

    fn app_with(content: &str) -> App {
        App::new(Box::new(MemoryBackend::new(content)))
    }

    #[test]
    fn loads_jobs_on_startup() {
        let app = app_with("# Daily backup\n0 2 * * * /home/user/backup.sh\n");
        assert_eq!(app.jobs.len(), 1);
        assert_eq!(app.jobs[0].description, "Daily backup");
    }

    #[test]
    fn invalid_expression_blocks_save() {
        let mut app = app_with("");
        app.start_new();
        app.inputs[FIELD_EXPRESSION].set("99 99 * * *");
        app.inputs[FIELD_COMMAND].set("/bin/true");
        app.save_form();
        assert!(app.error.is_some());
        assert_eq!(app.mode, ViewMode::Edit);
        assert!(app.jobs.is_empty());
    }

    #[test]
    fn missing_command_blocks_save() {
        let mut app = app_with("");
        app.start_new();
        app.inputs[FIELD_EXPRESSION].set("0 2 * * *");
        app.save_form();
        let err = app.error.as_deref().unwrap_or("");
        assert!(err.contains("command"), "unexpected error: {}", err);
    }

    #[test]
    fn field_navigation_wraps() {
        let mut app = app_with("");
        app.start_new();
        for _ in 0..FIELD_COUNT {
            app.next_field();
        }
        assert_eq!(app.active_input, 0);
        app.previous_field();
        assert_eq!(app.active_input, FIELD_COUNT - 1);
    }
}
