//! The production [`Log`]: `tracing` events plus the run summary.
use std::path::PathBuf;
use std::sync::Mutex;

use super::line::{DRY_RUN_TARGET, NOTICE_TARGET, STAGE_TARGET, SUMMARY_TARGET};
use super::subscriber::log_file_path;
use super::{Log, TaskEntry, TaskStatus};

/// Emits every message as a `tracing` event and collects task results for
/// the closing summary.
#[derive(Debug)]
pub struct Logger {
    tasks: Mutex<Vec<TaskEntry>>,
    log_file: Option<PathBuf>,
}

impl Logger {
    /// Create a logger for `command`.
    ///
    /// The log file itself is created by
    /// [`init_subscriber`](super::init_subscriber); the logger only names it
    /// in the summary.
    #[must_use]
    pub fn new(command: &str) -> Self {
        Self {
            tasks: Mutex::new(Vec::new()),
            log_file: log_file_path(command),
        }
    }

    #[cfg(test)]
    pub(crate) const fn log_path(&self) -> Option<&PathBuf> {
        self.log_file.as_ref()
    }

    /// Task results recorded so far, in execution order.
    #[must_use]
    pub fn task_entries(&self) -> Vec<TaskEntry> {
        self.tasks
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clone()
    }

    /// Print one row per recorded task, then the log file location.
    pub fn print_summary(&self) {
        let tasks = self.task_entries();
        if tasks.is_empty() {
            return;
        }

        self.stage("Summary");
        for task in &tasks {
            let detail = task
                .message
                .as_ref()
                .map_or_else(String::new, |msg| format!(" ({msg})"));
            tracing::info!(
                target: SUMMARY_TARGET,
                status = task.status.label(),
                "{} {}{detail}",
                task.status.marker(),
                task.name
            );
        }
        if let Some(path) = &self.log_file {
            tracing::info!(target: SUMMARY_TARGET, "log: {}", path.display());
        }
    }
}

impl Log for Logger {
    fn stage(&self, msg: &str) {
        tracing::info!(target: STAGE_TARGET, "{msg}");
    }

    fn info(&self, msg: &str) {
        tracing::info!("{msg}");
    }

    fn notice(&self, msg: &str) {
        tracing::info!(target: NOTICE_TARGET, "{msg}");
    }

    fn debug(&self, msg: &str) {
        tracing::debug!("{msg}");
    }

    fn warn(&self, msg: &str) {
        tracing::warn!("{msg}");
    }

    fn error(&self, msg: &str) {
        tracing::error!("{msg}");
    }

    fn dry_run(&self, msg: &str) {
        tracing::info!(target: DRY_RUN_TARGET, "{msg}");
    }

    fn record_task(&self, name: &str, status: TaskStatus, message: Option<&str>) {
        self.tasks
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .push(TaskEntry {
                name: name.to_string(),
                status,
                message: message.map(String::from),
            });
    }
}
