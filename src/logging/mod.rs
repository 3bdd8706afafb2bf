//! Console and log file output for a run.

mod line;
mod logger;
mod subscriber;

pub use logger::Logger;
pub use subscriber::init_subscriber;

/// Task execution result for summary reporting.
#[derive(Debug, Clone)]
pub struct TaskEntry {
    /// Human-readable task name.
    pub name: String,
    /// Final status of the task.
    pub status: TaskStatus,
    /// Optional detail, such as a copy failure count.
    pub message: Option<String>,
}

/// Status of a completed task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskStatus {
    /// Task completed successfully.
    Ok,
    /// Task did not apply to this run (e.g. no project cache configured).
    NotApplicable,
    /// Task completed, but some items could not be processed.
    Incomplete,
    /// Task ran in dry-run mode; no changes were applied.
    DryRun,
    /// Task hit a fatal error and the run stopped.
    Failed,
}

impl TaskStatus {
    /// Word used for the status in summary rows.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Ok => "ok",
            Self::NotApplicable => "n/a",
            Self::Incomplete => "incomplete",
            Self::DryRun => "dry run",
            Self::Failed => "failed",
        }
    }

    /// Single-character marker leading a summary row.
    #[must_use]
    pub const fn marker(self) -> &'static str {
        match self {
            Self::Ok => "✓",
            Self::NotApplicable => "-",
            Self::Incomplete => "!",
            Self::DryRun => "~",
            Self::Failed => "✗",
        }
    }
}

/// Abstraction over logging backends.
///
/// [`Logger`] forwards to `tracing`; tests substitute a recorder so they can
/// assert on exactly what a run reported.
pub trait Log: Send + Sync {
    /// Log a stage header (major section).
    fn stage(&self, msg: &str);
    /// Log an informational message.
    fn info(&self, msg: &str);
    /// Log an operator-facing notice, rendered as `INFO: <msg>`.
    fn notice(&self, msg: &str);
    /// Log a debug message (console only with `--verbose`).
    fn debug(&self, msg: &str);
    /// Log a warning message.
    fn warn(&self, msg: &str);
    /// Log an error message. Extra lines are aligned under the first.
    fn error(&self, msg: &str);
    /// Log a dry-run action message.
    fn dry_run(&self, msg: &str);
    /// Record a task result for the summary.
    fn record_task(&self, name: &str, status: TaskStatus, message: Option<&str>);
}

/// Serializes `XDG_CACHE_HOME` manipulation across parallel test threads.
#[cfg(test)]
pub(crate) static TEST_ENV_MUTEX: std::sync::Mutex<()> = std::sync::Mutex::new(());

/// Create a Logger backed by an isolated per-thread tracing subscriber
/// with a `FileLayer`, so that events emitted by logger methods reach the
/// log file during tests.
///
/// Returns a [`tracing::dispatcher::DefaultGuard`] that must be kept alive
/// for the duration of the test; dropping it restores the previous
/// thread-local dispatcher.
#[cfg(test)]
#[allow(clippy::expect_used)]
pub(crate) fn isolated_logger() -> (Logger, tempfile::TempDir, tracing::dispatcher::DefaultGuard) {
    use tracing_subscriber::{Layer as _, filter::LevelFilter, layer::SubscriberExt as _};
    let tmp = tempfile::tempdir().expect("failed to create temp dir");
    let env_lock = TEST_ENV_MUTEX
        .lock()
        .unwrap_or_else(std::sync::PoisonError::into_inner);
    // SAFETY: Protected by TEST_ENV_MUTEX; restored before lock is released.
    #[allow(unsafe_code)]
    unsafe {
        std::env::set_var("XDG_CACHE_HOME", tmp.path());
    }
    let file_layer = subscriber::FileLayer::new("test").expect("failed to create file layer");
    let log = Logger::new("test");
    // SAFETY: Protected by TEST_ENV_MUTEX.
    #[allow(unsafe_code)]
    unsafe {
        std::env::remove_var("XDG_CACHE_HOME");
    }
    drop(env_lock);
    let subscriber =
        tracing_subscriber::registry().with(file_layer.with_filter(LevelFilter::DEBUG));
    let guard = tracing::dispatcher::set_default(&tracing::Dispatch::new(subscriber));
    (log, tmp, guard)
}

/// In-memory [`Log`] that records every message with its kind.
///
/// Lets task tests assert on exactly which notices and errors a run emitted
/// without installing a tracing subscriber.
#[cfg(test)]
#[derive(Debug, Default)]
pub(crate) struct RecordingLog {
    messages: std::sync::Mutex<Vec<(&'static str, String)>>,
    tasks: std::sync::Mutex<Vec<TaskEntry>>,
}

#[cfg(test)]
impl RecordingLog {
    fn push(&self, kind: &'static str, msg: &str) {
        if let Ok(mut guard) = self.messages.lock() {
            guard.push((kind, msg.to_string()));
        }
    }

    /// All messages of `kind` (`"notice"`, `"error"`, `"dry_run"`, ...).
    pub(crate) fn of_kind(&self, kind: &str) -> Vec<String> {
        self.messages.lock().map_or_else(
            |_| vec![],
            |g| {
                g.iter()
                    .filter(|(k, _)| *k == kind)
                    .map(|(_, m)| m.clone())
                    .collect()
            },
        )
    }

    pub(crate) fn tasks(&self) -> Vec<TaskEntry> {
        self.tasks.lock().map_or_else(|_| vec![], |g| g.clone())
    }
}

#[cfg(test)]
impl Log for RecordingLog {
    fn stage(&self, msg: &str) {
        self.push("stage", msg);
    }
    fn info(&self, msg: &str) {
        self.push("info", msg);
    }
    fn notice(&self, msg: &str) {
        self.push("notice", msg);
    }
    fn debug(&self, msg: &str) {
        self.push("debug", msg);
    }
    fn warn(&self, msg: &str) {
        self.push("warn", msg);
    }
    fn error(&self, msg: &str) {
        self.push("error", msg);
    }
    fn dry_run(&self, msg: &str) {
        self.push("dry_run", msg);
    }
    fn record_task(&self, name: &str, status: TaskStatus, message: Option<&str>) {
        if let Ok(mut guard) = self.tasks.lock() {
            guard.push(TaskEntry {
                name: name.to_string(),
                status,
                message: message.map(String::from),
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_status_has_a_distinct_label() {
        let all = [
            TaskStatus::Ok,
            TaskStatus::NotApplicable,
            TaskStatus::Incomplete,
            TaskStatus::DryRun,
            TaskStatus::Failed,
        ];
        let labels: std::collections::BTreeSet<_> = all.iter().map(|s| s.label()).collect();
        assert_eq!(labels.len(), all.len());
        assert_eq!(TaskStatus::Incomplete.label(), "incomplete");
    }
}
