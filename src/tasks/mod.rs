//! Named, ordered tasks that orchestrate resource changes.
mod context;
pub mod mirror;
pub mod patch;
pub mod project_info;

pub use context::Context;

use anyhow::Result;

use crate::logging::TaskStatus;

/// Result of a single task execution.
///
/// # Examples
///
/// ```
/// use mesa_sync::tasks::TaskResult;
///
/// let ok = TaskResult::Ok;
/// let partial = TaskResult::Incomplete("1 copy failed".into());
/// let dry = TaskResult::DryRun;
///
/// assert!(matches!(ok, TaskResult::Ok));
/// assert!(matches!(partial, TaskResult::Incomplete(_)));
/// assert!(matches!(dry, TaskResult::DryRun));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskResult {
    /// Task completed successfully.
    Ok,
    /// Task found nothing to do (e.g. no project cache on disk).
    NotApplicable(String),
    /// Task finished but some items failed; the run continues.
    Incomplete(String),
    /// Task ran in dry-run mode.
    DryRun,
}

/// Counters for batch tasks that process many items.
///
/// # Examples
///
/// ```
/// use mesa_sync::tasks::TaskStats;
///
/// let stats = TaskStats { changed: 1, already_ok: 1 };
/// assert_eq!(stats.summary(false), "1 changed, 1 already ok");
/// assert_eq!(stats.summary(true), "1 would change, 1 already ok");
/// ```
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct TaskStats {
    /// Number of items changed or applied.
    pub changed: u32,
    /// Number of items already in the correct state.
    pub already_ok: u32,
}

impl TaskStats {
    /// Create a new empty stats counter.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Format the summary string (e.g. "2 changed, 0 already ok").
    #[must_use]
    pub fn summary(&self, dry_run: bool) -> String {
        let verb = if dry_run { "would change" } else { "changed" };
        format!("{} {verb}, {} already ok", self.changed, self.already_ok)
    }

    /// Log the summary and return the appropriate `TaskResult`.
    #[must_use]
    pub fn finish(self, ctx: &Context) -> TaskResult {
        ctx.log.info(&self.summary(ctx.dry_run));
        if ctx.dry_run {
            TaskResult::DryRun
        } else {
            TaskResult::Ok
        }
    }
}

/// A named, executable task.
pub trait Task: Send + Sync {
    /// Human-readable task name.
    fn name(&self) -> &str;

    /// Whether this task has anything to work on in this run.
    fn should_run(&self, ctx: &Context) -> bool;

    /// Execute the task.
    ///
    /// # Errors
    ///
    /// Returns an error when the task cannot finish at all, such as a missing
    /// upstream directory or an unreadable patch target.  Such errors end the
    /// run.
    fn run(&self, ctx: &Context) -> Result<TaskResult>;
}

/// The complete set of tasks run by the sync command, in execution order.
#[must_use]
pub fn all_sync_tasks() -> Vec<Box<dyn Task>> {
    vec![
        Box::new(project_info::LoadProjectInfo),
        Box::new(mirror::MirrorSources),
        Box::new(mirror::MirrorIncludes),
        Box::new(patch::PatchSpecialCases),
    ]
}

/// Execute a task, recording the result in the logger.
///
/// # Errors
///
/// Returns the task's error after recording it as failed.
pub fn execute(task: &dyn Task, ctx: &Context) -> Result<()> {
    if !task.should_run(ctx) {
        ctx.log
            .debug(&format!("skipping task: {} (not applicable)", task.name()));
        ctx.log
            .record_task(task.name(), TaskStatus::NotApplicable, None);
        return Ok(());
    }

    ctx.log.stage(task.name());

    match task.run(ctx) {
        Ok(TaskResult::Ok) => {
            ctx.log.record_task(task.name(), TaskStatus::Ok, None);
        }
        Ok(TaskResult::NotApplicable(reason)) => {
            ctx.log.info(&format!("skipped: {reason}"));
            ctx.log
                .record_task(task.name(), TaskStatus::NotApplicable, Some(&reason));
        }
        Ok(TaskResult::Incomplete(reason)) => {
            ctx.log
                .record_task(task.name(), TaskStatus::Incomplete, Some(&reason));
        }
        Ok(TaskResult::DryRun) => {
            ctx.log.record_task(task.name(), TaskStatus::DryRun, None);
        }
        Err(e) => {
            ctx.log.error(&format!("{}: {e}", task.name()));
            ctx.log
                .record_task(task.name(), TaskStatus::Failed, Some(&e.to_string()));
            return Err(e);
        }
    }
    Ok(())
}
