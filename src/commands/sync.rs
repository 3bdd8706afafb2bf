//! Command: mirror every classified directory and apply the special-case patches.
use std::sync::Arc;

use anyhow::Result;

use super::{CommandSetup, run_tasks_to_completion};
use crate::cli::GlobalOpts;
use crate::logging::{Log, Logger};
use crate::tasks::{self, Task};

/// Run the sync command.
///
/// # Errors
///
/// Returns an error if setup fails or a task hits a fatal error.  Individual
/// copy failures are reported in the summary and do not make the run fail.
pub fn run(global: &GlobalOpts, log: &Arc<Logger>) -> Result<()> {
    log.info(&format!("mesa-sync {}", super::version::version()));
    if global.dry_run {
        log.info("dry run: nothing will be written");
    }

    let setup = CommandSetup::init(global, log)?;
    let ctx = setup.into_context(log.clone(), global.dry_run);

    let all_tasks = tasks::all_sync_tasks();
    let tasks_to_run: Vec<&dyn Task> = all_tasks.iter().map(AsRef::as_ref).collect();
    run_tasks_to_completion(tasks_to_run, &ctx, log)
}
