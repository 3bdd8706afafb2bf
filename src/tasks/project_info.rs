//! Informational task that reports the cached project record.
use anyhow::Result;

use super::{Context, Task, TaskResult};
use crate::config::project;

/// Load the cached project record and report what it declares.
///
/// Purely informational: a malformed cache is reported as a warning and
/// nothing downstream reads the record.
#[derive(Debug)]
pub struct LoadProjectInfo;

impl Task for LoadProjectInfo {
    fn name(&self) -> &'static str {
        "Load project info"
    }

    fn should_run(&self, ctx: &Context) -> bool {
        ctx.config.project_cache.is_some()
    }

    fn run(&self, ctx: &Context) -> Result<TaskResult> {
        let Some(path) = ctx.config.project_cache.as_deref() else {
            return Ok(TaskResult::NotApplicable(
                "no project cache configured".to_string(),
            ));
        };

        match project::load_cached(ctx.fs_ops.as_ref(), path) {
            Ok(Some(info)) => {
                ctx.log.info(&format!(
                    "{}: {} source file(s) in {} director{}",
                    info.name.as_deref().unwrap_or("project"),
                    info.srcs.len(),
                    info.source_dirs(),
                    if info.source_dirs() == 1 { "y" } else { "ies" }
                ));
                Ok(TaskResult::Ok)
            }
            Ok(None) => Ok(TaskResult::NotApplicable(format!(
                "no project cache at {}",
                path.display()
            ))),
            Err(e) => {
                ctx.log.warn(&e.to_string());
                Ok(TaskResult::Incomplete("project cache unreadable".to_string()))
            }
        }
    }
}
