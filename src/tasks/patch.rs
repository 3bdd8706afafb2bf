//! Redirect generated includes to their excluded shadows after mirroring.
use anyhow::Result;

use super::{Context, Task, TaskResult, TaskStats};
use crate::resources::Resource;
use crate::resources::include_patch::IncludePatch;

/// Redirect known includes to their `.notincluded` shadows.
///
/// Some generated upstream files `#include` a sibling that the local tree
/// keeps only as a shadow; without the rewrite they would not compile.
#[derive(Debug)]
pub struct PatchSpecialCases;

impl Task for PatchSpecialCases {
    fn name(&self) -> &'static str {
        "Patch special cases"
    }

    fn should_run(&self, ctx: &Context) -> bool {
        !ctx.config.patches.is_empty()
    }

    fn run(&self, ctx: &Context) -> Result<TaskResult> {
        let fs = ctx.fs_ops.as_ref();
        let mut stats = TaskStats::new();

        for entry in &ctx.config.patches {
            let target = ctx.root().join(&entry.file);
            let mut patch = IncludePatch::new(target.clone(), &entry.include)?;
            if let Some(source) = ctx.pending_source(&target) {
                patch = patch.reading_from(source);
            }
            let plan = patch.current_state(fs)?;

            if plan.lines == 0 {
                ctx.log
                    .debug(&format!("ok: {} (already patched)", patch.description()));
                stats.already_ok += 1;
                continue;
            }

            if ctx.dry_run {
                ctx.log.dry_run(&format!(
                    "would redirect {} line(s) in {}",
                    plan.lines,
                    patch.description()
                ));
                stats.changed += 1;
                continue;
            }

            patch.apply(fs, &plan)?;
            ctx.log.debug(&format!(
                "patched {} line(s) in {}",
                plan.lines,
                patch.description()
            ));
            stats.changed += 1;
        }

        Ok(stats.finish(ctx))
    }
}
