//! Copy qualifying upstream files into the local tree.
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use anyhow::Result;

use super::{Context, Task, TaskResult};
use crate::error::MirrorError;
use crate::resources::Resource;
use crate::resources::mirrored_file::{CopyAction, MirroredFile};

/// Copy counters for one mirror pass.
///
/// # Examples
///
/// ```
/// use mesa_sync::resources::mirrored_file::CopyAction;
/// use mesa_sync::tasks::mirror::MirrorStats;
///
/// let mut stats = MirrorStats::default();
/// stats.record(CopyAction::Include { new: true });
/// stats.record(CopyAction::Shadow);
/// assert_eq!(stats.summary(false), "2 copied (1 new, 1 excluded), 0 failed");
/// ```
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct MirrorStats {
    /// Files copied (or that would be copied in a dry run).
    pub copied: u32,
    /// Copies that created a previously absent normal destination.
    pub new: u32,
    /// Copies that refreshed a `.notincluded` shadow.
    pub excluded: u32,
    /// Copies that failed.
    pub failed: u32,
}

impl MirrorStats {
    /// Count one successful (or previewed) copy.
    pub const fn record(&mut self, action: CopyAction) {
        self.copied += 1;
        match action {
            CopyAction::Include { new: true } => self.new += 1,
            CopyAction::Include { new: false } => {}
            CopyAction::Shadow => self.excluded += 1,
        }
    }

    /// Counts line logged at the end of a pass.
    #[must_use]
    pub fn summary(&self, dry_run: bool) -> String {
        let verb = if dry_run { "would copy" } else { "copied" };
        format!(
            "{} {verb} ({} new, {} excluded), {} failed",
            self.copied, self.new, self.excluded, self.failed
        )
    }

    /// Log the summary and return the task result.
    ///
    /// Copy failures make the result [`TaskResult::Incomplete`]; they never
    /// fail the task.
    #[must_use]
    pub fn finish(self, ctx: &Context) -> TaskResult {
        ctx.log.info(&self.summary(ctx.dry_run));
        if self.failed > 0 {
            TaskResult::Incomplete(format!("{} copy failure(s)", self.failed))
        } else if ctx.dry_run {
            TaskResult::DryRun
        } else {
            TaskResult::Ok
        }
    }
}

/// Mirror ordinary directories from the upstream source root.
#[derive(Debug)]
pub struct MirrorSources;

impl Task for MirrorSources {
    fn name(&self) -> &'static str {
        "Mirror sources"
    }

    fn should_run(&self, ctx: &Context) -> bool {
        !ctx.dirs.dirs.is_empty()
    }

    fn run(&self, ctx: &Context) -> Result<TaskResult> {
        let stats = mirror_directories(&ctx.dirs.dirs, &ctx.config.upstream_src, ctx)?;
        Ok(stats.finish(ctx))
    }
}

/// Mirror `include` directories from the upstream include root.
#[derive(Debug)]
pub struct MirrorIncludes;

impl Task for MirrorIncludes {
    fn name(&self) -> &'static str {
        "Mirror includes"
    }

    fn should_run(&self, ctx: &Context) -> bool {
        !ctx.dirs.includes.is_empty()
    }

    fn run(&self, ctx: &Context) -> Result<TaskResult> {
        let stats = mirror_directories(&ctx.dirs.includes, &ctx.config.upstream_include, ctx)?;
        Ok(stats.finish(ctx))
    }
}

/// Call `visit` for every qualifying upstream file paired with `dirs`.
///
/// Directories are visited in set order and files in name order.
/// Subdirectories and files whose extension is not mirrored are passed over
/// silently.
///
/// # Errors
///
/// Returns [`MirrorError::DirectoryLookup`] when an upstream directory cannot
/// be listed, and whatever `visit` returns.
pub fn for_each_upstream_file<F>(
    dirs: &BTreeSet<PathBuf>,
    upstream_root: &Path,
    ctx: &Context,
    mut visit: F,
) -> Result<(), MirrorError>
where
    F: FnMut(MirroredFile) -> Result<(), MirrorError>,
{
    for relative in dirs {
        let upstream_dir = upstream_root.join(relative);
        let mut entries =
            ctx.fs_ops
                .read_dir(&upstream_dir)
                .map_err(|source| MirrorError::DirectoryLookup {
                    path: upstream_dir.clone(),
                    source,
                })?;
        entries.sort();
        ctx.log.debug(&format!(
            "{}: {} upstream entries",
            relative.display(),
            entries.len()
        ));

        let local_dir = ctx.local_dir(relative);
        for src in entries {
            if ctx.fs_ops.is_dir(&src) || !ctx.config.is_mirrored(&src) {
                continue;
            }
            if let Some(file) = MirroredFile::new(src, &local_dir) {
                visit(file)?;
            }
        }
    }
    Ok(())
}

/// Copy every qualifying file of `dirs` from `upstream_root`.
///
/// # Errors
///
/// Returns an error only for fatal conditions; individual copy failures are
/// logged and counted in [`MirrorStats::failed`].
pub fn mirror_directories(
    dirs: &BTreeSet<PathBuf>,
    upstream_root: &Path,
    ctx: &Context,
) -> Result<MirrorStats, MirrorError> {
    let mut stats = MirrorStats::default();
    for_each_upstream_file(dirs, upstream_root, ctx, |file| {
        mirror_file(&file, ctx, &mut stats)
    })?;
    Ok(stats)
}

fn mirror_file(
    file: &MirroredFile,
    ctx: &Context,
    stats: &mut MirrorStats,
) -> Result<(), MirrorError> {
    let fs = ctx.fs_ops.as_ref();
    let action = file.current_state(fs)?;
    let target = file.target(action);

    if action.is_new() {
        ctx.log.notice(&format!("new file {}", file.dst.display()));
    }

    if ctx.dry_run {
        ctx.log.dry_run(&format!(
            "would copy {} -> {}",
            file.src.display(),
            target.display()
        ));
        ctx.defer_copy(&file.src, target);
        stats.record(action);
        return Ok(());
    }

    match file.apply(fs, &action) {
        Ok(_) => {
            ctx.log.debug(&format!("copied {}", target.display()));
            stats.record(action);
            Ok(())
        }
        Err(e) if e.is_recoverable() => {
            ctx.log.error(&copy_failure_message(&e, file, action));
            stats.failed += 1;
            Ok(())
        }
        Err(e) => Err(e),
    }
}

fn copy_failure_message(err: &MirrorError, file: &MirroredFile, action: CopyAction) -> String {
    let label = match action {
        CopyAction::Include { .. } => "dst",
        CopyAction::Shadow => "dst_ni",
    };
    format!(
        "{err}\nsrc: {}\n{label}: {}",
        file.src.display(),
        file.target(action).display()
    )
}
