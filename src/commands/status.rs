//! Command: report upstream files that a sync would create or route to a
//! shadow, without writing anything.
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;

use super::CommandSetup;
use crate::cli::GlobalOpts;
use crate::error::MirrorError;
use crate::logging::{Log, Logger};
use crate::resources::Resource;
use crate::resources::mirrored_file::CopyAction;
use crate::tasks::Context;
use crate::tasks::mirror::for_each_upstream_file;

/// Presence of every qualifying upstream file in the local tree.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct PresenceReport {
    /// Normal destinations that do not exist yet.
    pub new: Vec<PathBuf>,
    /// Normal destinations opted out through a `.notincluded` shadow.
    pub excluded: Vec<PathBuf>,
    /// Files already present under their normal name.
    pub tracked: usize,
}

impl PresenceReport {
    /// One-line count of each category.
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "{} new, {} excluded, {} tracked",
            self.new.len(),
            self.excluded.len(),
            self.tracked
        )
    }
}

/// Classify every upstream file for both directory sets.
///
/// # Errors
///
/// Returns [`MirrorError::DirectoryLookup`] when an upstream directory is
/// missing.
pub fn survey(ctx: &Context) -> Result<PresenceReport, MirrorError> {
    let mut report = PresenceReport::default();
    let fs = ctx.fs_ops.as_ref();
    let pairs = [
        (&ctx.dirs.dirs, &ctx.config.upstream_src),
        (&ctx.dirs.includes, &ctx.config.upstream_include),
    ];

    for (dirs, upstream_root) in pairs {
        for_each_upstream_file(dirs, upstream_root, ctx, |file| {
            match file.current_state(fs)? {
                CopyAction::Include { new: true } => report.new.push(file.dst),
                CopyAction::Include { new: false } => report.tracked += 1,
                CopyAction::Shadow => report.excluded.push(file.dst),
            }
            Ok(())
        })?;
    }
    Ok(report)
}

/// Run the status command.
///
/// # Errors
///
/// Returns an error if setup fails or an upstream directory is missing.
pub fn run(global: &GlobalOpts, log: &Arc<Logger>) -> Result<()> {
    let setup = CommandSetup::init(global, log)?;
    let ctx = setup.into_context(log.clone(), true);

    log.stage("Upstream status");
    let report = survey(&ctx)?;
    for path in &report.new {
        log.info(&format!("new       {}", path.display()));
    }
    for path in &report.excluded {
        log.info(&format!("excluded  {}", path.display()));
    }
    log.info(&report.summary());
    Ok(())
}
