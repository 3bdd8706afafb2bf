//! Top-level subcommands and the setup they share.
pub mod status;
pub mod sync;
pub mod version;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;

use crate::cli::GlobalOpts;
use crate::config::{Config, validation};
use crate::logging::{Log, Logger};
use crate::tasks::{self, Context, Task};
use crate::tree::{self, DirectorySet};

/// Shared state produced by the common command setup sequence.
///
/// Encapsulates root resolution, configuration loading, and directory
/// classification so that each command does not have to repeat the
/// boilerplate.
#[derive(Debug)]
pub struct CommandSetup {
    /// Resolved run configuration.
    pub config: Config,
    /// Local directories classified for mirroring.
    pub dirs: DirectorySet,
}

impl CommandSetup {
    /// Resolve the root, load the configuration, and classify the local tree.
    ///
    /// # Errors
    ///
    /// Returns an error if the root is not a directory, the configuration
    /// fails to load, or the local tree cannot be walked.
    pub fn init(global: &GlobalOpts, log: &Logger) -> Result<Self> {
        let root = resolve_root(global)?;

        log.stage("Loading configuration");
        let config = Config::load(&root, &global.overrides())?;
        log.debug(&format!("upstream src: {}", config.upstream_src.display()));
        log.debug(&format!(
            "upstream include: {}",
            config.upstream_include.display()
        ));
        log.debug(&format!("extensions: {}", config.extensions.join(", ")));
        log.debug(&format!("{} patch(es)", config.patches.len()));

        let warnings = validation::warnings(&config);
        if !warnings.is_empty() {
            log.warn(&format!(
                "found {} configuration warning(s):",
                warnings.len()
            ));
            for warning in &warnings {
                log.warn(&format!("  [{}]: {}", warning.item, warning.message));
            }
        }

        log.stage("Classifying directories");
        let dirs = tree::classify(&config.root, &config.skip_dirs)?;
        log.info(&format!(
            "{} ordinary, {} include",
            dirs.dirs.len(),
            dirs.includes.len()
        ));

        Ok(Self { config, dirs })
    }

    /// Build the task context for this run.
    #[must_use]
    pub fn into_context(self, log: Arc<dyn Log>, dry_run: bool) -> Context {
        Context::new(self.config, self.dirs, log, dry_run)
    }
}

/// Execute every task in order and print the summary.
///
/// A task that fails ends the run; later tasks are not started.
///
/// # Errors
///
/// Returns the error of the first task that failed.
pub fn run_tasks_to_completion<'a>(
    tasks: impl IntoIterator<Item = &'a dyn Task>,
    ctx: &Context,
    log: &Logger,
) -> Result<()> {
    for task in tasks {
        if let Err(e) = tasks::execute(task, ctx) {
            log.print_summary();
            return Err(e);
        }
    }

    log.print_summary();
    Ok(())
}

/// Resolve the local tree root from CLI arguments, defaulting to the current
/// directory.
///
/// # Errors
///
/// Returns an error if the root is not an existing directory.
pub fn resolve_root(global: &GlobalOpts) -> Result<PathBuf> {
    let root = global.root();
    if !root.is_dir() {
        anyhow::bail!("local root {} is not a directory", root.display());
    }
    Ok(root)
}
