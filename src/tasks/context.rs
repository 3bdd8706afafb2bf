//! Shared state handed to every task of a run.
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use crate::config::Config;
use crate::logging::Log;
use crate::operations::{FileSystemOps, SystemFileSystemOps};
use crate::tree::DirectorySet;

/// Shared context for task execution.
pub struct Context {
    /// Resolved configuration for this run.
    pub config: Arc<Config>,
    /// Local directories to mirror, classified once per run.
    pub dirs: Arc<DirectorySet>,
    /// Logger for output and task recording.
    pub log: Arc<dyn Log>,
    /// Whether to perform a dry run (preview changes without applying).
    pub dry_run: bool,
    /// Filesystem operation abstraction (injectable for testing).
    pub fs_ops: Arc<dyn FileSystemOps>,
    /// Copies a dry run skipped, keyed by destination.
    ///
    /// Later tasks read the upstream source through
    /// [`Context::pending_source`] so their preview sees the file the
    /// mirror pass would have written.
    pending_copies: Mutex<BTreeMap<PathBuf, PathBuf>>,
}

impl std::fmt::Debug for Context {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Context")
            .field("config", &self.config)
            .field("dirs", &self.dirs)
            .field("log", &"<dyn Log>")
            .field("dry_run", &self.dry_run)
            .field("fs_ops", &self.fs_ops)
            .field("pending_copies", &self.pending_copies)
            .finish()
    }
}

impl Context {
    /// Creates a new context backed by the real filesystem.
    #[must_use]
    pub fn new(config: Config, dirs: DirectorySet, log: Arc<dyn Log>, dry_run: bool) -> Self {
        Self {
            config: Arc::new(config),
            dirs: Arc::new(dirs),
            log,
            dry_run,
            fs_ops: Arc::new(SystemFileSystemOps),
            pending_copies: Mutex::new(BTreeMap::new()),
        }
    }

    /// Replace the filesystem implementation.
    #[must_use]
    pub fn with_fs_ops(mut self, fs_ops: Arc<dyn FileSystemOps>) -> Self {
        self.fs_ops = fs_ops;
        self
    }

    /// Root of the local tree.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.config.root
    }

    /// Local counterpart of the relative directory `relative`.
    #[must_use]
    pub fn local_dir(&self, relative: &Path) -> PathBuf {
        self.config.root.join(relative)
    }

    /// Remember that a dry run would have copied `src` over `dst`.
    pub fn defer_copy(&self, src: &Path, dst: &Path) {
        self.pending_copies
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .insert(dst.to_path_buf(), src.to_path_buf());
    }

    /// Upstream file a dry run would have copied to `dst`, if any.
    #[must_use]
    pub fn pending_source(&self, dst: &Path) -> Option<PathBuf> {
        self.pending_copies
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .get(dst)
            .cloned()
    }
}
