//! Domain-specific error types for the synchronizer.
//!
//! Internal modules return typed errors while tasks and command handlers
//! convert them to [`anyhow::Error`] via `?`.  Only [`MirrorError::Copy`] is
//! absorbed by the caller; every other variant ends the run.
//!
//! ```text
//! ConfigError  mesa-sync.toml and the project cache
//! MirrorError  directory discovery and file copies
//! PatchError   include rewrites
//! ```

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while loading `mesa-sync.toml` or the project cache.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The file exists but could not be read.
    #[error("IO error reading {}: {source}", path.display())]
    Io {
        /// Path to the file that could not be read.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// The file could not be deserialized.
    #[error("Invalid syntax in {}: {message}", path.display())]
    InvalidSyntax {
        /// Path to the offending file.
        path: PathBuf,
        /// Parser message.
        message: String,
    },

    /// A value was parsed but is not usable.
    #[error("Invalid value for '{key}': {reason}")]
    InvalidValue {
        /// Dotted key of the offending setting (e.g. `mirror.extensions`).
        key: String,
        /// Why the value was rejected.
        reason: String,
    },
}

/// Errors raised while discovering directories and mirroring files.
#[derive(Error, Debug)]
pub enum MirrorError {
    /// The local tree could not be walked.
    #[error("cannot walk local tree {}: {source}", root.display())]
    Walk {
        /// Root of the walk.
        root: PathBuf,
        /// Underlying walk error.
        source: walkdir::Error,
    },

    /// An upstream directory that mirrors a local directory is missing or
    /// cannot be listed.
    #[error("cannot list upstream directory {}: {source}", path.display())]
    DirectoryLookup {
        /// Upstream directory that was expected to exist.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// A single file could not be copied.  Non-fatal.
    #[error("{source}")]
    Copy {
        /// Upstream file.
        src: PathBuf,
        /// Local destination (normal or shadow).
        dst: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },
}

/// Errors raised by the special-case patcher.
#[derive(Error, Debug)]
pub enum PatchError {
    /// No matcher could be built for the include name.
    #[error("invalid include name '{include}': {source}")]
    Pattern {
        /// Include argument from the configuration.
        include: String,
        /// Underlying regex error.
        source: regex::Error,
    },

    /// The target file could not be opened or read.
    #[error("cannot open {}: {source}", path.display())]
    Open {
        /// File that was to be patched.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// The patched content could not be written back.
    #[error("cannot write {}: {source}", path.display())]
    Write {
        /// File that was being patched.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },
}

impl MirrorError {
    /// Whether the run may continue after this error.
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::Copy { .. })
    }
}
