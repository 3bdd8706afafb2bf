//! Command-line interface definitions.
use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config::Overrides;

/// Top-level CLI entry point for the upstream subset synchronizer.
#[derive(Parser, Debug)]
#[command(
    name = "mesa-sync",
    about = "Refresh a local Mesa subset from an upstream checkout",
    version
)]
pub struct Cli {
    /// Subcommand to run (defaults to `sync`)
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Options shared by every subcommand.
    #[command(flatten)]
    pub global: GlobalOpts,
}

/// Options shared across all subcommands.
#[derive(Parser, Debug, Clone, Default)]
pub struct GlobalOpts {
    /// Preview changes without applying
    #[arg(short = 'd', long, global = true)]
    pub dry_run: bool,

    /// Local tree to synchronize (defaults to the current directory)
    #[arg(long, global = true)]
    pub root: Option<PathBuf>,

    /// Configuration file (defaults to <root>/mesa-sync.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Upstream root for ordinary directories
    #[arg(long, global = true)]
    pub upstream_src: Option<PathBuf>,

    /// Upstream root for include directories
    #[arg(long, global = true)]
    pub upstream_include: Option<PathBuf>,
}

impl GlobalOpts {
    /// The subset of options that override configuration file values.
    #[must_use]
    pub fn overrides(&self) -> Overrides {
        Overrides {
            config_file: self.config.clone(),
            upstream_src: self.upstream_src.clone(),
            upstream_include: self.upstream_include.clone(),
        }
    }

    /// Root of the local tree.
    #[must_use]
    pub fn root(&self) -> PathBuf {
        self.root.clone().unwrap_or_else(|| PathBuf::from("."))
    }
}

/// Available subcommands.
#[derive(Subcommand, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Command {
    /// Mirror upstream files and apply the special-case patches
    #[default]
    Sync,
    /// Report which upstream files are new or excluded without copying
    Status,
    /// Print version information
    Version,
}

impl Command {
    /// Name used for the command's log file.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Sync => "sync",
            Self::Status => "status",
            Self::Version => "version",
        }
    }
}
