//! Upstream subset synchronizer for a vendored Mesa tree.
//!
//! A local tree holds a subset of Mesa's sources.  Every directory in it is
//! paired with the same relative directory in an upstream checkout, and the
//! upstream `.c`, `.cpp`, and `.h` files are copied over.  A local file can be
//! opted out of the build by keeping only a `<name>.notincluded` shadow:
//! upstream updates then land in the shadow and the normal name is never
//! recreated.  A few generated files that include opted-out siblings are
//! patched to include the shadow instead.
//!
//! The public API is organised into four layers:
//!
//! - **[`config`]**: load and validate `mesa-sync.toml`
//! - **[`resources`]**: idempotent `check + apply` primitives (mirrored files, include patches)
//! - **[`tasks`]**: named, ordered units of work wired to resources
//! - **[`commands`]**: top-level subcommand orchestration (`sync`, `status`, `version`)
#![deny(clippy::or_fun_call)]
#![deny(clippy::bool_to_int_with_if)]

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod logging;
pub mod operations;
pub mod resources;
pub mod tasks;
pub mod tree;
