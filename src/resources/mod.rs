//! Idempotent resource primitives (check + apply pattern).
//!
//! A sync run touches two kinds of resources: files mirrored from upstream
//! ([`mirrored_file::MirroredFile`]) and local files whose include directive
//! is rewritten ([`include_patch::IncludePatch`]).  Tasks inspect a resource
//! with [`Resource::current_state`], report what they are about to do, then
//! call [`Resource::apply`] with the state they inspected.
pub mod include_patch;
pub mod mirrored_file;

use crate::operations::FileSystemOps;

/// Unified interface for resources that can be checked and applied.
pub trait Resource {
    /// What [`current_state`](Self::current_state) observes and
    /// [`apply`](Self::apply) acts on.
    type State;
    /// Error returned when the resource cannot be inspected or changed.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Human-readable description of this resource.
    fn description(&self) -> String;

    /// Inspect the filesystem.
    ///
    /// # Errors
    ///
    /// Returns an error if the resource cannot be inspected at all.
    fn current_state(&self, fs: &dyn FileSystemOps) -> Result<Self::State, Self::Error>;

    /// Bring the resource up to date given a previously observed state.
    ///
    /// # Errors
    ///
    /// Returns an error if the change cannot be written.
    fn apply(
        &self,
        fs: &dyn FileSystemOps,
        state: &Self::State,
    ) -> Result<ResourceChange, Self::Error>;
}

/// Result of applying a resource change.
///
/// # Examples
///
/// ```
/// use mesa_sync::resources::ResourceChange;
///
/// let applied = ResourceChange::Applied;
/// let noop = ResourceChange::AlreadyCorrect;
///
/// assert_eq!(applied, ResourceChange::Applied);
/// assert_ne!(applied, noop);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResourceChange {
    /// Resource was created or updated.
    Applied,
    /// Resource was already correct (no change needed).
    AlreadyCorrect,
}
