//! Local tree discovery: classify every directory under the root as an
//! ordinary source directory or an include directory.
use std::collections::BTreeSet;
use std::path::{Component, Path, PathBuf};

use walkdir::WalkDir;

use crate::error::MirrorError;

/// Prefix of the top-level directories that mirror upstream's include root.
pub const INCLUDE_PREFIX: &str = "include";

/// How a local directory is paired with an upstream root.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirectoryKind {
    /// Mirrored from the upstream source root.
    Ordinary,
    /// Mirrored from the upstream include root.
    Include,
}

/// Classify a directory path relative to the local root.
///
/// A directory is an include directory when its first component starts with
/// `include`.  This covers `include` itself, siblings such as `includes`,
/// and everything below them.  An `include` nested deeper (`src/include`)
/// is ordinary.
///
/// # Examples
///
/// ```
/// use std::path::Path;
/// use mesa_sync::tree::{DirectoryKind, kind_of};
///
/// assert_eq!(kind_of(Path::new("include/GL")), DirectoryKind::Include);
/// assert_eq!(kind_of(Path::new("includes")), DirectoryKind::Include);
/// assert_eq!(kind_of(Path::new("inc")), DirectoryKind::Ordinary);
/// assert_eq!(kind_of(Path::new("main/include")), DirectoryKind::Ordinary);
/// ```
#[must_use]
pub fn kind_of(relative: &Path) -> DirectoryKind {
    let first = relative
        .components()
        .find(|c| !matches!(c, Component::CurDir));
    match first {
        Some(Component::Normal(name))
            if name.as_encoded_bytes().starts_with(INCLUDE_PREFIX.as_bytes()) =>
        {
            DirectoryKind::Include
        }
        _ => DirectoryKind::Ordinary,
    }
}

/// The two disjoint sets of relative directory paths found in the local tree.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DirectorySet {
    /// Directories mirrored from the upstream source root.
    pub dirs: BTreeSet<PathBuf>,
    /// Directories mirrored from the upstream include root.
    pub includes: BTreeSet<PathBuf>,
}

impl DirectorySet {
    /// Add `relative` to the set selected by [`kind_of`].
    pub fn insert(&mut self, relative: PathBuf) {
        match kind_of(&relative) {
            DirectoryKind::Include => self.includes.insert(relative),
            DirectoryKind::Ordinary => self.dirs.insert(relative),
        };
    }

    /// Total number of classified directories.
    #[must_use]
    pub fn len(&self) -> usize {
        self.dirs.len() + self.includes.len()
    }

    /// Whether the walk found no directories at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.dirs.is_empty() && self.includes.is_empty()
    }
}

/// Walk `root` and classify every directory below it.
///
/// The root itself is not classified.  Directories whose name is listed in
/// `skip_dirs` are pruned together with everything beneath them.  Symlinked
/// directories are not followed.
///
/// # Errors
///
/// Returns [`MirrorError::Walk`] if any part of the tree cannot be read.
pub fn classify(root: &Path, skip_dirs: &[String]) -> Result<DirectorySet, MirrorError> {
    let mut set = DirectorySet::default();

    let walker = WalkDir::new(root)
        .min_depth(1)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| {
            !(entry.file_type().is_dir()
                && entry
                    .file_name()
                    .to_str()
                    .is_some_and(|name| skip_dirs.iter().any(|s| s == name)))
        });

    for entry in walker {
        let entry = entry.map_err(|source| MirrorError::Walk {
            root: root.to_path_buf(),
            source,
        })?;
        if !entry.file_type().is_dir() {
            continue;
        }
        if let Ok(relative) = entry.path().strip_prefix(root) {
            set.insert(relative.to_path_buf());
        }
    }

    Ok(set)
}
