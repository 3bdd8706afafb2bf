//! A single upstream file and its local destinations.
//!
//! Every mirrored file has two possible local paths: the normal destination
//! `dst`, and the shadow `dst_ni` (`dst` + `.notincluded`).  A maintainer
//! opts a file out of the build by keeping it only as a shadow; from then on
//! upstream updates land in the shadow and `dst` is never written again.
use std::ffi::OsString;
use std::path::{Path, PathBuf};

use super::{Resource, ResourceChange};
use crate::error::MirrorError;
use crate::operations::FileSystemOps;

/// Suffix marking a local file as excluded from the mirrored set.
pub const SHADOW_SUFFIX: &str = ".notincluded";

/// Append [`SHADOW_SUFFIX`] to the final component of `path`.
///
/// # Examples
///
/// ```
/// use std::path::{Path, PathBuf};
/// use mesa_sync::resources::mirrored_file::shadow_path;
///
/// assert_eq!(
///     shadow_path(Path::new("indices/u_indices.c")),
///     PathBuf::from("indices/u_indices.c.notincluded"),
/// );
/// ```
#[must_use]
pub fn shadow_path(path: &Path) -> PathBuf {
    let mut s: OsString = path.as_os_str().to_os_string();
    s.push(SHADOW_SUFFIX);
    PathBuf::from(s)
}

/// What to do with one upstream file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CopyAction {
    /// Copy to the normal destination; `new` is set when it does not exist yet.
    Include {
        /// The normal destination is absent.
        new: bool,
    },
    /// A shadow exists: refresh the shadow and leave the normal destination alone.
    Shadow,
}

impl CopyAction {
    /// Decide from whether `dst` and `dst_ni` exist.
    ///
    /// The shadow wins: when it exists the state of `dst` is irrelevant.
    #[must_use]
    pub const fn decide(exists: bool, excluded: bool) -> Self {
        if excluded {
            Self::Shadow
        } else {
            Self::Include { new: !exists }
        }
    }

    /// Whether this action creates a previously absent normal destination.
    #[must_use]
    pub const fn is_new(self) -> bool {
        matches!(self, Self::Include { new: true })
    }
}

/// An upstream file paired with its local destinations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MirroredFile {
    /// File in the upstream tree.
    pub src: PathBuf,
    /// Normal local destination.
    pub dst: PathBuf,
    /// Shadow local destination.
    pub dst_ni: PathBuf,
}

impl MirroredFile {
    /// Pair upstream file `src` with a destination of the same name in `local_dir`.
    ///
    /// Returns `None` if `src` has no file name.
    #[must_use]
    pub fn new(src: PathBuf, local_dir: &Path) -> Option<Self> {
        let dst = local_dir.join(src.file_name()?);
        let dst_ni = shadow_path(&dst);
        Some(Self { src, dst, dst_ni })
    }

    /// The path `action` writes to.
    #[must_use]
    pub fn target(&self, action: CopyAction) -> &Path {
        match action {
            CopyAction::Include { .. } => &self.dst,
            CopyAction::Shadow => &self.dst_ni,
        }
    }
}

impl Resource for MirroredFile {
    type State = CopyAction;
    type Error = MirrorError;

    fn description(&self) -> String {
        self.dst.display().to_string()
    }

    fn current_state(&self, fs: &dyn FileSystemOps) -> Result<CopyAction, MirrorError> {
        let exists = fs.exists(&self.dst);
        let excluded = fs.exists(&self.dst_ni);
        Ok(CopyAction::decide(exists, excluded))
    }

    fn apply(
        &self,
        fs: &dyn FileSystemOps,
        action: &CopyAction,
    ) -> Result<ResourceChange, MirrorError> {
        let dst = self.target(*action);
        fs.copy(&self.src, dst).map_err(|source| MirrorError::Copy {
            src: self.src.clone(),
            dst: dst.to_path_buf(),
            source,
        })?;
        Ok(ResourceChange::Applied)
    }
}
