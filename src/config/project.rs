//! Cached project description.
//!
//! The build tooling of the local tree leaves a JSON record of the project's
//! declared source files.  A sync run loads it for reporting only; nothing in
//! the mirror or patch steps depends on its contents.
use serde::Deserialize;
use std::path::Path;

use crate::error::ConfigError;
use crate::operations::FileSystemOps;

/// Cached description of the local project.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct ProjectInfo {
    /// Name of the project, when recorded.
    #[serde(default)]
    pub name: Option<String>,
    /// Source files declared by the project, relative to its root.
    #[serde(default)]
    pub srcs: Vec<String>,
}

impl ProjectInfo {
    /// Number of distinct directories the declared sources live in.
    #[must_use]
    pub fn source_dirs(&self) -> usize {
        let dirs: std::collections::BTreeSet<_> = self
            .srcs
            .iter()
            .map(|s| Path::new(s).parent().unwrap_or_else(|| Path::new("")))
            .collect();
        dirs.len()
    }
}

/// Load the cached project record at `path` through `fs`.
///
/// Returns `Ok(None)` when no cache file is present.
///
/// # Errors
///
/// Returns an error if the file exists but cannot be read or is not a valid
/// project record.
pub fn load_cached(
    fs: &dyn FileSystemOps,
    path: &Path,
) -> Result<Option<ProjectInfo>, ConfigError> {
    if !fs.exists(path) {
        return Ok(None);
    }
    let content = fs.read(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_slice(&content)
        .map(Some)
        .map_err(|e| ConfigError::InvalidSyntax {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::operations::{MockFileSystemOps, SystemFileSystemOps};

    fn load(fs: &MockFileSystemOps) -> Result<Option<ProjectInfo>, ConfigError> {
        load_cached(fs, Path::new("/tree/.cache/project.json"))
    }

    #[test]
    fn absent_cache_is_none() {
        assert!(load(&MockFileSystemOps::new()).unwrap().is_none());
    }

    #[test]
    fn loads_declared_sources() {
        let fs = MockFileSystemOps::new().with_file(
            "/tree/.cache/project.json",
            r#"{"name": "MesaGL", "srcs": ["main/api.c", "main/enable.c", "glsl/ast.cpp"]}"#,
        );
        let info = load(&fs).unwrap().unwrap();
        assert_eq!(info.name.as_deref(), Some("MesaGL"));
        assert_eq!(info.srcs.len(), 3);
        assert_eq!(info.source_dirs(), 2);
    }

    #[test]
    fn unknown_fields_are_ignored() {
        let fs = MockFileSystemOps::new().with_file(
            "/tree/.cache/project.json",
            r#"{"srcs": [], "defines": ["X=1"]}"#,
        );
        assert_eq!(load(&fs).unwrap(), Some(ProjectInfo::default()));
    }

    #[test]
    fn malformed_cache_is_error() {
        let fs = MockFileSystemOps::new().with_file("/tree/.cache/project.json", "{not json");
        assert!(matches!(load(&fs), Err(ConfigError::InvalidSyntax { .. })));
    }

    #[test]
    fn reads_from_disk_with_system_ops() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("project.json");
        std::fs::write(&path, r#"{"srcs": ["util/u_math.c"]}"#).unwrap();
        let info = load_cached(&SystemFileSystemOps, &path).unwrap().unwrap();
        assert_eq!(info.srcs, ["util/u_math.c"]);
    }
}
