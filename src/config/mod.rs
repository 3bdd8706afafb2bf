//! Run configuration: upstream roots, mirror filters, and special-case patches.
//!
//! Settings come from an optional `mesa-sync.toml` at the local root, with
//! command-line overrides applied on top.  A missing file yields the layout
//! the tree has always used: Mesa checked out four levels up, next to this
//! repository.
pub mod project;
pub mod toml_loader;
pub mod validation;

use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::error::ConfigError;

/// Default configuration file name, looked up in the local root.
pub const CONFIG_FILE: &str = "mesa-sync.toml";

/// Upstream root for ordinary source directories.
pub const DEFAULT_UPSTREAM_SRC: &str = "../../../../mesa/src";

/// Upstream root for `include/...` directories.
pub const DEFAULT_UPSTREAM_INCLUDE: &str = "../../../../mesa";

/// Extensions that qualify a file for mirroring.
pub const DEFAULT_EXTENSIONS: &[&str] = &["c", "cpp", "h"];

/// `[upstream]` table.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct UpstreamSection {
    /// Root holding the ordinary source directories.
    pub src: PathBuf,
    /// Root holding the `include*` directories.
    pub include: PathBuf,
}

impl Default for UpstreamSection {
    fn default() -> Self {
        Self {
            src: PathBuf::from(DEFAULT_UPSTREAM_SRC),
            include: PathBuf::from(DEFAULT_UPSTREAM_INCLUDE),
        }
    }
}

/// `[mirror]` table.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct MirrorSection {
    /// File extensions (without the dot) copied from upstream.
    pub extensions: Vec<String>,
    /// Directory names pruned from the local walk.
    pub skip_dirs: Vec<String>,
}

impl Default for MirrorSection {
    fn default() -> Self {
        Self {
            extensions: DEFAULT_EXTENSIONS.iter().map(ToString::to_string).collect(),
            skip_dirs: Vec::new(),
        }
    }
}

/// `[project]` table.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct ProjectSection {
    /// Path of the cached project record, relative to the local root.
    pub cache: Option<PathBuf>,
}

/// A single `[[patch]]` entry: rewrite `#include "<include>"` in `file`.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct PatchEntry {
    /// File to patch, relative to the local root.
    pub file: PathBuf,
    /// Include argument that gains the `.notincluded` suffix.
    pub include: String,
}

impl PatchEntry {
    /// Pair a target file with the include argument to redirect.
    #[must_use]
    pub fn new(file: impl Into<PathBuf>, include: impl Into<String>) -> Self {
        Self {
            file: file.into(),
            include: include.into(),
        }
    }
}

/// The two index-generation sources that include an excluded file.
#[must_use]
pub fn default_patches() -> Vec<PatchEntry> {
    vec![
        PatchEntry::new(
            "gallium/auxiliary/indices/u_indices_gen.c",
            "indices/u_indices.c",
        ),
        PatchEntry::new(
            "gallium/auxiliary/indices/u_unfilled_gen.c",
            "indices/u_unfilled_indices.c",
        ),
    ]
}

/// On-disk shape of `mesa-sync.toml`.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct ConfigFile {
    /// Upstream checkout roots.
    pub upstream: UpstreamSection,
    /// Which files and directories take part in mirroring.
    pub mirror: MirrorSection,
    /// Optional project record.
    pub project: ProjectSection,
    /// Special-case include rewrites; an explicit empty list disables them.
    #[serde(rename = "patch")]
    pub patches: Vec<PatchEntry>,
}

impl Default for ConfigFile {
    fn default() -> Self {
        Self {
            upstream: UpstreamSection::default(),
            mirror: MirrorSection::default(),
            project: ProjectSection::default(),
            patches: default_patches(),
        }
    }
}

/// Command-line values that take precedence over the config file.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    /// Config file to read instead of `<root>/mesa-sync.toml`.
    pub config_file: Option<PathBuf>,
    /// Replaces `upstream.src`.
    pub upstream_src: Option<PathBuf>,
    /// Replaces `upstream.include`.
    pub upstream_include: Option<PathBuf>,
}

/// Fully resolved configuration for one run.
///
/// All paths are absolute or relative to the process working directory;
/// relative entries from the file are joined onto [`Config::root`].
#[derive(Debug, Clone)]
pub struct Config {
    /// Local tree receiving the mirrored files.
    pub root: PathBuf,
    /// Upstream root paired with ordinary directories.
    pub upstream_src: PathBuf,
    /// Upstream root paired with include directories.
    pub upstream_include: PathBuf,
    /// Mirrored file extensions, without the dot.
    pub extensions: Vec<String>,
    /// Directory names pruned from the local walk.
    pub skip_dirs: Vec<String>,
    /// Resolved path of the cached project record, if configured.
    pub project_cache: Option<PathBuf>,
    /// Include rewrites applied after mirroring.
    pub patches: Vec<PatchEntry>,
}

impl Config {
    /// Load `mesa-sync.toml` (or the override path) and resolve it against `root`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, does not parse, or holds
    /// values rejected by [`validation::check`].
    pub fn load(root: &Path, overrides: &Overrides) -> Result<Self, ConfigError> {
        let path = overrides
            .config_file
            .clone()
            .unwrap_or_else(|| root.join(CONFIG_FILE));
        if overrides.config_file.is_some() && !path.exists() {
            return Err(ConfigError::Io {
                path,
                source: std::io::Error::from(std::io::ErrorKind::NotFound),
            });
        }
        let file: ConfigFile = toml_loader::load_config(&path)?;
        Self::resolve(root, file, overrides)
    }

    /// Combine a parsed file with overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if the merged values fail validation.
    pub fn resolve(
        root: &Path,
        file: ConfigFile,
        overrides: &Overrides,
    ) -> Result<Self, ConfigError> {
        validation::check(&file)?;

        let upstream_src = overrides
            .upstream_src
            .clone()
            .unwrap_or_else(|| root.join(&file.upstream.src));
        let upstream_include = overrides
            .upstream_include
            .clone()
            .unwrap_or_else(|| root.join(&file.upstream.include));

        Ok(Self {
            root: root.to_path_buf(),
            upstream_src,
            upstream_include,
            extensions: file.mirror.extensions,
            skip_dirs: file.mirror.skip_dirs,
            project_cache: file.project.cache.map(|p| root.join(p)),
            patches: file.patches,
        })
    }

    /// Whether `path` has one of the mirrored extensions (exact, case-sensitive).
    #[must_use]
    pub fn is_mirrored(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .is_some_and(|ext| self.extensions.iter().any(|e| e == ext))
    }
}
