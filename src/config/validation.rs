//! Configuration checks.
//!
//! [`check`] rejects values a run cannot work with; [`warnings`] reports
//! problems with the environment that will only bite later in the run.
use std::path::Path;

use super::{Config, ConfigFile};
use crate::error::ConfigError;

/// A non-fatal problem found in a resolved configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationWarning {
    /// The setting that triggered the warning (e.g. `upstream.src`).
    pub item: String,
    /// Human-readable warning message.
    pub message: String,
}

impl ValidationWarning {
    /// Create a warning for `item`.
    #[must_use]
    pub fn new(item: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            item: item.into(),
            message: message.into(),
        }
    }
}

fn invalid(key: &str, reason: impl Into<String>) -> ConfigError {
    ConfigError::InvalidValue {
        key: key.to_string(),
        reason: reason.into(),
    }
}

/// Reject configuration values that cannot drive a run.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidValue`] for the first offending setting.
pub fn check(file: &ConfigFile) -> Result<(), ConfigError> {
    if file.mirror.extensions.is_empty() {
        return Err(invalid("mirror.extensions", "must not be empty"));
    }
    for ext in &file.mirror.extensions {
        if ext.is_empty() {
            return Err(invalid("mirror.extensions", "entries must not be empty"));
        }
        if ext.starts_with('.') {
            return Err(invalid(
                "mirror.extensions",
                format!("'{ext}' must be given without the leading dot"),
            ));
        }
    }
    for dir in &file.mirror.skip_dirs {
        if dir.is_empty() || dir.contains(['/', '\\']) {
            return Err(invalid(
                "mirror.skip_dirs",
                format!("'{dir}' must be a single directory name"),
            ));
        }
    }
    for patch in &file.patches {
        if patch.file.as_os_str().is_empty() {
            return Err(invalid("patch.file", "must not be empty"));
        }
        if patch.include.is_empty() {
            return Err(invalid(
                "patch.include",
                format!("empty include name for {}", patch.file.display()),
            ));
        }
        if patch.include.contains('"') || patch.include.contains('\n') {
            return Err(invalid(
                "patch.include",
                format!("'{}' cannot appear inside a quoted include", patch.include),
            ));
        }
    }
    Ok(())
}

/// Report environment problems that will make the run fail part-way.
#[must_use]
pub fn warnings(config: &Config) -> Vec<ValidationWarning> {
    let mut out = Vec::new();
    check_dir(&mut out, "upstream.src", &config.upstream_src);
    check_dir(&mut out, "upstream.include", &config.upstream_include);
    for patch in &config.patches {
        let target = config.root.join(&patch.file);
        if !target.is_file() {
            out.push(ValidationWarning::new(
                "patch.file",
                format!("patch target does not exist: {}", patch.file.display()),
            ));
        }
    }
    out
}

fn check_dir(out: &mut Vec<ValidationWarning>, item: &str, path: &Path) {
    if !path.is_dir() {
        out.push(ValidationWarning::new(
            item,
            format!("upstream root is not a directory: {}", path.display()),
        ));
    }
}
