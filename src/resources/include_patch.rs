//! Rewrite `#include "<name>"` so it points at the excluded shadow copy.
//!
//! A few upstream generators `#include` a source file that this tree keeps
//! only as a `.notincluded` shadow.  After every mirror pass the directive is
//! redirected to the shadow so the generator still compiles.
use std::borrow::Cow;
use std::path::{Path, PathBuf};

use regex::bytes::Regex;

use super::mirrored_file::SHADOW_SUFFIX;
use super::{Resource, ResourceChange};
use crate::error::PatchError;
use crate::operations::FileSystemOps;

/// Line transform for one include name.
///
/// Works on raw bytes so sources carrying Latin-1 comments pass through
/// untouched.
#[derive(Debug, Clone)]
pub struct IncludeRewrite {
    pattern: Regex,
}

impl IncludeRewrite {
    /// Build the rewrite for `#include "<name>"`.
    ///
    /// `name` is matched literally.
    ///
    /// # Errors
    ///
    /// Returns an error if the escaped pattern exceeds the regex size limit.
    pub fn new(name: &str) -> Result<Self, regex::Error> {
        let pattern = Regex::new(&format!(r#"^#include "({})""#, regex::escape(name)))?;
        Ok(Self { pattern })
    }

    /// Rewrite a single line.
    ///
    /// Only a directive at the very start of the line matches; the quoted
    /// name gains the `.notincluded` suffix and nothing else on the line
    /// changes.  Lines that do not match are returned borrowed.
    ///
    /// # Examples
    ///
    /// ```
    /// use mesa_sync::resources::include_patch::IncludeRewrite;
    ///
    /// let rw = IncludeRewrite::new("indices/u_indices.c").unwrap();
    /// assert_eq!(
    ///     rw.apply_line(b"#include \"indices/u_indices.c\"\n").as_ref(),
    ///     b"#include \"indices/u_indices.c.notincluded\"\n",
    /// );
    /// assert_eq!(
    ///     rw.apply_line(b"// #include \"indices/u_indices.c\"\n").as_ref(),
    ///     b"// #include \"indices/u_indices.c\"\n",
    /// );
    /// ```
    #[must_use]
    pub fn apply_line<'a>(&self, line: &'a [u8]) -> Cow<'a, [u8]> {
        let Some(name) = self.pattern.captures(line).and_then(|c| c.get(1)) else {
            return Cow::Borrowed(line);
        };
        let (head, tail) = line.split_at(name.end());
        Cow::Owned([head, SHADOW_SUFFIX.as_bytes(), tail].concat())
    }

    /// Rewrite every line of `text`, preserving line endings.
    ///
    /// Returns the new content and the number of lines that changed.
    #[must_use]
    pub fn apply_text(&self, text: &[u8]) -> (Vec<u8>, usize) {
        let mut out = Vec::with_capacity(text.len() + SHADOW_SUFFIX.len());
        let mut changed = 0;
        for line in text.split_inclusive(|b| *b == b'\n') {
            let patched = self.apply_line(line);
            if matches!(patched, Cow::Owned(_)) {
                changed += 1;
            }
            out.extend_from_slice(&patched);
        }
        (out, changed)
    }
}

/// A local file whose include of `include` must point at the shadow copy.
#[derive(Debug, Clone)]
pub struct IncludePatch {
    /// File to rewrite.
    pub path: PathBuf,
    /// Include argument to redirect.
    pub include: String,
    source: Option<PathBuf>,
    rewrite: IncludeRewrite,
}

impl IncludePatch {
    /// # Errors
    ///
    /// Returns [`PatchError::Pattern`] if no matcher can be built for `include`.
    pub fn new(path: PathBuf, include: &str) -> Result<Self, PatchError> {
        let rewrite = IncludeRewrite::new(include).map_err(|source| PatchError::Pattern {
            include: include.to_string(),
            source,
        })?;
        Ok(Self {
            path,
            include: include.to_string(),
            source: None,
            rewrite,
        })
    }

    /// Evaluate the patch against `source` instead of the target itself.
    ///
    /// Used by dry runs, where the mirror pass would have replaced the
    /// target with `source` before patching.
    #[must_use]
    pub fn reading_from(mut self, source: PathBuf) -> Self {
        self.source = Some(source);
        self
    }

    fn read_path(&self) -> &Path {
        self.source.as_deref().unwrap_or(&self.path)
    }
}

/// Outcome of reading and transforming a patch target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatchPlan {
    /// Full rewritten content.
    pub patched: Vec<u8>,
    /// Number of directive lines redirected.
    pub lines: usize,
}

impl Resource for IncludePatch {
    type State = PatchPlan;
    type Error = PatchError;

    fn description(&self) -> String {
        format!("{} ({})", self.path.display(), self.include)
    }

    fn current_state(&self, fs: &dyn FileSystemOps) -> Result<PatchPlan, PatchError> {
        let path = self.read_path();
        let text = fs.read(path).map_err(|source| PatchError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        let (patched, lines) = self.rewrite.apply_text(&text);
        Ok(PatchPlan { patched, lines })
    }

    fn apply(
        &self,
        fs: &dyn FileSystemOps,
        plan: &PatchPlan,
    ) -> Result<ResourceChange, PatchError> {
        if plan.lines == 0 {
            return Ok(ResourceChange::AlreadyCorrect);
        }
        fs.write(&self.path, &plan.patched)
            .map_err(|source| PatchError::Write {
                path: self.path.clone(),
                source,
            })?;
        Ok(ResourceChange::Applied)
    }
}
