//! Filesystem operation abstractions for dependency injection.
//!
//! Provides the [`FileSystemOps`] trait so that mirroring and patching can be
//! unit-tested without touching the real filesystem.  Production code uses
//! [`SystemFileSystemOps`]; tests use `MockFileSystemOps`.

use std::io;
use std::path::{Path, PathBuf};

/// Abstraction over the filesystem calls made by a sync run.
///
/// Every method mirrors the corresponding [`std::fs`] call and returns raw
/// [`io::Error`]s so callers can wrap them in the typed errors of
/// [`crate::error`].
pub trait FileSystemOps: Send + Sync + std::fmt::Debug {
    /// Returns `true` if `path` exists on the filesystem.
    fn exists(&self, path: &Path) -> bool;

    /// Returns `true` if `path` is a directory.
    fn is_dir(&self, path: &Path) -> bool;

    /// Returns the immediate child paths inside `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if `path` cannot be opened or read as a directory.
    fn read_dir(&self, path: &Path) -> io::Result<Vec<PathBuf>>;

    /// Copy the contents of `src` to `dst`, replacing `dst` if it exists.
    ///
    /// # Errors
    ///
    /// Returns an error if `src` cannot be read or `dst` cannot be written.
    fn copy(&self, src: &Path, dst: &Path) -> io::Result<()>;

    /// Read the whole file at `path` as raw bytes.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened or read.
    fn read(&self, path: &Path) -> io::Result<Vec<u8>>;

    /// Replace the contents of `path` with `contents`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    fn write(&self, path: &Path, contents: &[u8]) -> io::Result<()>;
}

/// Production [`FileSystemOps`] implementation that delegates to [`std::fs`].
#[derive(Debug, Default)]
pub struct SystemFileSystemOps;

impl FileSystemOps for SystemFileSystemOps {
    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn is_dir(&self, path: &Path) -> bool {
        path.is_dir()
    }

    fn read_dir(&self, path: &Path) -> io::Result<Vec<PathBuf>> {
        std::fs::read_dir(path)?
            .map(|e| e.map(|entry| entry.path()))
            .collect()
    }

    fn copy(&self, src: &Path, dst: &Path) -> io::Result<()> {
        std::fs::copy(src, dst).map(|_| ())
    }

    fn read(&self, path: &Path) -> io::Result<Vec<u8>> {
        std::fs::read(path)
    }

    fn write(&self, path: &Path, contents: &[u8]) -> io::Result<()> {
        std::fs::write(path, contents)
    }
}

/// In-memory [`FileSystemOps`] for unit tests.
///
/// Pre-populate files and directories with the builder-style methods, mark
/// destinations whose copy should fail, then inspect the resulting state
/// with [`MockFileSystemOps::contents`].
///
/// # Example
///
/// ```ignore
/// let fs = MockFileSystemOps::new()
///     .with_file("/mesa/src/util/u_math.c", "int x;")
///     .with_dir("/tree/util")
///     .with_failing_copy("/tree/util/u_math.c");
/// ```
#[cfg(test)]
#[derive(Debug, Default)]
pub struct MockFileSystemOps {
    files: std::sync::Mutex<std::collections::BTreeMap<PathBuf, Vec<u8>>>,
    dirs: std::collections::BTreeSet<PathBuf>,
    failing_copies: std::collections::HashSet<PathBuf>,
    copies: std::sync::Mutex<Vec<(PathBuf, PathBuf)>>,
}

#[cfg(test)]
#[allow(clippy::expect_used)]
impl MockFileSystemOps {
    /// Create an empty mock with nothing configured.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a regular file (and its parent directories).
    #[must_use]
    pub fn with_file(self, path: impl Into<PathBuf>, contents: &str) -> Self {
        self.with_bytes(path, contents.as_bytes())
    }

    /// Add a regular file holding arbitrary bytes.
    #[must_use]
    pub fn with_bytes(mut self, path: impl Into<PathBuf>, contents: &[u8]) -> Self {
        let p = path.into();
        self.add_parents(&p);
        self.files
            .get_mut()
            .expect("mock files poisoned")
            .insert(p, contents.to_vec());
        self
    }

    /// Add an empty directory (and its parents).
    #[must_use]
    pub fn with_dir(mut self, path: impl Into<PathBuf>) -> Self {
        let p = path.into();
        self.add_parents(&p);
        self.dirs.insert(p);
        self
    }

    /// Make every copy whose destination is `dst` fail with `PermissionDenied`.
    #[must_use]
    pub fn with_failing_copy(mut self, dst: impl Into<PathBuf>) -> Self {
        self.failing_copies.insert(dst.into());
        self
    }

    /// Current contents of `path`, if it is a file holding UTF-8 text.
    pub fn contents(&self, path: impl AsRef<Path>) -> Option<String> {
        self.bytes(path).and_then(|b| String::from_utf8(b).ok())
    }

    /// Current raw contents of `path`, if it is a file.
    pub fn bytes(&self, path: impl AsRef<Path>) -> Option<Vec<u8>> {
        self.files
            .lock()
            .expect("mock files poisoned")
            .get(path.as_ref())
            .cloned()
    }

    /// Every `(src, dst)` copy attempted so far, including failed ones.
    pub fn copy_attempts(&self) -> Vec<(PathBuf, PathBuf)> {
        self.copies.lock().expect("mock copies poisoned").clone()
    }

    fn add_parents(&mut self, path: &Path) {
        for ancestor in path.ancestors().skip(1) {
            if ancestor.as_os_str().is_empty() {
                break;
            }
            self.dirs.insert(ancestor.to_path_buf());
        }
    }
}

#[cfg(test)]
#[allow(clippy::expect_used)]
impl FileSystemOps for MockFileSystemOps {
    fn exists(&self, path: &Path) -> bool {
        self.dirs.contains(path)
            || self
                .files
                .lock()
                .expect("mock files poisoned")
                .contains_key(path)
    }

    fn is_dir(&self, path: &Path) -> bool {
        self.dirs.contains(path)
    }

    fn read_dir(&self, path: &Path) -> io::Result<Vec<PathBuf>> {
        if !self.dirs.contains(path) {
            return Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("mock: no directory {}", path.display()),
            ));
        }
        let files = self.files.lock().expect("mock files poisoned");
        let mut children: Vec<PathBuf> = files
            .keys()
            .chain(self.dirs.iter())
            .filter(|p| p.parent() == Some(path))
            .cloned()
            .collect();
        children.sort();
        Ok(children)
    }

    fn copy(&self, src: &Path, dst: &Path) -> io::Result<()> {
        self.copies
            .lock()
            .expect("mock copies poisoned")
            .push((src.to_path_buf(), dst.to_path_buf()));
        if self.failing_copies.contains(dst) {
            return Err(io::Error::new(
                io::ErrorKind::PermissionDenied,
                "mock: permission denied",
            ));
        }
        let mut files = self.files.lock().expect("mock files poisoned");
        let data = files
            .get(src)
            .cloned()
            .ok_or_else(|| io::Error::from(io::ErrorKind::NotFound))?;
        files.insert(dst.to_path_buf(), data);
        Ok(())
    }

    fn read(&self, path: &Path) -> io::Result<Vec<u8>> {
        self.bytes(path)
            .ok_or_else(|| io::Error::from(io::ErrorKind::NotFound))
    }

    fn write(&self, path: &Path, contents: &[u8]) -> io::Result<()> {
        self.files
            .lock()
            .expect("mock files poisoned")
            .insert(path.to_path_buf(), contents.to_vec());
        Ok(())
    }
}
