// Shared helpers for integration tests.
//
// Provides a temporary directory holding a local tree next to an upstream
// checkout, a fluent builder to populate both, and a recording logger so
// each test can assert on what a run reported.
//
// Used by all integration test binaries that declare `mod common;`.
#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use mesa_sync::config::{Config, Overrides};
use mesa_sync::logging::{Log, TaskEntry, TaskStatus};
use mesa_sync::tasks::{self, Context};
use mesa_sync::tree;

/// [`Log`] implementation that keeps every message in memory.
#[derive(Debug, Default)]
pub struct RecordingLog {
    messages: Mutex<Vec<(&'static str, String)>>,
    tasks: Mutex<Vec<TaskEntry>>,
}

impl RecordingLog {
    fn push(&self, kind: &'static str, msg: &str) {
        self.messages
            .lock()
            .expect("messages poisoned")
            .push((kind, msg.to_string()));
    }

    /// All messages logged through the method named `kind`.
    pub fn of_kind(&self, kind: &str) -> Vec<String> {
        self.messages
            .lock()
            .expect("messages poisoned")
            .iter()
            .filter(|(k, _)| *k == kind)
            .map(|(_, m)| m.clone())
            .collect()
    }

    /// Recorded task results in execution order.
    pub fn tasks(&self) -> Vec<TaskEntry> {
        self.tasks.lock().expect("tasks poisoned").clone()
    }

    /// Recorded `(name, status)` pairs.
    pub fn statuses(&self) -> Vec<(String, TaskStatus)> {
        self.tasks()
            .into_iter()
            .map(|t| (t.name, t.status))
            .collect()
    }
}

impl Log for RecordingLog {
    fn stage(&self, msg: &str) {
        self.push("stage", msg);
    }
    fn info(&self, msg: &str) {
        self.push("info", msg);
    }
    fn notice(&self, msg: &str) {
        self.push("notice", msg);
    }
    fn debug(&self, msg: &str) {
        self.push("debug", msg);
    }
    fn warn(&self, msg: &str) {
        self.push("warn", msg);
    }
    fn error(&self, msg: &str) {
        self.push("error", msg);
    }
    fn dry_run(&self, msg: &str) {
        self.push("dry_run", msg);
    }
    fn record_task(&self, name: &str, status: TaskStatus, message: Option<&str>) {
        self.tasks.lock().expect("tasks poisoned").push(TaskEntry {
            name: name.to_string(),
            status,
            message: message.map(String::from),
        });
    }
}

/// A local tree and an upstream checkout side by side in a [`tempfile::TempDir`].
///
/// Layout:
/// - `tree/`      local root
/// - `mesa/`      upstream include root
/// - `mesa/src/`  upstream source root
pub struct SyncFixture {
    /// Temporary directory holding both trees.
    pub dir: tempfile::TempDir,
}

/// Result of running the sync task list against a fixture.
pub struct SyncRun {
    pub result: anyhow::Result<()>,
    pub log: Arc<RecordingLog>,
}

impl SyncFixture {
    /// Path to the local tree.
    pub fn root(&self) -> PathBuf {
        self.dir.path().join("tree")
    }

    /// Path to the upstream source root.
    pub fn upstream_src(&self) -> PathBuf {
        self.dir.path().join("mesa").join("src")
    }

    /// Path to the upstream include root.
    pub fn upstream_include(&self) -> PathBuf {
        self.dir.path().join("mesa")
    }

    /// Absolute path of `relative` inside the local tree.
    pub fn local(&self, relative: &str) -> PathBuf {
        self.root().join(relative)
    }

    /// Contents of a local file, if it exists.
    pub fn read(&self, relative: &str) -> Option<String> {
        std::fs::read_to_string(self.local(relative)).ok()
    }

    /// Load the configuration with both upstream roots pointed at the fixture.
    pub fn config(&self) -> Config {
        Config::load(
            &self.root(),
            &Overrides {
                config_file: None,
                upstream_src: Some(self.upstream_src()),
                upstream_include: Some(self.upstream_include()),
            },
        )
        .expect("load config")
    }

    /// Classify the local tree and build a context over the real filesystem.
    pub fn context(&self, dry_run: bool) -> (Context, Arc<RecordingLog>) {
        let config = self.config();
        let dirs = tree::classify(&config.root, &config.skip_dirs).expect("classify tree");
        let log = Arc::new(RecordingLog::default());
        let ctx = Context::new(config, dirs, log.clone(), dry_run);
        (ctx, log)
    }

    /// Run every sync task in order, stopping at the first fatal error.
    pub fn sync(&self, dry_run: bool) -> SyncRun {
        let (ctx, log) = self.context(dry_run);
        let result = tasks::all_sync_tasks()
            .iter()
            .try_for_each(|task| tasks::execute(task.as_ref(), &ctx));
        SyncRun { result, log }
    }
}

/// Fluent builder for [`SyncFixture`].
pub struct SyncFixtureBuilder {
    fixture: SyncFixture,
}

impl SyncFixtureBuilder {
    /// Begin with empty local and upstream trees.
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("create temp dir");
        let fixture = SyncFixture { dir };
        std::fs::create_dir_all(fixture.root()).expect("create local root");
        std::fs::create_dir_all(fixture.upstream_src()).expect("create upstream src");
        Self { fixture }
    }

    /// Create an empty local directory.
    pub fn local_dir(self, relative: &str) -> Self {
        std::fs::create_dir_all(self.fixture.local(relative)).expect("create local dir");
        self
    }

    /// Write a local file, creating its directories.
    pub fn local_file(self, relative: &str, contents: &str) -> Self {
        write_file(&self.fixture.local(relative), contents);
        self
    }

    /// Write a file under the upstream source root.
    pub fn upstream_src_file(self, relative: &str, contents: &str) -> Self {
        write_file(&self.fixture.upstream_src().join(relative), contents);
        self
    }

    /// Write a file under the upstream include root.
    pub fn upstream_include_file(self, relative: &str, contents: &str) -> Self {
        write_file(&self.fixture.upstream_include().join(relative), contents);
        self
    }

    /// Write `mesa-sync.toml` in the local root.
    pub fn config_file(self, contents: &str) -> Self {
        write_file(&self.fixture.local("mesa-sync.toml"), contents);
        self
    }

    /// Finish building and return the fixture.
    pub fn build(self) -> SyncFixture {
        self.fixture
    }
}

fn write_file(path: &Path, contents: &str) {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).expect("create parent dir");
    }
    std::fs::write(path, contents).expect("write file");
}

/// Config that disables the default special-case patches.
pub const NO_PATCHES: &str = "patch = []\n";
