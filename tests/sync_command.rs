#![allow(
    clippy::expect_used,
    clippy::unwrap_used,
    clippy::wildcard_imports,
    clippy::indexing_slicing
)]
//! Integration tests for the `sync` command.
//!
//! These tests run the full sync task list against real temporary trees and
//! check the mirroring, exclusion, and patching behavior end to end.

mod common;

use common::{NO_PATCHES, SyncFixtureBuilder};
use mesa_sync::logging::TaskStatus;
use mesa_sync::tasks;

const INDICES: &str = "gallium/auxiliary/indices";

// ---------------------------------------------------------------------------
// Snapshot: full sync task list
// ---------------------------------------------------------------------------

/// Snapshot of all sync task names in their execution order.
#[test]
fn sync_task_names() {
    let all_tasks = tasks::all_sync_tasks();
    let task_names: Vec<&str> = all_tasks.iter().map(|t| t.name()).collect();
    insta::assert_snapshot!(task_names.join("\n"), @r"
    Load project info
    Mirror sources
    Mirror includes
    Patch special cases
    ");
}

// ---------------------------------------------------------------------------
// End-to-end
// ---------------------------------------------------------------------------

/// Upstream `indices` with one locally excluded file: the shadow is refreshed,
/// the hand-kept file is untouched apart from the include patch, and the new
/// file is copied, announced, and patched.
#[test]
fn indices_directory_with_one_shadow() {
    let fixture = SyncFixtureBuilder::new()
        .upstream_src_file(&format!("{INDICES}/u_indices.c"), "upstream indices\n")
        .upstream_src_file(
            &format!("{INDICES}/u_indices_gen.c"),
            "#include \"indices/u_indices.c\"\n/* upstream v2 */\n",
        )
        .upstream_src_file(
            &format!("{INDICES}/u_unfilled_gen.c"),
            "#include \"indices/u_unfilled_indices.c\"\n/* unfilled */\n",
        )
        .local_file(
            &format!("{INDICES}/u_indices_gen.c"),
            "/* local */\n#include \"indices/u_indices.c\"\n",
        )
        .local_file(
            &format!("{INDICES}/u_indices_gen.c.notincluded"),
            "/* upstream v1 */\n",
        )
        .local_file(&format!("{INDICES}/u_indices.c"), "local indices\n")
        .build();

    let run = fixture.sync(false);
    run.result.expect("sync succeeds");

    assert_eq!(
        fixture
            .read(&format!("{INDICES}/u_indices_gen.c.notincluded"))
            .as_deref(),
        Some("#include \"indices/u_indices.c\"\n/* upstream v2 */\n")
    );
    assert_eq!(
        fixture.read(&format!("{INDICES}/u_indices_gen.c")).as_deref(),
        Some("/* local */\n#include \"indices/u_indices.c.notincluded\"\n")
    );
    assert_eq!(
        fixture.read(&format!("{INDICES}/u_unfilled_gen.c")).as_deref(),
        Some("#include \"indices/u_unfilled_indices.c.notincluded\"\n/* unfilled */\n")
    );
    assert_eq!(
        fixture.read(&format!("{INDICES}/u_indices.c")).as_deref(),
        Some("upstream indices\n")
    );

    let notices = run.log.of_kind("notice");
    assert_eq!(notices.len(), 1);
    assert!(notices[0].starts_with("new file "));
    assert!(notices[0].ends_with("u_unfilled_gen.c"));
    assert!(run.log.of_kind("error").is_empty());

    assert_eq!(
        run.log.statuses(),
        [
            ("Load project info".to_string(), TaskStatus::NotApplicable),
            ("Mirror sources".to_string(), TaskStatus::Ok),
            ("Mirror includes".to_string(), TaskStatus::NotApplicable),
            ("Patch special cases".to_string(), TaskStatus::Ok),
        ]
    );
}

/// A second sync over an unchanged upstream leaves every file as the first
/// sync left it.
#[test]
fn second_sync_is_stable() {
    let fixture = SyncFixtureBuilder::new()
        .upstream_src_file(
            &format!("{INDICES}/u_indices_gen.c"),
            "#include \"indices/u_indices.c\"\n",
        )
        .upstream_src_file(
            &format!("{INDICES}/u_unfilled_gen.c"),
            "#include \"indices/u_unfilled_indices.c\"\n",
        )
        .local_dir(INDICES)
        .build();

    fixture.sync(false).result.expect("first sync");
    let gen_after_first = fixture.read(&format!("{INDICES}/u_indices_gen.c"));
    let run = fixture.sync(false);
    run.result.expect("second sync");

    assert_eq!(
        fixture.read(&format!("{INDICES}/u_indices_gen.c")),
        gen_after_first
    );
    assert!(run.log.of_kind("notice").is_empty());
}

// ---------------------------------------------------------------------------
// Classification and filtering
// ---------------------------------------------------------------------------

/// Top-level directories whose name starts with `include` are fed from the
/// include root; everything else, including a nested `include`, from the
/// source root.
#[test]
fn include_directories_use_include_root() {
    let fixture = SyncFixtureBuilder::new()
        .config_file(NO_PATCHES)
        .upstream_include_file("include/GL/gl.h", "include root gl\n")
        .upstream_src_file("include/GL/gl.h", "src root gl\n")
        .upstream_include_file("includes/x.h", "include root includes\n")
        .upstream_src_file("includes/x.h", "src includes\n")
        .upstream_src_file("util/include/y.h", "src nested include\n")
        .upstream_include_file("include/z.h", "include root z\n")
        .local_dir("include/GL")
        .local_dir("includes")
        .local_dir("util/include")
        .build();

    fixture.sync(false).result.expect("sync succeeds");

    assert_eq!(
        fixture.read("include/GL/gl.h").as_deref(),
        Some("include root gl\n")
    );
    assert_eq!(fixture.read("include/z.h").as_deref(), Some("include root z\n"));
    assert_eq!(
        fixture.read("includes/x.h").as_deref(),
        Some("include root includes\n")
    );
    assert_eq!(
        fixture.read("util/include/y.h").as_deref(),
        Some("src nested include\n")
    );
}

/// Only `.c`, `.cpp`, and `.h` files are copied; others produce no output.
#[test]
fn non_source_files_are_ignored_silently() {
    let fixture = SyncFixtureBuilder::new()
        .config_file(NO_PATCHES)
        .upstream_src_file("util/u_math.c", "c")
        .upstream_src_file("util/u_math.cxx", "cxx")
        .upstream_src_file("util/u_math.hpp", "hpp")
        .upstream_src_file("util/meson.build", "build")
        .upstream_src_file("util/sub/deep.c", "deep")
        .local_dir("util")
        .build();

    let run = fixture.sync(false);
    run.result.expect("sync succeeds");

    assert!(fixture.read("util/u_math.c").is_some());
    assert!(fixture.read("util/u_math.cxx").is_none());
    assert!(fixture.read("util/u_math.hpp").is_none());
    assert!(fixture.read("util/meson.build").is_none());
    assert!(!fixture.local("util/sub").exists());
    assert_eq!(run.log.of_kind("notice").len(), 1);
    assert!(run.log.of_kind("error").is_empty());
}

/// Custom extension lists replace the defaults.
#[test]
fn configured_extensions_replace_defaults() {
    let fixture = SyncFixtureBuilder::new()
        .config_file("patch = []\n\n[mirror]\nextensions = [\"h\"]\n")
        .upstream_src_file("util/a.c", "c")
        .upstream_src_file("util/a.h", "h")
        .local_dir("util")
        .build();

    fixture.sync(false).result.expect("sync succeeds");

    assert!(fixture.read("util/a.c").is_none());
    assert_eq!(fixture.read("util/a.h").as_deref(), Some("h"));
}

// ---------------------------------------------------------------------------
// Failure handling
// ---------------------------------------------------------------------------

/// A local directory with no upstream counterpart aborts the run.
#[test]
fn missing_upstream_directory_is_fatal() {
    let fixture = SyncFixtureBuilder::new()
        .config_file(NO_PATCHES)
        .local_dir("local_only")
        .build();

    let run = fixture.sync(false);

    let err = run.result.expect_err("lookup failure is fatal");
    assert!(err.to_string().contains("local_only"), "{err}");
    let statuses = run.log.statuses();
    assert_eq!(
        statuses.last(),
        Some(&("Mirror sources".to_string(), TaskStatus::Failed))
    );
    assert_eq!(statuses.len(), 2, "later tasks must not run");
}

/// A file that cannot be copied is reported and the rest of the tree is
/// still mirrored.
#[test]
fn copy_failure_does_not_stop_the_run() {
    let fixture = SyncFixtureBuilder::new()
        .config_file("patch = []\n\n[mirror]\nskip_dirs = [\"a.c\"]\n")
        .upstream_src_file("util/a.c", "a")
        .upstream_src_file("util/b.c", "b")
        .upstream_src_file("vl/c.c", "c")
        // A directory in the way makes the copy to util/a.c fail; skip_dirs
        // keeps it out of the mirrored set.
        .local_dir("util/a.c")
        .local_dir("vl")
        .build();

    let run = fixture.sync(false);
    run.result.expect("copy failures are not fatal");

    assert_eq!(fixture.read("util/b.c").as_deref(), Some("b"));
    assert_eq!(fixture.read("vl/c.c").as_deref(), Some("c"));

    let errors = run.log.of_kind("error");
    assert_eq!(errors.len(), 1);
    assert!(errors[0].contains("src: "));
    assert!(errors[0].contains("dst: "));
    let mirror = run
        .log
        .tasks()
        .into_iter()
        .find(|t| t.name == "Mirror sources")
        .expect("mirror task recorded");
    assert_eq!(mirror.status, TaskStatus::Incomplete);
}

/// A missing patch target aborts the run after mirroring.
#[test]
fn missing_patch_target_is_fatal() {
    let fixture = SyncFixtureBuilder::new()
        .upstream_src_file("util/a.c", "a")
        .local_dir("util")
        .build();

    let run = fixture.sync(false);

    let err = run.result.expect_err("open failure is fatal");
    assert!(err.to_string().contains("u_indices_gen.c"), "{err}");
    assert_eq!(fixture.read("util/a.c").as_deref(), Some("a"));
}

// ---------------------------------------------------------------------------
// Dry run and project info
// ---------------------------------------------------------------------------

/// A dry run evaluates everything and writes nothing.
#[test]
fn dry_run_writes_nothing() {
    let fixture = SyncFixtureBuilder::new()
        .upstream_src_file(
            &format!("{INDICES}/u_indices_gen.c"),
            "#include \"indices/u_indices.c\"\n",
        )
        .upstream_src_file(
            &format!("{INDICES}/u_unfilled_gen.c"),
            "#include \"indices/u_unfilled_indices.c\"\n",
        )
        .local_file(
            &format!("{INDICES}/u_indices_gen.c"),
            "#include \"indices/u_indices.c\"\n",
        )
        .local_file(
            &format!("{INDICES}/u_unfilled_gen.c"),
            "#include \"indices/u_unfilled_indices.c\"\n",
        )
        .build();

    let run = fixture.sync(true);
    run.result.expect("dry run succeeds");

    assert_eq!(
        fixture.read(&format!("{INDICES}/u_indices_gen.c")).as_deref(),
        Some("#include \"indices/u_indices.c\"\n")
    );
    assert!(!run.log.of_kind("dry_run").is_empty());
    assert!(
        run.log
            .statuses()
            .iter()
            .filter(|(_, s)| *s != TaskStatus::NotApplicable)
            .all(|(_, s)| *s == TaskStatus::DryRun)
    );
}

/// A dry run over a tree that lacks the patch targets previews the patches
/// against the upstream files the mirror pass would copy.
#[test]
fn dry_run_on_fresh_tree_previews_patches() {
    let fixture = SyncFixtureBuilder::new()
        .upstream_src_file(
            &format!("{INDICES}/u_indices_gen.c"),
            "#include \"indices/u_indices.c\"\n",
        )
        .upstream_src_file(
            &format!("{INDICES}/u_unfilled_gen.c"),
            "#include \"indices/u_unfilled_indices.c\"\n",
        )
        .local_dir(INDICES)
        .build();

    let run = fixture.sync(true);
    run.result.expect("dry run succeeds on a fresh tree");

    assert!(fixture.read(&format!("{INDICES}/u_indices_gen.c")).is_none());
    assert!(fixture.read(&format!("{INDICES}/u_unfilled_gen.c")).is_none());
    let previews = run.log.of_kind("dry_run");
    assert_eq!(
        previews
            .iter()
            .filter(|m| m.starts_with("would redirect"))
            .count(),
        2
    );
}

/// A configured project cache is loaded and reported.
#[test]
fn project_cache_is_reported() {
    let fixture = SyncFixtureBuilder::new()
        .config_file("patch = []\n\n[project]\ncache = \"project.json\"\n")
        .local_file("project.json", r#"{"name": "mesa", "srcs": ["util/u_math.c"]}"#)
        .build();

    let run = fixture.sync(false);
    run.result.expect("sync succeeds");

    assert_eq!(
        run.log.statuses()[0],
        ("Load project info".to_string(), TaskStatus::Ok)
    );
    assert!(
        run.log
            .of_kind("info")
            .contains(&"mesa: 1 source file(s) in 1 directory".to_string())
    );
}
