//! Build script: embeds the version reported by `mesa-sync version`.
use std::process::Command;

fn main() {
    // MESA_SYNC_VERSION wins when set (release packaging); otherwise describe
    // the checkout so local builds carry the commit they were built from.
    if let Ok(version) = std::env::var("MESA_SYNC_VERSION") {
        println!("cargo:rustc-env=MESA_SYNC_VERSION={version}");
    } else if let Ok(output) = Command::new("git")
        .args(["describe", "--tags", "--always", "--dirty"])
        .output()
        && output.status.success()
    {
        let version = String::from_utf8_lossy(&output.stdout).trim().to_string();
        if !version.is_empty() {
            println!("cargo:rustc-env=MESA_SYNC_VERSION={version}");
        }
    }

    println!("cargo:rerun-if-changed=.git/HEAD");
    println!("cargo:rerun-if-changed=.git/refs/");
    println!("cargo:rerun-if-env-changed=MESA_SYNC_VERSION");
}
