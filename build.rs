//! Embeds a build identifier as `GIT_HASH`
//!
//! `ZONE_CHECKER_BUILD_ID` wins when set. Otherwise `git describe` is
//! used, with a `-dirty` suffix for uncommitted changes.

use std::env;
use std::process::Command;

fn git_describe() -> Option<String> {
    let output =
        Command::new("git").args(["describe", "--always", "--dirty", "--abbrev=8"]).output().ok()?;
    if !output.status.success() {
        return None;
    }
    let id = String::from_utf8_lossy(&output.stdout).trim().to_string();
    (!id.is_empty()).then_some(id)
}

fn main() {
    let build_id = env::var("ZONE_CHECKER_BUILD_ID")
        .ok()
        .filter(|id| !id.trim().is_empty())
        .or_else(git_describe)
        .unwrap_or_else(|| "unknown".to_string());

    println!("cargo:rustc-env=GIT_HASH={build_id}");
    println!("cargo:rerun-if-env-changed=ZONE_CHECKER_BUILD_ID");
    println!("cargo:rerun-if-changed=.git/HEAD");
    println!("cargo:rerun-if-changed=.git/index");
}
