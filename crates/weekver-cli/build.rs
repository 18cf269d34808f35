//! Embeds the release version as `WEEKVER_VERSION`.
//!
//! Uses the nearest git tag when building from a checkout and falls back to
//! the crate version for source tarballs.

use std::process::Command;

fn git_version() -> Option<String> {
    let out = Command::new("git")
        .args(["describe", "--tags", "--always", "--dirty=-dev"])
        .output()
        .ok()?;
    if !out.status.success() {
        return None;
    }
    let tag = String::from_utf8(out.stdout).ok()?;
    let tag = tag.trim().trim_start_matches('v');
    (!tag.is_empty()).then(|| tag.to_string())
}

fn main() {
    // This crate lives two levels below the repository root.
    println!("cargo:rerun-if-changed=../../.git/HEAD");

    let version = git_version().unwrap_or_else(|| env!("CARGO_PKG_VERSION").to_string());
    println!("cargo:rustc-env=WEEKVER_VERSION={version}");
}
