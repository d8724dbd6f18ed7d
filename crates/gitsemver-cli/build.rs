use gitsemver::git::{self, DescribeOptions};
use std::path::Path;

fn main() {
    // Version from our own git history (e.g. "0.1.0" or "0.1.1-dev.5+gabc1234")
    let dir = Path::new(env!("CARGO_MANIFEST_DIR"));
    let version = git::versions(&DescribeOptions::default(), dir)
        .ok()
        .and_then(|versions| versions.into_iter().next())
        .filter(|derived| derived.tag.is_some())
        .map(|derived| derived.to_string())
        .unwrap_or_else(|| env!("CARGO_PKG_VERSION").to_string());

    println!("cargo:rustc-env=GIT_SEMVER_VERSION={}", version);
    println!("cargo:rerun-if-changed=../../.git/HEAD");
    println!("cargo:rerun-if-changed=../../.git/refs/tags");
}
