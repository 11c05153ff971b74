//! Build script for octo-pr - embeds a human-readable version string.
//!
//! The string is `{CARGO_PKG_VERSION} ({git}) {rustc --version}` where
//! `{git}` is `git describe --tags --always --dirty` when a tag is
//! reachable, and otherwise `v{version}-{timestamp}-{commit}` with the
//! build time as timestamp. Missing pieces are simply left out.

use std::process::Command;

use chrono::Utc;

fn main() {
    for path in ["src", "build.rs", "Cargo.toml"] {
        println!("cargo:rerun-if-changed={path}");
    }

    println!("cargo:rustc-env=BUILD_INFO_HUMAN={}", build_info());
}

fn run(program: &str, args: &[&str]) -> Option<String> {
    let output = Command::new(program).args(args).output().ok()?;
    if !output.status.success() {
        return None;
    }
    let text = String::from_utf8(output.stdout).ok()?;
    let text = text.trim();
    (!text.is_empty()).then(|| text.to_string())
}

fn git_version() -> Option<String> {
    let described = run("git", &["describe", "--tags", "--always", "--dirty"])?;
    if described.contains('v') || described.contains("-g") {
        return Some(described);
    }

    // Untagged history: describe only gave us a commit hash.
    let commit = run("git", &["rev-parse", "--short=12", "HEAD"])?;
    Some(format!(
        "v{}-{}-{commit}",
        env!("CARGO_PKG_VERSION"),
        Utc::now().format("%Y%m%d%H%M%S")
    ))
}

fn build_info() -> String {
    [
        Some(env!("CARGO_PKG_VERSION").to_string()),
        git_version().map(|v| format!("({v})")),
        run("rustc", &["--version"]),
    ]
    .into_iter()
    .flatten()
    .collect::<Vec<_>>()
    .join(" ")
}
