//! Embeds the git commit and build time for `ccman --version`.
//!
//! Both values can be pinned through the environment for reproducible builds;
//! otherwise they come from `git` and `date`, degrading to "unknown" markers.

use std::path::Path;
use std::process::Command;
use std::time::{SystemTime, UNIX_EPOCH};

const GIT_HASH_VAR: &str = "CCMAN_BUILD_GIT_HASH";
const TIMESTAMP_VAR: &str = "CCMAN_BUILD_TIMESTAMP";

fn main() {
    watch_git_head(Path::new(".git"));

    let git_hash = pinned_or(GIT_HASH_VAR, || {
        capture("git", &["rev-parse", "--short=12", "HEAD"])
            .unwrap_or_else(|| "unknown".to_string())
    });
    let timestamp = pinned_or(TIMESTAMP_VAR, || {
        capture("date", &["-u", "+%Y-%m-%dT%H:%M:%SZ"]).unwrap_or_else(unix_fallback)
    });

    println!("cargo:rustc-env={GIT_HASH_VAR}={git_hash}");
    println!("cargo:rustc-env={TIMESTAMP_VAR}={timestamp}");
}

fn pinned_or(var: &str, compute: impl FnOnce() -> String) -> String {
    println!("cargo:rerun-if-env-changed={var}");
    std::env::var(var).unwrap_or_else(|_| compute())
}

/// Rebuild when HEAD moves, including commits on the checked-out branch.
fn watch_git_head(git_dir: &Path) {
    let head = git_dir.join("HEAD");
    println!("cargo:rerun-if-changed={}", head.display());
    let branch_ref = std::fs::read_to_string(&head)
        .ok()
        .and_then(|text| text.trim().strip_prefix("ref: ").map(str::to_string));
    if let Some(branch_ref) = branch_ref {
        println!("cargo:rerun-if-changed={}", git_dir.join(branch_ref).display());
    }
}

fn unix_fallback() -> String {
    let secs = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default();
    format!("unix:{secs}")
}

fn capture(program: &str, args: &[&str]) -> Option<String> {
    let output = Command::new(program).args(args).output().ok()?;
    if !output.status.success() {
        return None;
    }
    let text = String::from_utf8(output.stdout).ok()?;
    Some(text.trim().to_string()).filter(|value| !value.is_empty())
}
