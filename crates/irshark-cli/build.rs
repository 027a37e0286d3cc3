//! Stamps `irshark --version` with the source commit and its commit date.

use std::env;
use std::process::Command;

const UNKNOWN: &str = "unknown";

struct BuildStamp {
    commit: String,
    date: String,
}

impl BuildStamp {
    /// CI exports the full SHA; local builds ask git for the short one.
    fn collect() -> Self {
        let commit = env::var("GITHUB_SHA")
            .ok()
            .filter(|sha| !sha.is_empty())
            .map(|sha| abbreviate(&sha))
            .or_else(|| git(&["rev-parse", "--short=7", "HEAD"]))
            .unwrap_or_else(|| UNKNOWN.to_string());
        let date = git(&["log", "-1", "--format=%cI"]).unwrap_or_else(|| UNKNOWN.to_string());
        Self { commit, date }
    }

    fn emit(&self) {
        println!("cargo:rustc-env=IRSHARK_BUILD_COMMIT={}", self.commit);
        println!("cargo:rustc-env=IRSHARK_BUILD_DATE={}", self.date);
    }
}

fn main() {
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-env-changed=GITHUB_SHA");
    BuildStamp::collect().emit();
}

fn git(args: &[&str]) -> Option<String> {
    let output = Command::new("git").args(args).output().ok()?;
    if !output.status.success() {
        return None;
    }
    let value = String::from_utf8_lossy(&output.stdout).trim().to_string();
    (!value.is_empty()).then_some(value)
}

fn abbreviate(sha: &str) -> String {
    sha.chars().take(7).collect()
}
