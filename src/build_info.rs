//! Build-time command capture.
//!
//! This module provides:
//! - [`emit_git_revision`] - Build.rs helper that records `git rev-parse HEAD`
//! - [`CompiledCommandRunner`] - A [`CommandRunner`] answering from values
//!   baked into the binary
//!
//! Deployed binaries often run without a git checkout next to them. Capturing
//! the revision at compile time keeps release detection working there.

use crate::release::{CommandRunner, non_empty};

/// Name of the environment variable emitted by [`emit_git_revision`].
pub const BUILD_REVISION_ENV: &str = "RAVEN_BUILD_REVISION";

/// A [`CommandRunner`] that answers `git rev-parse HEAD` from a revision
/// captured at compile time.
///
/// Any other command yields `None`, so detectors fall through to their
/// remaining strategies.
///
/// Use the [`compiled_command_runner!`](crate::compiled_command_runner) macro
/// to construct one from the value recorded by [`emit_git_revision`].
#[derive(Debug, Clone, Copy, Default)]
pub struct CompiledCommandRunner {
    git_revision: Option<&'static str>,
}

impl CompiledCommandRunner {
    /// Creates a runner for the given compile-time revision.
    #[must_use]
    pub const fn new(git_revision: Option<&'static str>) -> Self {
        Self { git_revision }
    }

    /// Returns the compiled-in revision.
    #[must_use]
    pub fn git_revision(&self) -> Option<&'static str> {
        self.git_revision
    }
}

impl CommandRunner for CompiledCommandRunner {
    fn run(&self, argv: &[&str]) -> Option<String> {
        match argv {
            ["git", "rev-parse", "HEAD"] => self
                .git_revision
                .map(str::to_string)
                .and_then(non_empty),
            _ => None,
        }
    }
}

/// Emits the current git revision as a cargo environment variable.
///
/// Call this from your `build.rs`. The revision is exposed to the crate being
/// built as `RAVEN_BUILD_REVISION` and can be read with the
/// [`compiled_command_runner!`](crate::compiled_command_runner) macro.
///
/// Nothing is emitted when git is unavailable or the build is not running
/// inside a repository.
///
/// # Example
///
/// ```ignore
/// // In build.rs:
/// fn main() {
///     raven_configuration::emit_git_revision();
/// }
/// ```
pub fn emit_git_revision() {
    use std::process::Command;

    println!("cargo::rerun-if-changed=.git/HEAD");
    println!("cargo::rerun-if-changed=.git/refs/heads");

    if let Ok(output) = Command::new("git").args(["rev-parse", "HEAD"]).output()
        && output.status.success()
        && let Ok(revision) = String::from_utf8(output.stdout)
    {
        let revision = revision.trim();
        if !revision.is_empty() {
            println!("cargo::rustc-env={BUILD_REVISION_ENV}={revision}");
        }
    }
}
