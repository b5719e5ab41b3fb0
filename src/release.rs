//! Release detection.
//!
//! The release attached to outgoing events is taken from the first of these
//! that yields a value:
//! 1. `git rev-parse HEAD`, run through a [`CommandRunner`]
//! 2. `<project_root>/REVISION`, written by Capistrano
//! 3. the last line of `<project_root>/../revisions.log`, also Capistrano
//! 4. `release.commit` from the Heroku dyno metadata file
//!
//! Every strategy absorbs its own failures so the next one still runs.

use crate::logger::Logger;
use regex::Regex;
use std::path::Path;
use std::process::{Command, Stdio};
use std::sync::LazyLock;

static RELEASE_TOKEN_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"as release (\d+)").expect("release token regex should compile")
});

/// Runs an external command and returns its standard output.
///
/// Implementations return `None` when the command cannot be started or
/// exits unsuccessfully.
pub trait CommandRunner: Send + Sync {
    /// Runs `argv[0]` with the remaining arguments.
    fn run(&self, argv: &[&str]) -> Option<String>;
}

/// Runs commands as child processes of the current process.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemCommandRunner;

impl CommandRunner for SystemCommandRunner {
    fn run(&self, argv: &[&str]) -> Option<String> {
        let (program, args) = argv.split_first()?;
        let output = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stderr(Stdio::null())
            .output()
            .ok()?;

        if !output.status.success() {
            return None;
        }
        String::from_utf8(output.stdout).ok()
    }
}

/// Detects the release identifier for the running application.
pub struct ReleaseDetector<'a> {
    runner: &'a dyn CommandRunner,
    logger: &'a dyn Logger,
    project_root: &'a Path,
    platform_metadata_path: &'a Path,
}

impl<'a> ReleaseDetector<'a> {
    /// Creates a detector rooted at `project_root`.
    pub fn new(
        runner: &'a dyn CommandRunner,
        logger: &'a dyn Logger,
        project_root: &'a Path,
        platform_metadata_path: &'a Path,
    ) -> Self {
        Self {
            runner,
            logger,
            project_root,
            platform_metadata_path,
        }
    }

    /// Returns the first release any strategy produces.
    #[must_use]
    pub fn detect(&self) -> Option<String> {
        self.from_git()
            .or_else(|| self.from_revision_file())
            .or_else(|| self.from_revisions_log())
            .or_else(|| self.from_platform_metadata())
    }

    fn from_git(&self) -> Option<String> {
        let release = self
            .runner
            .run(&["git", "rev-parse", "HEAD"])
            .and_then(non_empty)?;
        tracing::debug!(target: "raven", %release, "Release detected from git");
        Some(release)
    }

    fn from_revision_file(&self) -> Option<String> {
        let contents = std::fs::read_to_string(self.project_root.join("REVISION")).ok()?;
        let release = non_empty(contents)?;
        tracing::debug!(target: "raven", %release, "Release detected from REVISION file");
        Some(release)
    }

    fn from_revisions_log(&self) -> Option<String> {
        let path = self.project_root.join("..").join("revisions.log");
        let contents = std::fs::read_to_string(path).ok()?;
        let release = release_from_log_line(contents.lines().last()?)?;
        tracing::debug!(target: "raven", %release, "Release detected from revisions.log");
        Some(release)
    }

    fn from_platform_metadata(&self) -> Option<String> {
        let contents = match std::fs::read_to_string(self.platform_metadata_path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return None,
            Err(e) => {
                self.logger
                    .error(&format!("Cannot read Heroku dyno metadata: {e}"));
                return None;
            }
        };

        let metadata: serde_json::Value = match serde_json::from_str(&contents) {
            Ok(metadata) => metadata,
            Err(e) => {
                self.logger.error(&format!("Cannot parse Heroku JSON: {e}"));
                return None;
            }
        };

        match metadata.pointer("/release/commit").and_then(|c| c.as_str()) {
            Some(commit) => {
                let release = non_empty(commit.to_string())?;
                tracing::debug!(target: "raven", %release, "Release detected from Heroku dyno metadata");
                Some(release)
            }
            None => {
                self.logger
                    .error("Cannot parse Heroku JSON: missing release.commit");
                None
            }
        }
    }
}

/// Extracts the numeric token following `as release` in a Capistrano log line.
///
/// ```text
/// Branch master (at 4f2a1c9) deployed as release 20240612093015 by deploy
/// ```
fn release_from_log_line(line: &str) -> Option<String> {
    RELEASE_TOKEN_PATTERN
        .captures(line)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

pub(crate) fn non_empty(value: String) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
