//! System git backend
//!
//! Shells out to the `git` binary for the handful of operations a release needs:
//! tag lookup, annotated tag creation and tag push. Every call goes through the
//! shared [`CommandRunner`], so release flows can be scripted in tests.

use crate::core::error::{GitError, ShipError, ShipResult};
use crate::core::exec::{CommandRunner, Invocation, Outcome};
use std::path::{Path, PathBuf};

/// Git backend using the system `git` binary
pub struct SystemGit<'a> {
  /// Repository working directory
  pub(crate) repo_path: PathBuf,

  runner: &'a dyn CommandRunner,
}

impl<'a> SystemGit<'a> {
  pub fn new(repo_path: &Path, runner: &'a dyn CommandRunner) -> Self {
    Self {
      repo_path: repo_path.to_path_buf(),
      runner,
    }
  }

  /// `git --version` output, e.g. "git version 2.47.0"
  pub fn version(&self) -> ShipResult<String> {
    let outcome = self.run(&["--version"])?;
    Ok(outcome.stdout.trim().to_string())
  }

  /// Check whether a tag with exactly this name exists locally
  pub fn tag_exists(&self, tag: &str) -> ShipResult<bool> {
    let outcome = self.run(&["tag", "-l", tag])?;
    Ok(outcome.stdout.lines().any(|line| line.trim() == tag))
  }

  /// Create an annotated tag at HEAD
  pub fn create_annotated_tag(&self, tag: &str, message: &str) -> ShipResult<()> {
    self.run(&["tag", "-a", tag, "-m", message])?;
    Ok(())
  }

  /// Push a single tag to a remote
  pub fn push_tag(&self, remote: &str, tag: &str) -> ShipResult<()> {
    let inv = self.git_cmd(&["push", remote, tag]);
    let outcome = self.runner.run(&inv)?;

    if !outcome.success() {
      return Err(ShipError::Git(GitError::PushFailed {
        remote: remote.to_string(),
        tag: tag.to_string(),
        reason: describe_failure(&outcome),
      }));
    }

    Ok(())
  }

  fn run(&self, args: &[&str]) -> ShipResult<Outcome> {
    let inv = self.git_cmd(args);
    let outcome = self.runner.run(&inv)?;

    if !outcome.success() {
      return Err(ShipError::Git(GitError::CommandFailed {
        command: inv.display(),
        code: outcome.code,
        stderr: outcome.stderr,
      }));
    }

    Ok(outcome)
  }

  /// Build a git invocation rooted at the repository
  ///
  /// - Runs with `-C <repo>` instead of relying on our working directory
  /// - Captures output so failures can be reported with git's own message
  /// - Adds configuration overrides that keep output machine-readable
  pub(crate) fn git_cmd(&self, args: &[&str]) -> Invocation {
    Invocation::new("git")
      .arg("-C")
      .arg(self.repo_path.to_string_lossy())
      .args(["-c", "core.quotePath=false"])
      .args(args.iter().copied())
      .captured()
  }
}

fn describe_failure(outcome: &Outcome) -> String {
  let stderr = outcome.stderr.trim();
  match (stderr.is_empty(), outcome.code) {
    (false, _) => stderr.to_string(),
    (true, Some(code)) => format!("exit code {}", code),
    (true, None) => "terminated by signal".to_string(),
  }
}
