//! Integration tests for `barrow-dev release`

use crate::helpers::{TestProject, run_barrow_dev, stderr_of, stdout_of, tags_in};
use anyhow::Result;

#[test]
fn test_release_tags_and_pushes() -> Result<()> {
  let project = TestProject::new()?;
  let remote = project.add_bare_remote()?;

  let output = run_barrow_dev(&project.path, &["release"])?;
  assert!(output.status.success(), "stderr: {}", stderr_of(&output));

  assert_eq!(project.tags()?, vec!["v0.3.0"]);
  assert_eq!(tags_in(&remote)?, vec!["v0.3.0"]);

  let changelog = project.read_file("CHANGELOG.md")?;
  assert!(changelog.contains("## [Unreleased]\n\n## [0.3.0] - "));
  assert!(changelog.contains("- Snow depth readings"));

  let stdout = stdout_of(&output);
  assert!(stdout.contains("Using version from VERSION file: 0.3.0"));
  assert!(stdout.contains("Creating git tag: v0.3.0"));
  Ok(())
}

#[test]
fn test_release_override_version_no_push() -> Result<()> {
  let project = TestProject::new()?;

  let output = run_barrow_dev(&project.path, &["release", "--version", "0.4.0", "--no-push"])?;
  assert!(output.status.success(), "stderr: {}", stderr_of(&output));

  assert_eq!(project.read_file("VERSION")?, "0.4.0\n");
  assert_eq!(project.tags()?, vec!["v0.4.0"]);
  assert!(stdout_of(&output).contains("Tag created locally. Push with: git push origin v0.4.0"));
  Ok(())
}

#[test]
fn test_release_refuses_existing_tag() -> Result<()> {
  let project = TestProject::new()?;
  crate::helpers::git(&project.path, &["tag", "-a", "v0.3.0", "-m", "earlier"])?;

  let output = run_barrow_dev(&project.path, &["release", "--no-push", "--skip-changelog"])?;
  assert_eq!(output.status.code(), Some(1));
  assert!(stderr_of(&output).contains("Tag v0.3.0 already exists"));

  let message = crate::helpers::git(&project.path, &["tag", "-l", "-n1", "v0.3.0"])?;
  assert!(String::from_utf8_lossy(&message.stdout).contains("earlier"));
  Ok(())
}

#[test]
fn test_release_push_without_remote_fails() -> Result<()> {
  let project = TestProject::new()?;

  let output = run_barrow_dev(&project.path, &["release"])?;
  assert_eq!(output.status.code(), Some(1));

  // No rollback: the local tag stays
  assert_eq!(project.tags()?, vec!["v0.3.0"]);
  Ok(())
}

#[test]
fn test_release_rejects_malformed_version() -> Result<()> {
  let project = TestProject::new()?;

  let output = run_barrow_dev(&project.path, &["release", "--version", "1.0-beta", "--no-push"])?;
  assert_eq!(output.status.code(), Some(1));
  assert_eq!(project.read_file("VERSION")?, "0.3.0\n");
  assert!(project.tags()?.is_empty());
  Ok(())
}

#[test]
fn test_release_dry_run_changes_nothing() -> Result<()> {
  let project = TestProject::new()?;
  let changelog = project.read_file("CHANGELOG.md")?;

  let output = run_barrow_dev(&project.path, &["release", "--version", "0.9.0", "--dry-run"])?;
  assert!(output.status.success(), "stderr: {}", stderr_of(&output));

  assert!(stdout_of(&output).contains("$ git"));
  assert_eq!(project.read_file("VERSION")?, "0.3.0\n");
  assert_eq!(project.read_file("CHANGELOG.md")?, changelog);
  assert!(project.tags()?.is_empty());
  Ok(())
}

#[test]
fn test_release_help_lists_version_override() -> Result<()> {
  let project = TestProject::new()?;
  let output = run_barrow_dev(&project.path, &["release", "--help"])?;

  assert!(output.status.success(), "stderr: {}", stderr_of(&output));
  assert!(stdout_of(&output).contains("--version <VERSION>"));
  Ok(())
}
