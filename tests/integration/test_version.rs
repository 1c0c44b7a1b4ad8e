//! Integration tests for `barrow-dev version`

use crate::helpers::{TestProject, run_barrow_dev, stdout_of};
use anyhow::Result;

#[test]
fn test_version_prints_current() -> Result<()> {
  let project = TestProject::new()?;

  let output = run_barrow_dev(&project.path, &["version"])?;
  assert!(output.status.success());
  assert_eq!(stdout_of(&output).trim(), "0.3.0");
  Ok(())
}

#[test]
fn test_version_defaults_without_file() -> Result<()> {
  let project = TestProject::new()?;
  std::fs::remove_file(project.path.join("VERSION"))?;

  let output = run_barrow_dev(&project.path, &["version"])?;
  assert_eq!(stdout_of(&output).trim(), "0.1.0");
  Ok(())
}

#[test]
fn test_version_set_updates_manifest() -> Result<()> {
  let project = TestProject::new()?;

  let output = run_barrow_dev(&project.path, &["version", "--set", "1.4"])?;
  assert!(output.status.success());

  assert_eq!(project.read_file("VERSION")?, "1.4\n");
  let manifest = project.read_file("src/BarrowWeather/Package.appxmanifest")?;
  assert!(manifest.contains(r#"Publisher="CN=Barrow" Version="1.4.0.0""#));
  assert!(manifest.contains(r#"MinVersion="10.0.17763.0""#));
  Ok(())
}
