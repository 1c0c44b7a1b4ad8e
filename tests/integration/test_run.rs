//! Integration tests for `barrow-dev run` (fake dotnet)

use crate::helpers::{TestProject, run_barrow_dev, run_barrow_dev_env, stderr_of, stdout_of};
use anyhow::Result;

#[test]
fn test_run_falls_back_to_dotnet_run() -> Result<()> {
  let project = TestProject::new()?.with_fake_dotnet()?;

  let output = run_barrow_dev(&project.path, &["run", "--", "--city", "Utqiagvik"])?;
  assert!(output.status.success(), "stderr: {}", stderr_of(&output));

  let calls = project.dotnet_calls()?;
  assert!(calls.iter().any(|c| c.starts_with("build") && c.contains("-c Debug")));
  assert!(
    calls
      .iter()
      .any(|c| c.starts_with("run --project") && c.ends_with("-- --city Utqiagvik"))
  );
  Ok(())
}

#[test]
fn test_run_normalizes_exit_code() -> Result<()> {
  let project = TestProject::new()?.with_fake_dotnet()?;

  let output = run_barrow_dev_env(&project.path, &["run", "--no-build"], &[("BARROW_FAKE_APP_EXIT", "3")])?;
  assert_eq!(output.status.code(), Some(3));
  assert!(stdout_of(&output).contains("Application exited with code 3 (0x3)"));
  assert!(!project.dotnet_calls()?.iter().any(|c| c.starts_with("build")));
  Ok(())
}

#[test]
fn test_run_uses_built_assembly() -> Result<()> {
  let project = TestProject::new()?.with_fake_dotnet()?;
  let bin = project
    .path
    .join("src/BarrowWeather/bin/x86/Release/net8.0-windows10.0.19041.0");
  std::fs::create_dir_all(&bin)?;
  std::fs::write(bin.join("BarrowWeather.dll"), b"")?;

  let output = run_barrow_dev(&project.path, &["run", "--platform", "x86", "--release", "--no-build"])?;
  assert!(output.status.success(), "stderr: {}", stderr_of(&output));

  let calls = project.dotnet_calls()?;
  assert!(calls.iter().any(|c| c.ends_with("BarrowWeather.dll")));
  assert!(!calls.iter().any(|c| c.starts_with("run")));
  Ok(())
}

#[test]
fn test_run_build_failure_exits_one() -> Result<()> {
  let project = TestProject::new()?.with_fake_dotnet()?;

  let output = run_barrow_dev_env(&project.path, &["run"], &[("BARROW_FAKE_FAIL", "x64")])?;
  assert_eq!(output.status.code(), Some(1));
  assert!(!project.dotnet_calls()?.iter().any(|c| c.starts_with("run")));
  Ok(())
}
