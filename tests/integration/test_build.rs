//! Integration tests for `barrow-dev build` (fake dotnet)

use crate::helpers::{TestProject, run_barrow_dev, run_barrow_dev_env, stderr_of, stdout_of};
use anyhow::Result;

#[test]
fn test_build_all_platforms() -> Result<()> {
  let project = TestProject::new()?.with_fake_dotnet()?;

  let output = run_barrow_dev(&project.path, &["build"])?;
  assert!(output.status.success(), "stderr: {}", stderr_of(&output));

  let stdout = stdout_of(&output);
  assert!(stdout.contains("Found .NET SDK version: 8.0.403"));
  assert!(stdout.contains("Platforms built: 3/3"));
  assert!(stdout.contains("BarrowWeather_0.3.0.0_ARM64.msix"));

  for platform in ["x64", "x86", "ARM64"] {
    assert!(project.file_exists(&format!("release/{}/BarrowWeather.exe", platform)));
  }

  let manifest = project.read_file("src/BarrowWeather/Package.appxmanifest")?;
  assert!(manifest.contains(r#"Version="0.3.0.0""#));

  let calls = project.dotnet_calls()?;
  assert!(calls.iter().any(|c| c.contains("-p:RuntimeIdentifier=win-arm64")));
  Ok(())
}

#[test]
fn test_build_failure_abandons_only_that_platform() -> Result<()> {
  let project = TestProject::new()?.with_fake_dotnet()?;

  let output = run_barrow_dev_env(&project.path, &["build", "--skip-msix"], &[("BARROW_FAKE_FAIL", "x86")])?;
  assert_eq!(output.status.code(), Some(1));
  assert!(stdout_of(&output).contains("Platforms built: 2/3"));

  let calls = project.dotnet_calls()?;
  assert!(!calls.iter().any(|c| c.starts_with("publish") && c.contains("-p:Platform=x86")));
  assert!(calls.iter().any(|c| c.starts_with("publish") && c.contains("-p:Platform=ARM64")));
  assert!(!project.file_exists("release/x86"));
  Ok(())
}

#[test]
fn test_build_single_platform_skip_msix() -> Result<()> {
  let project = TestProject::new()?.with_fake_dotnet()?;

  let output = run_barrow_dev(&project.path, &["build", "--platform", "arm64", "--skip-msix"])?;
  assert!(output.status.success(), "stderr: {}", stderr_of(&output));
  assert!(stdout_of(&output).contains("Platforms built: 1/1"));

  let calls = project.dotnet_calls()?;
  assert!(!calls.iter().any(|c| c.contains("AppxPackageName")));
  assert!(project.file_exists("release/ARM64/BarrowWeather.exe"));
  Ok(())
}

#[test]
fn test_build_json_summary() -> Result<()> {
  let project = TestProject::new()?.with_fake_dotnet()?;

  let output = run_barrow_dev(&project.path, &["build", "--json", "--output-dir", "dist"])?;
  assert!(output.status.success(), "stderr: {}", stderr_of(&output));

  let summary: serde_json::Value = serde_json::from_str(&stdout_of(&output))?;
  assert_eq!(summary["requested"], 3);
  assert_eq!(summary["succeeded"], 3);
  assert_eq!(summary["version"], "0.3.0");
  assert_eq!(summary["targets"][2]["platform"], "ARM64");
  assert!(summary["targets"][0]["package"]["size_bytes"].as_u64().is_some());
  assert!(project.file_exists("dist/x64/BarrowWeather.exe"));
  Ok(())
}

#[test]
fn test_build_parallel() -> Result<()> {
  let project = TestProject::new()?.with_fake_dotnet()?;

  let output = run_barrow_dev(&project.path, &["build", "--parallel", "--skip-msix"])?;
  assert!(output.status.success(), "stderr: {}", stderr_of(&output));
  assert!(stdout_of(&output).contains("Platforms built: 3/3"));
  assert_eq!(
    project.dotnet_calls()?.iter().filter(|c| c.starts_with("publish")).count(),
    3
  );
  Ok(())
}

#[test]
fn test_build_dry_run_runs_nothing() -> Result<()> {
  let project = TestProject::new()?.with_fake_dotnet()?;
  let manifest = project.read_file("src/BarrowWeather/Package.appxmanifest")?;

  let output = run_barrow_dev(&project.path, &["build", "--dry-run"])?;
  assert!(output.status.success(), "stderr: {}", stderr_of(&output));

  assert!(stdout_of(&output).contains("$ "));
  assert!(project.dotnet_calls()?.is_empty());
  assert_eq!(project.read_file("src/BarrowWeather/Package.appxmanifest")?, manifest);
  assert!(!project.file_exists("release"));
  Ok(())
}

#[test]
fn test_build_missing_project_file_is_fatal() -> Result<()> {
  let project = TestProject::new()?.with_fake_dotnet()?;
  std::fs::remove_file(project.path.join("src/BarrowWeather/BarrowWeather.csproj"))?;

  let output = run_barrow_dev(&project.path, &["build"])?;
  assert_eq!(output.status.code(), Some(1));
  assert!(stderr_of(&output).contains("Project file not found"));
  assert!(!project.dotnet_calls()?.iter().any(|c| c.starts_with("build")));
  Ok(())
}

#[test]
fn test_build_without_sdk_exits_one() -> Result<()> {
  let project = TestProject::new()?;
  std::fs::write(
    project.path.join("barrow.toml"),
    "[toolchain]\nprogram = \"barrow-dev-no-such-dotnet\"\n",
  )?;

  let output = run_barrow_dev(&project.path, &["build"])?;
  assert_eq!(output.status.code(), Some(1));
  assert!(stdout_of(&output).contains(".NET SDK not found"));
  assert!(!project.file_exists("release"));
  Ok(())
}
