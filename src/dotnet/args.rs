//! Argument lists for dotnet CLI verbs
//!
//! Pure functions so the exact command lines can be asserted in tests.

use crate::core::platform::{Configuration, Platform};
use crate::utils::path_arg;
use std::path::Path;

/// `dotnet build <project> -p:Platform=.. -c .. -p:Configuration=..`
pub fn build(project: &Path, platform: Platform, configuration: Configuration) -> Vec<String> {
  vec![
    "build".to_string(),
    path_arg(project),
    format!("-p:Platform={}", platform),
    "-c".to_string(),
    configuration.to_string(),
    format!("-p:Configuration={}", configuration),
  ]
}

/// Self-contained `dotnet publish` into a per-platform directory
pub fn publish(
  project: &Path,
  platform: Platform,
  configuration: Configuration,
  runtime_prefix: &str,
  output_dir: &Path,
) -> Vec<String> {
  vec![
    "publish".to_string(),
    path_arg(project),
    format!("-p:Platform={}", platform),
    "-c".to_string(),
    configuration.to_string(),
    format!("-p:Configuration={}", configuration),
    format!("-p:RuntimeIdentifier={}", platform.runtime_identifier(runtime_prefix)),
    "-p:SelfContained=true".to_string(),
    "-p:PublishSingleFile=false".to_string(),
    "-p:IncludeNativeLibrariesForSelfExtract=true".to_string(),
    "-o".to_string(),
    path_arg(output_dir),
  ]
}

/// MSIX packaging publish; the package lands in `package_dir`
pub fn package(
  project: &Path,
  platform: Platform,
  runtime_prefix: &str,
  package_name: &str,
  package_version: &str,
  package_dir: &Path,
) -> Vec<String> {
  vec![
    "publish".to_string(),
    path_arg(project),
    format!("-p:Platform={}", platform),
    "-c".to_string(),
    Configuration::Release.to_string(),
    format!("-p:RuntimeIdentifier={}", platform.runtime_identifier(runtime_prefix)),
    "-p:SelfContained=true".to_string(),
    format!("-p:AppxPackageOutputDir={}", path_arg(package_dir)),
    format!("-p:AppxPackageName={}", package_name),
    format!("-p:AppxPackageVersion={}", package_version),
  ]
}

/// `dotnet run --project <project> -p:Platform=.. -c .. [-- app args]`
pub fn run_project(project: &Path, platform: Platform, configuration: Configuration, app_args: &[String]) -> Vec<String> {
  let mut args = vec![
    "run".to_string(),
    "--project".to_string(),
    path_arg(project),
    format!("-p:Platform={}", platform),
    "-c".to_string(),
    configuration.to_string(),
  ];
  if !app_args.is_empty() {
    args.push("--".to_string());
    args.extend(app_args.iter().cloned());
  }
  args
}
