//! `barrow-dev build` - build, publish and package the app per platform
//!
//! For each requested platform, in order:
//! 1. `dotnet build`; a failure abandons the platform
//! 2. self-contained `dotnet publish` into `<output>/<platform>`; a failure abandons the platform
//! 3. MSIX packaging (unless `--skip-msix`), then locate the produced `.msix`
//!
//! A platform counts as built when steps 1 and 2 succeed. Packaging problems are
//! reported but never change the exit status: the Windows SDK is often missing on
//! build agents that can still compile the app.
//!
//! Supports:
//! - `--parallel` to run the per-platform pipelines on a rayon pool
//! - `--dry-run` to print the dotnet commands without running them
//! - `--json` for a machine-readable summary

use crate::core::context::ProjectContext;
use crate::core::error::{ExitCode, ResultExt, ShipError, ShipResult, ToolError};
use crate::core::exec::{CommandRunner, Outcome, install_interrupt_handler};
use crate::core::platform::{Configuration, Platform};
use crate::dotnet::{Dotnet, check_toolchain};
use crate::release::{ManifestUpdate, ProductVersion, read_version, update_manifest_version};
use crate::ui::Console;
use crate::ui::progress::TargetProgress;
use crate::utils::{display_relative, format_megabytes};
use rayon::prelude::*;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Options for one build run
#[derive(Debug, Clone)]
pub struct BuildOptions {
  pub platforms: Vec<Platform>,
  pub configuration: Configuration,
  pub skip_package: bool,
  /// Absolute release output directory
  pub output_dir: PathBuf,
  pub parallel: bool,
  pub json: bool,
}

/// An installer produced by the package step
#[derive(Debug, Clone, Serialize)]
pub struct Artifact {
  pub path: PathBuf,
  pub size_bytes: u64,
}

/// Outcome of one platform's pipeline
#[derive(Debug, Clone, Serialize)]
pub struct TargetResult {
  pub platform: Platform,
  pub built: bool,
  pub published: bool,
  pub package: Option<Artifact>,
  /// Why the pipeline stopped early, if it did
  #[serde(skip_serializing_if = "Option::is_none")]
  pub failure: Option<String>,
  /// Stopped by Ctrl+C
  #[serde(skip)]
  pub interrupted: bool,
}

impl TargetResult {
  fn new(platform: Platform) -> Self {
    Self {
      platform,
      built: false,
      published: false,
      package: None,
      failure: None,
      interrupted: false,
    }
  }

  fn failed(mut self, failure: StepFailure) -> Self {
    self.failure = Some(failure.reason);
    self.interrupted = failure.interrupted;
    self
  }

  /// Build and publish both succeeded
  pub fn succeeded(&self) -> bool {
    self.built && self.published
  }
}

#[derive(Debug, Clone, Serialize)]
pub struct BuildSummary {
  pub version: ProductVersion,
  pub configuration: Configuration,
  pub requested: usize,
  pub succeeded: usize,
  pub targets: Vec<TargetResult>,
}

impl BuildSummary {
  fn from_results(
    version: ProductVersion,
    configuration: Configuration,
    requested: usize,
    targets: Vec<TargetResult>,
  ) -> Self {
    Self {
      version,
      configuration,
      requested,
      succeeded: targets.iter().filter(|t| t.succeeded()).count(),
      targets,
    }
  }

  pub fn all_succeeded(&self) -> bool {
    self.succeeded == self.requested
  }

  pub fn artifacts(&self) -> impl Iterator<Item = &Artifact> {
    self.targets.iter().filter_map(|t| t.package.as_ref())
  }

  pub fn interrupted(&self) -> bool {
    self.targets.iter().any(|t| t.interrupted)
  }
}

/// Run the build command; returns the process exit status
pub fn run_build(ctx: &ProjectContext, runner: &dyn CommandRunner, opts: &BuildOptions) -> ShipResult<u8> {
  let console = Console::new(opts.json);

  if runner.executes() && !check_toolchain(ctx, runner, &console) {
    return Ok(ExitCode::Failure.as_u8());
  }

  ctx.require_project_file()?;

  let version = read_version(ctx);
  console.line(format!("\n🏷️  Building release version: {}", version));

  if runner.executes() {
    install_interrupt_handler()?;
    report_manifest_update(&console, ctx, update_manifest_version(ctx, &version)?, &version);
    fs::create_dir_all(&opts.output_dir)
      .with_context(|| format!("Failed to create {}", opts.output_dir.display()))?;
  } else {
    console.line(format!(
      "DRY RUN: would set Package.appxmanifest version to {}",
      version.manifest_form()
    ));
  }

  let summary = orchestrate(ctx, runner, opts, &version);

  if opts.json {
    println!("{}", serde_json::to_string_pretty(&summary)?);
  } else {
    print_summary(ctx, &summary);
  }

  if summary.interrupted() {
    return Err(ShipError::Tool(ToolError::Interrupted {
      command: "barrow-dev build".to_string(),
    }));
  }

  Ok(if summary.all_succeeded() {
    0
  } else {
    ExitCode::Failure.as_u8()
  })
}

/// Run every requested platform's pipeline and aggregate the results.
///
/// Results keep request order in both sequential and parallel mode. A sequential
/// run stops at the first interrupted target.
pub fn orchestrate(
  ctx: &ProjectContext,
  runner: &dyn CommandRunner,
  opts: &BuildOptions,
  version: &ProductVersion,
) -> BuildSummary {
  let quiet = opts.parallel || opts.json;
  let console = Console::new(quiet);
  let dotnet = Dotnet::new(ctx, runner).captured(quiet);

  let targets = if opts.parallel {
    let progress = (!opts.json).then(|| TargetProgress::new(opts.platforms.len(), "Platforms"));
    opts
      .platforms
      .par_iter()
      .map(|&platform| {
        let result = build_target(ctx, &dotnet, &console, opts, version, platform);
        if let Some(progress) = &progress {
          progress.inc();
        }
        result
      })
      .collect()
  } else {
    let mut targets = Vec::with_capacity(opts.platforms.len());
    for &platform in &opts.platforms {
      let result = build_target(ctx, &dotnet, &console, opts, version, platform);
      let stop = result.interrupted;
      targets.push(result);
      if stop {
        break;
      }
    }
    targets
  };

  BuildSummary::from_results(version.clone(), opts.configuration, opts.platforms.len(), targets)
}

/// build -> publish -> package for one platform
fn build_target(
  ctx: &ProjectContext,
  dotnet: &Dotnet<'_>,
  console: &Console,
  opts: &BuildOptions,
  version: &ProductVersion,
  platform: Platform,
) -> TargetResult {
  let mut result = TargetResult::new(platform);
  let configuration = opts.configuration;

  console.line(format!("\n🔨 Building for {} ({})...", platform, configuration));
  if let Err(failure) = step(console, dotnet.build(platform, configuration), || {
    format!("Build failed for {}", platform)
  }) {
    return result.failed(failure);
  }
  result.built = true;

  let publish_dir = platform.publish_dir(&opts.output_dir);
  console.line(format!(
    "\n📦 Publishing for {} ({}) to {}...",
    platform,
    configuration,
    display_relative(&ctx.root, &publish_dir)
  ));
  if let Err(failure) = step(console, dotnet.publish(platform, configuration, &publish_dir), || {
    format!("Publish failed for {}", platform)
  }) {
    return result.failed(failure);
  }
  result.published = true;

  if !opts.skip_package {
    result.package = package_target(ctx, dotnet, console, opts, version, platform);
  }

  if console.is_quiet() && !opts.json {
    println!("✅ {} built and published", platform);
  }

  result
}

/// Create the MSIX for one platform and find it on disk
fn package_target(
  ctx: &ProjectContext,
  dotnet: &Dotnet<'_>,
  console: &Console,
  opts: &BuildOptions,
  version: &ProductVersion,
  platform: Platform,
) -> Option<Artifact> {
  let publish_dir = platform.publish_dir(&opts.output_dir);
  if dotnet.executes() && !publish_dir.exists() {
    console.fail(format!("Publish directory not found at {}", publish_dir.display()));
    return None;
  }

  console.line(format!("\n📦 Creating MSIX package for {}...", platform));
  let outcome = dotnet.package(platform, &version.manifest_form(), &opts.output_dir);
  if step(console, outcome, || format!("MSIX creation failed for {}", platform)).is_err() {
    console.line("   Note: MSIX packaging requires Windows SDK and may need to be done on Windows.");
    return None;
  }

  if !dotnet.executes() {
    return None;
  }

  match find_package(&opts.output_dir, &ctx.config.project.name, platform) {
    Ok(Some(artifact)) => Some(artifact),
    Ok(None) => {
      console.warn(format!("MSIX file not found in {}", opts.output_dir.display()));
      None
    }
    Err(e) => {
      console.warn(format!("Could not search {} for MSIX files: {}", opts.output_dir.display(), e));
      None
    }
  }
}

struct StepFailure {
  reason: String,
  interrupted: bool,
}

/// Turn a step's outcome into Ok or a printed failure
fn step<F>(console: &Console, outcome: ShipResult<Outcome>, what: F) -> Result<(), StepFailure>
where
  F: FnOnce() -> String,
{
  let failure = match outcome {
    Ok(outcome) if outcome.success() => return Ok(()),
    Ok(outcome) => {
      let reason = match (outcome.interrupted, outcome.code) {
        (true, _) => format!("{} (interrupted)", what()),
        (false, Some(code)) => format!("{} with exit code {}", what(), code),
        (false, None) => format!("{} (terminated by signal)", what()),
      };
      print_captured_tail(&outcome);
      StepFailure {
        reason,
        interrupted: outcome.interrupted,
      }
    }
    Err(e) => StepFailure {
      reason: format!("{}: {}", what(), e),
      interrupted: false,
    },
  };

  console.fail(&failure.reason);
  Err(failure)
}

/// Show the end of captured tool output so a quiet failure is diagnosable
fn print_captured_tail(outcome: &Outcome) {
  const TAIL: usize = 20;
  let combined: Vec<&str> = outcome.stdout.lines().chain(outcome.stderr.lines()).collect();
  for line in &combined[combined.len().saturating_sub(TAIL)..] {
    eprintln!("   │ {}", line);
  }
}

/// First `<name>*<platform>*.msix` in the output directory (sorted by path)
pub fn find_package(output_dir: &Path, name: &str, platform: Platform) -> ShipResult<Option<Artifact>> {
  let pattern = format!(
    "{}/{}*{}*.msix",
    glob::Pattern::escape(&output_dir.to_string_lossy()),
    glob::Pattern::escape(name),
    glob::Pattern::escape(platform.as_str())
  );

  let mut matches: Vec<PathBuf> = glob::glob(&pattern)?.filter_map(Result::ok).collect();
  matches.sort();

  let Some(path) = matches.into_iter().next() else {
    return Ok(None);
  };
  let size_bytes = fs::metadata(&path)?.len();
  Ok(Some(Artifact { path, size_bytes }))
}

pub(crate) fn report_manifest_update(console: &Console, ctx: &ProjectContext, update: ManifestUpdate, version: &ProductVersion) {
  let manifest = ctx.manifest_path();
  match update {
    ManifestUpdate::Identity => console.line(format!(
      "📝 Updated Package.appxmanifest version to {}",
      version.manifest_form()
    )),
    ManifestUpdate::Fallback => {
      console.warn("No <Identity Version=\"...\"> element; updated the first Version attribute instead");
      console.line(format!(
        "📝 Updated Package.appxmanifest version to {}",
        version.manifest_form()
      ));
    }
    ManifestUpdate::Unchanged => console.warn(format!(
      "No Version attribute in {}; left unchanged",
      manifest.display()
    )),
    ManifestUpdate::Missing => console.warn(format!("Package.appxmanifest not found at {}", manifest.display())),
  }
}

fn print_summary(ctx: &ProjectContext, summary: &BuildSummary) {
  println!("\n{}", "=".repeat(60));
  println!("Build Summary:");
  println!("  Platforms built: {}/{}", summary.succeeded, summary.requested);

  for target in summary.targets.iter().filter(|t| !t.succeeded()) {
    if let Some(reason) = &target.failure {
      println!("    ❌ {}: {}", target.platform, reason);
    }
  }

  let artifacts: Vec<_> = summary.artifacts().collect();
  if !artifacts.is_empty() {
    println!("\n  MSIX packages created:");
    for artifact in artifacts {
      let name = artifact
        .path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| display_relative(&ctx.root, &artifact.path));
      println!("    - {} ({})", name, format_megabytes(artifact.size_bytes));
    }
  }
  println!("{}", "=".repeat(60));
}
