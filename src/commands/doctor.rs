//! `barrow-dev doctor` - prerequisite and layout checks
//!
//! The .NET SDK and the project file are required; git and the release files are
//! reported but only warn when missing.

use crate::core::context::ProjectContext;
use crate::core::error::{ExitCode, ShipResult};
use crate::core::exec::CommandRunner;
use crate::core::vcs::SystemGit;
use crate::dotnet::Dotnet;
use crate::release::read_version;
use crate::utils::display_relative;
use serde::Serialize;
use std::path::Path;

#[derive(Debug, Clone, Serialize)]
pub struct Check {
  pub name: String,
  pub ok: bool,
  /// Failing this check fails the command
  pub required: bool,
  pub detail: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct DoctorReport {
  pub root: String,
  pub version: String,
  pub checks: Vec<Check>,
}

impl DoctorReport {
  pub fn healthy(&self) -> bool {
    self.checks.iter().all(|c| c.ok || !c.required)
  }
}

/// Gather every check without printing
pub fn diagnose(ctx: &ProjectContext, runner: &dyn CommandRunner) -> DoctorReport {
  let mut checks = Vec::new();

  checks.push(match Dotnet::new(ctx, runner).sdk_version() {
    Ok(version) => check(".NET SDK", true, true, version),
    Err(e) => check(".NET SDK", false, true, e.to_string()),
  });

  checks.push(match SystemGit::new(&ctx.root, runner).version() {
    Ok(version) => check("git", true, false, version),
    Err(e) => check("git", false, false, e.to_string()),
  });

  checks.push(file_check(ctx, "project file", &ctx.project_file(), true));
  checks.push(file_check(ctx, "manifest", &ctx.manifest_path(), false));
  checks.push(file_check(ctx, "version file", &ctx.version_file(), false));
  checks.push(file_check(ctx, "changelog", &ctx.changelog_path(), false));

  DoctorReport {
    root: ctx.root.display().to_string(),
    version: read_version(ctx).to_string(),
    checks,
  }
}

/// Run the doctor command; returns the process exit status
pub fn run_doctor(ctx: &ProjectContext, runner: &dyn CommandRunner, json: bool) -> ShipResult<u8> {
  let report = diagnose(ctx, runner);

  if json {
    println!("{}", serde_json::to_string_pretty(&report)?);
  } else {
    println!("🩺 barrow-dev doctor ({})\n", report.root);
    for c in &report.checks {
      let icon = match (c.ok, c.required) {
        (true, _) => "✅",
        (false, true) => "❌",
        (false, false) => "⚠️ ",
      };
      println!("  {} {:<14} {}", icon, c.name, c.detail);
    }
    println!("\n  Current version: {}", report.version);
  }

  Ok(if report.healthy() {
    0
  } else {
    ExitCode::Failure.as_u8()
  })
}

fn check(name: &str, ok: bool, required: bool, detail: String) -> Check {
  Check {
    name: name.to_string(),
    ok,
    required,
    detail,
  }
}

fn file_check(ctx: &ProjectContext, name: &str, path: &Path, required: bool) -> Check {
  let shown = display_relative(&ctx.root, path);
  if path.exists() {
    check(name, true, required, shown)
  } else {
    check(name, false, required, format!("{} not found", shown))
  }
}
