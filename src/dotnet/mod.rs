//! .NET toolchain integration
//!
//! - **args**: argument lists for build/publish/package/run
//! - [`Dotnet`]: runs those verbs for the configured project through a [`CommandRunner`]

pub mod args;

use crate::core::context::ProjectContext;
use crate::core::error::{ShipError, ShipResult, ToolError};
use crate::core::exec::{CommandRunner, Invocation, Outcome};
use crate::core::platform::{Configuration, Platform};
use crate::ui::Console;
use crate::utils::path_arg;
use std::path::Path;

/// Handle on the dotnet CLI for one project
pub struct Dotnet<'a> {
  ctx: &'a ProjectContext,
  runner: &'a dyn CommandRunner,
  /// Capture tool output instead of streaming it (parallel builds)
  capture: bool,
}

impl<'a> Dotnet<'a> {
  pub fn new(ctx: &'a ProjectContext, runner: &'a dyn CommandRunner) -> Self {
    Self {
      ctx,
      runner,
      capture: false,
    }
  }

  pub fn captured(mut self, capture: bool) -> Self {
    self.capture = capture;
    self
  }

  /// False for dry runs
  pub fn executes(&self) -> bool {
    self.runner.executes()
  }

  /// `dotnet --version`, bounded by the configured timeout
  ///
  /// A missing program or a non-zero exit both surface as [`ToolError`].
  pub fn sdk_version(&self) -> ShipResult<String> {
    let inv = self.invocation(["--version"]).captured();
    let outcome = self.runner.run(&inv)?;
    if !outcome.success() {
      return Err(ShipError::Tool(ToolError::CommandFailed {
        command: inv.display(),
        code: outcome.code,
      }));
    }
    Ok(outcome.stdout.trim().to_string())
  }

  pub fn build(&self, platform: Platform, configuration: Configuration) -> ShipResult<Outcome> {
    let project = self.ctx.project_file();
    self.run(self.invocation(args::build(&project, platform, configuration)))
  }

  pub fn publish(&self, platform: Platform, configuration: Configuration, output_dir: &Path) -> ShipResult<Outcome> {
    let project = self.ctx.project_file();
    let prefix = &self.ctx.config.toolchain.runtime_prefix;
    self.run(self.invocation(args::publish(&project, platform, configuration, prefix, output_dir)))
  }

  pub fn package(&self, platform: Platform, package_version: &str, package_dir: &Path) -> ShipResult<Outcome> {
    let project = self.ctx.project_file();
    let prefix = &self.ctx.config.toolchain.runtime_prefix;
    let name = &self.ctx.config.project.name;
    self.run(self.invocation(args::package(
      &project,
      platform,
      prefix,
      name,
      package_version,
      package_dir,
    )))
  }

  /// `dotnet run --project ...`
  pub fn run_project(&self, platform: Platform, configuration: Configuration, app_args: &[String]) -> ShipResult<Outcome> {
    let project = self.ctx.project_file();
    self.run(self.launch_invocation(args::run_project(&project, platform, configuration, app_args)))
  }

  /// `dotnet <assembly.dll> [app args]`
  pub fn run_assembly(&self, assembly: &Path, app_args: &[String]) -> ShipResult<Outcome> {
    let inv = self
      .launch_invocation([path_arg(assembly)])
      .args(app_args.iter().cloned());
    self.run(inv)
  }

  /// The app runs until it exits; no toolchain timeout
  fn launch_invocation<I, S>(&self, args: I) -> Invocation
  where
    I: IntoIterator<Item = S>,
    S: Into<String>,
  {
    let mut inv = self.invocation(args);
    inv.timeout = None;
    inv
  }

  fn invocation<I, S>(&self, args: I) -> Invocation
  where
    I: IntoIterator<Item = S>,
    S: Into<String>,
  {
    Invocation::new(self.ctx.config.toolchain.program.clone())
      .args(args)
      .cwd(&self.ctx.root)
      .timeout_secs(self.ctx.config.toolchain.timeout_secs)
  }

  fn run(&self, mut inv: Invocation) -> ShipResult<Outcome> {
    inv.capture = self.capture;
    if !self.capture && self.runner.executes() {
      println!("   Executing: {}", inv.display());
    }
    self.runner.run(&inv)
  }
}

/// Prerequisite check: is the toolchain callable?
///
/// Prints the SDK version on success or a diagnostic on failure. Never retries.
pub fn check_toolchain(ctx: &ProjectContext, runner: &dyn CommandRunner, console: &Console) -> bool {
  match Dotnet::new(ctx, runner).sdk_version() {
    Ok(version) => {
      console.line(format!("✅ Found .NET SDK version: {}", version));
      true
    }
    Err(e) => {
      console.fail(".NET SDK not found. Please install .NET 8 SDK from:");
      console.fail(format!("   https://dotnet.microsoft.com/download/dotnet/8.0 ({})", e));
      false
    }
  }
}
