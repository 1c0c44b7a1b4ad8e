//! `barrow-dev run` - build and launch the app locally
//!
//! The launcher prefers the built executable, then the managed assembly through
//! `dotnet <dll>`, and finally `dotnet run --project`. The app's exit code is
//! passed through, truncated to the 8 bits a shell can see.

use crate::core::context::ProjectContext;
use crate::core::error::{ExitCode, ShipResult};
use crate::core::exec::{CommandRunner, Invocation, Outcome, install_interrupt_handler};
use crate::core::platform::{Configuration, Platform};
use crate::dotnet::{Dotnet, check_toolchain};
use crate::ui::Console;
use crate::utils::{display_relative, path_arg};
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct RunOptions {
  pub platform: Platform,
  pub configuration: Configuration,
  pub no_build: bool,
  /// Passed to the application after `--`
  pub app_args: Vec<String>,
}

/// What the probe found in the build output
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Launch {
  Executable(PathBuf),
  Assembly(PathBuf),
  /// Nothing built yet; let `dotnet run` build and launch
  Project,
}

/// Exe then dll under `bin/<platform>/<configuration>/<tfm>/`
pub fn candidate_paths(ctx: &ProjectContext, platform: Platform, configuration: Configuration) -> [PathBuf; 2] {
  let project = &ctx.config.project;
  let dir = ctx
    .resolve(&project.project_dir())
    .join("bin")
    .join(platform.as_str())
    .join(configuration.as_str())
    .join(&project.target_framework);
  [
    dir.join(format!("{}.exe", project.name)),
    dir.join(format!("{}.dll", project.name)),
  ]
}

/// First existing candidate decides how to launch
pub fn probe(ctx: &ProjectContext, platform: Platform, configuration: Configuration) -> Launch {
  let [exe, dll] = candidate_paths(ctx, platform, configuration);
  if exe.exists() {
    Launch::Executable(exe)
  } else if dll.exists() {
    Launch::Assembly(dll)
  } else {
    Launch::Project
  }
}

/// Recover the native status for display and the shell-visible low byte.
///
/// Windows reports NTSTATUS values such as `0xC0000005` as large unsigned
/// numbers; those are reinterpreted as signed 32-bit.
pub fn normalize_exit_code(code: i64) -> (i64, u8) {
  let signed = if code > 0x7FFF_FFFF { code - (1_i64 << 32) } else { code };
  (signed, (signed & 0xFF) as u8)
}

/// Run the launcher; returns the process exit status
pub fn run_launch(ctx: &ProjectContext, runner: &dyn CommandRunner, opts: &RunOptions) -> ShipResult<u8> {
  let console = Console::default();

  if runner.executes() && !check_toolchain(ctx, runner, &console) {
    return Ok(ExitCode::Failure.as_u8());
  }

  ctx.require_project_file()?;
  let dotnet = Dotnet::new(ctx, runner);

  if !opts.no_build {
    console.line(format!("\n🔨 Building for {} ({})...", opts.platform, opts.configuration));
    let outcome = dotnet.build(opts.platform, opts.configuration)?;
    if outcome.interrupted {
      console.line("\nApplication interrupted by user");
      return Ok(ExitCode::Interrupted.as_u8());
    }
    if !outcome.success() {
      console.fail(format!("Build failed for {}", opts.platform));
      return Ok(ExitCode::Failure.as_u8());
    }
  }

  install_interrupt_handler()?;

  let outcome = match probe(ctx, opts.platform, opts.configuration) {
    Launch::Executable(exe) => {
      console.line(format!("\n🚀 Running {}", display_relative(&ctx.root, &exe)));
      let inv = Invocation::new(path_arg(&exe))
        .args(opts.app_args.iter().cloned())
        .cwd(&ctx.root);
      runner.run(&inv)?
    }
    Launch::Assembly(dll) => {
      console.line(format!("\n🚀 Running {}", display_relative(&ctx.root, &dll)));
      dotnet.run_assembly(&dll, &opts.app_args)?
    }
    Launch::Project => {
      console.line("\n🚀 No built binary found; using dotnet run");
      dotnet.run_project(opts.platform, opts.configuration, &opts.app_args)?
    }
  };

  Ok(report_exit(&console, &outcome))
}

fn exit_message(signed: i64) -> String {
  format!("Application exited with code {} (0x{:X})", signed, signed & 0xFFFF_FFFF)
}

fn report_exit(console: &Console, outcome: &Outcome) -> u8 {
  if outcome.interrupted {
    console.line("\nApplication interrupted by user");
    return ExitCode::Interrupted.as_u8();
  }

  match outcome.code {
    Some(0) => 0,
    Some(code) => {
      let (signed, status) = normalize_exit_code(code);
      console.line(format!("\n{}", exit_message(signed)));
      console.line("Note: Non-zero exit codes may indicate an application error.");
      status
    }
    None => {
      console.fail("Application was terminated by a signal");
      ExitCode::Failure.as_u8()
    }
  }
}
