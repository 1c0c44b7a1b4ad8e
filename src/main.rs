mod commands;
mod core;
mod dotnet;
mod release;
mod ui;
mod utils;

use clap::{Parser, Subcommand, ValueEnum};
use core::context::ProjectContext;
use core::error::{ShipError, ShipResult, print_error};
use core::exec::{CommandRunner, PrintRunner, SystemRunner};
use core::platform::{Configuration, Platform};
use std::path::PathBuf;

/// Build, package, tag and run the Barrow Weather desktop app
#[derive(Parser)]
#[command(name = "barrow-dev")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
#[command(styles = get_styles())]
struct Cli {
  /// Project root (defaults to the current directory)
  #[arg(long, global = true, default_value = ".")]
  root: PathBuf,

  #[command(subcommand)]
  command: Commands,
}

#[derive(Subcommand)]
enum Commands {
  /// Check the .NET SDK, git and project layout
  Doctor {
    /// Output results in JSON format
    #[arg(long)]
    json: bool,
  },

  /// Build, publish and package for one or all platforms
  Build {
    /// x64, x86, ARM64 or all (default: platforms from barrow.toml, all of them unless configured)
    #[arg(long)]
    platform: Option<String>,
    /// Skip MSIX package creation
    #[arg(long)]
    skip_msix: bool,
    /// Release output directory (default: release)
    #[arg(long)]
    output_dir: Option<PathBuf>,
    /// Build configuration
    #[arg(long, value_enum, default_value_t = ConfigurationArg::Release)]
    configuration: ConfigurationArg,
    /// Build platforms concurrently
    #[arg(long)]
    parallel: bool,
    /// Print the dotnet commands without running them
    #[arg(long)]
    dry_run: bool,
    /// Output the build summary in JSON format
    #[arg(long)]
    json: bool,
  },

  /// Update the changelog, create a git tag and push it
  #[command(disable_version_flag = true)]
  Release {
    /// Release this version instead of the one in VERSION (written back to VERSION)
    #[arg(long)]
    version: Option<String>,
    /// Create the tag locally without pushing
    #[arg(long)]
    no_push: bool,
    /// Leave CHANGELOG.md untouched
    #[arg(long)]
    skip_changelog: bool,
    /// Remote to push the tag to (default: release.remote from barrow.toml)
    #[arg(long)]
    remote: Option<String>,
    /// Print the git commands without running them
    #[arg(long)]
    dry_run: bool,
  },

  /// Build and launch the app locally
  Run {
    /// Target platform
    #[arg(long, default_value = "x64", value_parser = parse_platform)]
    platform: Platform,
    /// Use the Release configuration instead of Debug
    #[arg(long)]
    release: bool,
    /// Launch the last build without building first
    #[arg(long)]
    no_build: bool,
    /// Arguments passed to the application
    #[arg(last = true)]
    app_args: Vec<String>,
  },

  /// Show the product version, or set it with --set
  Version {
    /// Write this version to VERSION and the app manifest
    #[arg(long)]
    set: Option<String>,
  },
}

#[derive(Clone, Copy, ValueEnum)]
enum ConfigurationArg {
  #[value(name = "Debug", alias = "debug")]
  Debug,
  #[value(name = "Release", alias = "release")]
  Release,
}

impl From<ConfigurationArg> for Configuration {
  fn from(arg: ConfigurationArg) -> Self {
    match arg {
      ConfigurationArg::Debug => Configuration::Debug,
      ConfigurationArg::Release => Configuration::Release,
    }
  }
}

fn parse_platform(value: &str) -> Result<Platform, String> {
  value.parse::<Platform>().map_err(|e| e.to_string())
}

/// `--platform` for build: one platform, `all`, or the configured set
fn build_platforms(ctx: &ProjectContext, requested: Option<&str>) -> ShipResult<Vec<Platform>> {
  match requested {
    None => ctx.config.build.platforms(),
    Some(all) if all.eq_ignore_ascii_case("all") => Ok(Platform::ALL.to_vec()),
    Some(name) => Ok(vec![name.parse::<Platform>()?]),
  }
}

fn runner_for(dry_run: bool) -> &'static dyn CommandRunner {
  if dry_run { &PrintRunner } else { &SystemRunner }
}

fn get_styles() -> clap::builder::Styles {
  clap::builder::Styles::styled()
    .usage(
      anstyle::Style::new()
        .bold()
        .underline()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Yellow))),
    )
    .header(
      anstyle::Style::new()
        .bold()
        .underline()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Yellow))),
    )
    .literal(anstyle::Style::new().fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Green))))
    .invalid(
      anstyle::Style::new()
        .bold()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Red))),
    )
    .error(
      anstyle::Style::new()
        .bold()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Red))),
    )
    .valid(
      anstyle::Style::new()
        .bold()
        .underline()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Green))),
    )
    .placeholder(anstyle::Style::new().fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::White))))
}

fn dispatch(cli: Cli) -> ShipResult<u8> {
  // Resolve root and barrow.toml once; every command works from this context
  let ctx = ProjectContext::build(&cli.root)?;

  match cli.command {
    Commands::Doctor { json } => commands::run_doctor(&ctx, &SystemRunner, json),

    Commands::Build {
      platform,
      skip_msix,
      output_dir,
      configuration,
      parallel,
      dry_run,
      json,
    } => {
      let opts = commands::BuildOptions {
        platforms: build_platforms(&ctx, platform.as_deref())?,
        configuration: configuration.into(),
        skip_package: skip_msix,
        output_dir: ctx.output_dir(output_dir.as_deref()),
        parallel,
        json,
      };
      commands::run_build(&ctx, runner_for(dry_run), &opts)
    }

    Commands::Release {
      version,
      no_push,
      skip_changelog,
      remote,
      dry_run,
    } => {
      let opts = commands::ReleaseOptions {
        version,
        no_push,
        skip_changelog,
        remote,
      };
      commands::run_release(&ctx, runner_for(dry_run), &opts)
    }

    Commands::Run {
      platform,
      release,
      no_build,
      app_args,
    } => {
      let opts = commands::RunOptions {
        platform,
        configuration: if release {
          Configuration::Release
        } else {
          Configuration::Debug
        },
        no_build,
        app_args,
      };
      commands::run_launch(&ctx, &SystemRunner, &opts)
    }

    Commands::Version { set } => commands::run_version(&ctx, set.as_deref()),
  }
}

fn main() -> std::process::ExitCode {
  let cli = Cli::parse();

  match dispatch(cli) {
    Ok(status) => std::process::ExitCode::from(status),
    Err(err) => handle_error(err),
  }
}

fn handle_error(err: ShipError) -> std::process::ExitCode {
  print_error(&err);
  std::process::ExitCode::from(err.exit_code().as_u8())
}

#[cfg(test)]
mod tests {
  use super::*;
  use clap::CommandFactory;

  #[test]
  fn test_cli_definition_is_valid() {
    Cli::command().debug_assert();
  }

  #[test]
  fn test_release_accepts_version_override() {
    let cli = Cli::try_parse_from(["barrow-dev", "release", "--version", "0.4.0", "--no-push"]).unwrap();
    match cli.command {
      Commands::Release { version, no_push, .. } => {
        assert_eq!(version.as_deref(), Some("0.4.0"));
        assert!(no_push);
      }
      _ => panic!("expected release"),
    }
  }

  #[test]
  fn test_top_level_version_flag_still_works() {
    let err = Cli::try_parse_from(["barrow-dev", "--version"]).err().unwrap();
    assert_eq!(err.kind(), clap::error::ErrorKind::DisplayVersion);
  }
}
