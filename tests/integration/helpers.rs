//! Test helpers for integration tests

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

/// Stand-in for the dotnet CLI.
///
/// Logs every invocation, answers `--version`, creates the publish directory and
/// an MSIX for packaging runs. `BARROW_FAKE_FAIL=<platform>` fails that
/// platform's build; `BARROW_FAKE_APP_EXIT=<n>` is the exit code of `dotnet run`.
const FAKE_DOTNET: &str = r#"#!/bin/sh
echo "$*" >> "$(dirname "$0")/dotnet.log"

platform=""
outdir=""
pkgdir=""
version="0.0.0.0"
prev=""
for arg in "$@"; do
  case "$arg" in
    -p:Platform=*) platform="${arg#-p:Platform=}" ;;
    -p:AppxPackageOutputDir=*) pkgdir="${arg#-p:AppxPackageOutputDir=}" ;;
    -p:AppxPackageVersion=*) version="${arg#-p:AppxPackageVersion=}" ;;
  esac
  if [ "$prev" = "-o" ]; then outdir="$arg"; fi
  prev="$arg"
done

case "$1" in
  --version)
    echo "8.0.403"
    ;;
  build)
    if [ -n "$BARROW_FAKE_FAIL" ] && [ "$BARROW_FAKE_FAIL" = "$platform" ]; then
      echo "error MSB4018: build failed" >&2
      exit 1
    fi
    ;;
  publish)
    if [ -n "$pkgdir" ]; then
      mkdir -p "$pkgdir"
      printf 'msix' > "$pkgdir/BarrowWeather_${version}_${platform}.msix"
    elif [ -n "$outdir" ]; then
      mkdir -p "$outdir"
      printf 'app' > "$outdir/BarrowWeather.exe"
    fi
    ;;
  run)
    exit "${BARROW_FAKE_APP_EXIT:-0}"
    ;;
esac
exit 0
"#;

const MANIFEST: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<Package xmlns="http://schemas.microsoft.com/appx/manifest/foundation/windows10">
  <Identity Name="BarrowWeather" Publisher="CN=Barrow" Version="0.1.0.0" />
  <Dependencies>
    <TargetDeviceFamily Name="Windows.Desktop" MinVersion="10.0.17763.0" MaxVersionTested="10.0.19041.0" />
  </Dependencies>
</Package>
"#;

/// A Barrow Weather checkout in a temp dir, with git history
pub struct TestProject {
  _root: TempDir,
  pub path: PathBuf,
}

impl TestProject {
  /// Create a project with the standard layout and one commit
  pub fn new() -> Result<Self> {
    let root = TempDir::new()?;
    let path = root.path().to_path_buf();

    git(&path, &["init", "--initial-branch=main"])?;
    git(&path, &["config", "user.name", "Test User"])?;
    git(&path, &["config", "user.email", "test@example.com"])?;
    git(&path, &["config", "tag.gpgSign", "false"])?;

    let app = path.join("src/BarrowWeather");
    std::fs::create_dir_all(&app)?;
    std::fs::write(
      app.join("BarrowWeather.csproj"),
      "<Project Sdk=\"Microsoft.NET.Sdk\">\n</Project>\n",
    )?;
    std::fs::write(app.join("Package.appxmanifest"), MANIFEST)?;
    std::fs::write(path.join("VERSION"), "0.3.0\n")?;
    std::fs::write(
      path.join("CHANGELOG.md"),
      "# Changelog\n\n## [Unreleased]\n\n### Added\n- Snow depth readings\n",
    )?;

    git(&path, &["add", "."])?;
    git(&path, &["commit", "-m", "Initial project setup"])?;

    Ok(Self { _root: root, path })
  }

  /// Point barrow.toml at a fake dotnet script inside the project
  #[cfg(unix)]
  pub fn with_fake_dotnet(self) -> Result<Self> {
    use std::os::unix::fs::PermissionsExt;

    let tools = self.path.join(".tools");
    std::fs::create_dir_all(&tools)?;
    let script = tools.join("dotnet");
    std::fs::write(&script, FAKE_DOTNET)?;
    std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755))?;

    std::fs::write(
      self.path.join("barrow.toml"),
      format!("[toolchain]\nprogram = \"{}\"\n", script.display()),
    )?;
    Ok(self)
  }

  /// Lines the fake dotnet logged, one per invocation
  pub fn dotnet_calls(&self) -> Result<Vec<String>> {
    let log = self.path.join(".tools/dotnet.log");
    if !log.exists() {
      return Ok(Vec::new());
    }
    Ok(std::fs::read_to_string(log)?.lines().map(String::from).collect())
  }

  /// Add a bare repository as `origin`
  pub fn add_bare_remote(&self) -> Result<PathBuf> {
    let remote = self.path.join(".remote.git");
    git(&self.path, &["init", "--bare", remote.to_string_lossy().as_ref()])?;
    git(&self.path, &["remote", "add", "origin", remote.to_string_lossy().as_ref()])?;
    Ok(remote)
  }

  /// Tags in the repository
  pub fn tags(&self) -> Result<Vec<String>> {
    tags_in(&self.path)
  }

  pub fn file_exists(&self, path: &str) -> bool {
    self.path.join(path).exists()
  }

  pub fn read_file(&self, path: &str) -> Result<String> {
    Ok(std::fs::read_to_string(self.path.join(path))?)
  }
}

/// Tags in any repository (including bare remotes)
pub fn tags_in(repo: &Path) -> Result<Vec<String>> {
  let output = git(repo, &["tag", "-l"])?;
  Ok(
    String::from_utf8_lossy(&output.stdout)
      .lines()
      .map(String::from)
      .collect(),
  )
}

/// Run git command in a directory
pub fn git(cwd: &Path, args: &[&str]) -> Result<Output> {
  let output = Command::new("git")
    .current_dir(cwd)
    .args(args)
    .output()
    .context("Failed to run git command")?;

  if !output.status.success() {
    let stderr = String::from_utf8_lossy(&output.stderr);
    anyhow::bail!("Git command failed: git {}\n{}", args.join(" "), stderr);
  }

  Ok(output)
}

/// Run barrow-dev against a project root; any exit status is returned
pub fn run_barrow_dev(root: &Path, args: &[&str]) -> Result<Output> {
  run_barrow_dev_env(root, args, &[])
}

/// Like [`run_barrow_dev`] with extra environment variables
pub fn run_barrow_dev_env(root: &Path, args: &[&str], envs: &[(&str, &str)]) -> Result<Output> {
  let bin = env!("CARGO_BIN_EXE_barrow-dev");

  Command::new(bin)
    .current_dir(root)
    .arg("--root")
    .arg(root)
    .args(args)
    .envs(envs.iter().copied())
    .output()
    .context("Failed to run barrow-dev")
}

pub fn stdout_of(output: &Output) -> String {
  String::from_utf8_lossy(&output.stdout).to_string()
}

pub fn stderr_of(output: &Output) -> String {
  String::from_utf8_lossy(&output.stderr).to_string()
}
