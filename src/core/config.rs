use crate::core::error::{ConfigError, ResultExt, ShipError, ShipResult};
use crate::core::platform::Platform;
use crate::release::version::ProductVersion;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Configuration for barrow-dev
/// Searched in order: barrow.toml, .barrow.toml, .config/barrow.toml
///
/// Every field has a default matching the Barrow Weather repository layout, so the
/// file is only needed when something moves.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ShipConfig {
  #[serde(default)]
  pub project: ProjectConfig,
  #[serde(default)]
  pub toolchain: ToolchainConfig,
  #[serde(default)]
  pub release: ReleaseConfig,
  #[serde(default)]
  pub build: BuildConfig,
}

/// Where the application's files live, relative to the project root
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectConfig {
  /// Product name; also the assembly name and MSIX package name
  pub name: String,
  pub project_file: PathBuf,
  pub manifest: PathBuf,
  pub version_file: PathBuf,
  pub changelog: PathBuf,
  /// Target framework moniker the build writes under `bin/<platform>/<config>/`
  pub target_framework: String,
  /// Version reported when the version file is absent
  pub default_version: String,
}

impl Default for ProjectConfig {
  fn default() -> Self {
    Self {
      name: "BarrowWeather".to_string(),
      project_file: PathBuf::from("src/BarrowWeather/BarrowWeather.csproj"),
      manifest: PathBuf::from("src/BarrowWeather/Package.appxmanifest"),
      version_file: PathBuf::from("VERSION"),
      changelog: PathBuf::from("CHANGELOG.md"),
      target_framework: "net8.0-windows10.0.19041.0".to_string(),
      default_version: "0.1.0".to_string(),
    }
  }
}

impl ProjectConfig {
  /// Directory containing the project file
  pub fn project_dir(&self) -> PathBuf {
    self
      .project_file
      .parent()
      .map(Path::to_path_buf)
      .unwrap_or_default()
  }
}

/// The .NET toolchain invocation
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolchainConfig {
  /// Program to invoke (default: dotnet)
  pub program: String,
  /// Per-invocation timeout in seconds; 0 disables it
  pub timeout_secs: u64,
  /// Prefix of the runtime identifier, e.g. `win-` in `win-x64`
  pub runtime_prefix: String,
}

impl Default for ToolchainConfig {
  fn default() -> Self {
    Self {
      program: "dotnet".to_string(),
      timeout_secs: 0,
      runtime_prefix: "win-".to_string(),
    }
  }
}

/// What to do when the changelog has no Unreleased section
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum MissingMarker {
  /// Report the skipped update and continue
  #[default]
  Warn,
  /// Abort the release before touching git
  Error,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReleaseConfig {
  pub tag_prefix: String,
  pub remote: String,
  pub unreleased_marker: String,
  pub missing_marker: MissingMarker,
}

impl Default for ReleaseConfig {
  fn default() -> Self {
    Self {
      tag_prefix: "v".to_string(),
      remote: "origin".to_string(),
      unreleased_marker: "## [Unreleased]".to_string(),
      missing_marker: MissingMarker::Warn,
    }
  }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildConfig {
  /// Where publish output and MSIX packages go (relative to the project root)
  pub output_dir: PathBuf,
  /// Platforms built when `--platform` is omitted, in build order
  pub platforms: Vec<String>,
}

impl Default for BuildConfig {
  fn default() -> Self {
    Self {
      output_dir: PathBuf::from("release"),
      platforms: Platform::ALL.iter().map(|p| p.as_str().to_string()).collect(),
    }
  }
}

impl BuildConfig {
  /// Default build platforms, parsed and in configured order
  pub fn platforms(&self) -> ShipResult<Vec<Platform>> {
    self.platforms.iter().map(|p| p.parse()).collect()
  }
}

impl ShipConfig {
  /// Find config file in search order: barrow.toml, .barrow.toml, .config/barrow.toml
  pub fn find_config_path(root: &Path) -> Option<PathBuf> {
    let candidates = [
      root.join("barrow.toml"),
      root.join(".barrow.toml"),
      root.join(".config").join("barrow.toml"),
    ];

    candidates.into_iter().find(|p| p.exists())
  }

  /// Load config for a project root, falling back to defaults when no file exists
  pub fn load(root: &Path) -> ShipResult<Self> {
    let Some(config_path) = Self::find_config_path(root) else {
      return Ok(Self::default());
    };

    let content = fs::read_to_string(&config_path)
      .with_context(|| format!("Failed to read config from {}", config_path.display()))?;
    let config: ShipConfig = toml_edit::de::from_str(&content)
      .with_context(|| format!("Failed to parse config from {}", config_path.display()))?;

    config
      .validate()
      .with_context(|| format!("Invalid configuration in {}", config_path.display()))?;

    Ok(config)
  }

  /// Validate values serde cannot check on its own
  pub fn validate(&self) -> ShipResult<()> {
    if self.release.tag_prefix.trim().is_empty() {
      return Err(ShipError::Config(ConfigError::InvalidField {
        field: "release.tag_prefix".to_string(),
        reason: "must not be empty".to_string(),
      }));
    }

    if self.release.remote.trim().is_empty() {
      return Err(ShipError::Config(ConfigError::InvalidField {
        field: "release.remote".to_string(),
        reason: "must not be empty".to_string(),
      }));
    }

    if self.build.platforms.is_empty() {
      return Err(ShipError::Config(ConfigError::InvalidField {
        field: "build.platforms".to_string(),
        reason: "must list at least one platform".to_string(),
      }));
    }
    self.build.platforms()?;

    if ProductVersion::parse_strict(&self.project.default_version).is_err() {
      return Err(ShipError::Config(ConfigError::InvalidField {
        field: "project.default_version".to_string(),
        reason: format!("'{}' is not a dotted numeric version", self.project.default_version),
      }));
    }

    Ok(())
  }
}
