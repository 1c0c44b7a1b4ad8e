//! Build targets supported by the Windows app

use crate::core::error::{ConfigError, ShipError};
use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// A CPU architecture the app is built and packaged for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Platform {
  #[serde(rename = "x64")]
  X64,
  #[serde(rename = "x86")]
  X86,
  #[serde(rename = "ARM64")]
  Arm64,
}

impl Platform {
  /// Every supported platform, in default build order
  pub const ALL: [Platform; 3] = [Platform::X64, Platform::X86, Platform::Arm64];

  /// MSBuild `Platform` property value
  pub fn as_str(self) -> &'static str {
    match self {
      Platform::X64 => "x64",
      Platform::X86 => "x86",
      Platform::Arm64 => "ARM64",
    }
  }

  /// Runtime identifier, e.g. `win-arm64`
  pub fn runtime_identifier(self, prefix: &str) -> String {
    format!("{}{}", prefix, self.as_str().to_lowercase())
  }

  /// Per-platform publish directory under the release output directory
  pub fn publish_dir(self, output_dir: &Path) -> PathBuf {
    output_dir.join(self.as_str())
  }
}

impl fmt::Display for Platform {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

impl FromStr for Platform {
  type Err = ShipError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    Platform::ALL
      .into_iter()
      .find(|p| p.as_str().eq_ignore_ascii_case(s.trim()))
      .ok_or_else(|| ShipError::Config(ConfigError::UnknownPlatform { name: s.to_string() }))
  }
}

/// Build configuration passed as `-c` / `-p:Configuration`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Configuration {
  Debug,
  Release,
}

impl Configuration {
  pub fn as_str(self) -> &'static str {
    match self {
      Configuration::Debug => "Debug",
      Configuration::Release => "Release",
    }
  }
}

impl fmt::Display for Configuration {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}
