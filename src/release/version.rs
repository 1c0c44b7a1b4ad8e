//! The single-line VERSION file

use crate::core::context::ProjectContext;
use crate::core::error::{ResultExt, ShipError, ShipResult, ValidationError};
use regex::Regex;
use serde::Serialize;
use std::fmt;
use std::fs;
use std::io;
use std::sync::LazyLock;

static VERSION_PATTERN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\d+(\.\d+)*$").expect("valid regex"));

/// Product version as written in the VERSION file (e.g. `0.2.1`)
///
/// Values read from disk are kept verbatim; only versions typed by the user go
/// through [`ProductVersion::parse_strict`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ProductVersion(String);

impl ProductVersion {
  /// Wrap a version without validating it
  pub fn new(version: impl Into<String>) -> Self {
    Self(version.into().trim().to_string())
  }

  /// Accept only dot-separated non-negative integers
  pub fn parse_strict(version: &str) -> ShipResult<Self> {
    let trimmed = version.trim();
    if !VERSION_PATTERN.is_match(trimmed) {
      return Err(ShipError::Validation(ValidationError::InvalidVersion {
        version: version.to_string(),
      }));
    }
    Ok(Self(trimmed.to_string()))
  }

  pub fn as_str(&self) -> &str {
    &self.0
  }

  /// Four-part `Major.Minor.Patch.0` form required by the package manifest.
  ///
  /// Missing components are padded with `0`; anything past the third is dropped.
  pub fn manifest_form(&self) -> String {
    let mut parts: Vec<&str> = self.0.split('.').collect();
    while parts.len() < 3 {
      parts.push("0");
    }
    format!("{}.{}.{}.0", parts[0], parts[1], parts[2])
  }
}

impl fmt::Display for ProductVersion {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.0)
  }
}

/// Read the VERSION file; a missing file yields the configured default.
///
/// Never fails: an unreadable file is reported and treated like a missing one.
pub fn read_version(ctx: &ProjectContext) -> ProductVersion {
  let path = ctx.version_file();
  match fs::read_to_string(&path) {
    Ok(content) => ProductVersion::new(content),
    Err(e) if e.kind() == io::ErrorKind::NotFound => ProductVersion::new(ctx.config.project.default_version.clone()),
    Err(e) => {
      eprintln!("⚠️  Could not read {}: {}", path.display(), e);
      ProductVersion::new(ctx.config.project.default_version.clone())
    }
  }
}

/// Overwrite the VERSION file with `version` and a trailing newline
pub fn write_version(ctx: &ProjectContext, version: &ProductVersion) -> ShipResult<()> {
  let path = ctx.version_file();
  fs::write(&path, format!("{}\n", version)).with_context(|| format!("Failed to write {}", path.display()))?;
  Ok(())
}
