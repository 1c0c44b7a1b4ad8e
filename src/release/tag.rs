//! Release tag naming

use crate::release::version::ProductVersion;
use std::fmt;

/// Annotated tag marking a release, e.g. `v1.2.3`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseTag {
  /// Full tag name
  pub name: String,
  pub version: ProductVersion,
}

impl ReleaseTag {
  pub fn new(prefix: &str, version: &ProductVersion) -> Self {
    Self {
      name: format!("{}{}", prefix, version),
      version: version.clone(),
    }
  }

  /// Annotation stored on the tag
  pub fn message(&self) -> String {
    format!("Release {}", self.version)
  }
}

impl fmt::Display for ReleaseTag {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.name)
  }
}
