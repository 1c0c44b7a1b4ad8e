//! CHANGELOG.md release sections
//!
//! The changelog keeps a single `## [Unreleased]` heading at the top. Cutting a
//! release inserts a dated `## [x.y.z] - YYYY-MM-DD` heading directly beneath it,
//! so pending notes now sit under the new version and the Unreleased heading stays
//! in place for the next cycle.

use crate::core::config::{MissingMarker, ReleaseConfig};
use crate::core::context::ProjectContext;
use crate::core::error::{ResultExt, ShipError, ShipResult, ValidationError};
use crate::release::version::ProductVersion;
use std::fs;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChangelogUpdate {
  /// A dated section was inserted
  Updated,
  /// The file exists but has no Unreleased marker; nothing changed
  MarkerMissing,
  /// There is no changelog file
  FileMissing,
}

/// Insert a `## [version] - date` heading after the first `marker`.
///
/// Returns None when the marker does not occur.
pub fn insert_release_section(content: &str, version: &str, date: &str, marker: &str) -> Option<String> {
  let at = content.find(marker)? + marker.len();
  let mut out = String::with_capacity(content.len() + marker.len() + version.len() + date.len() + 16);
  out.push_str(&content[..at]);
  out.push_str(&format!("\n\n## [{}] - {}", version, date));
  out.push_str(&content[at..]);
  Some(out)
}

/// Today's local date in changelog format
pub fn today() -> String {
  chrono::Local::now().format("%Y-%m-%d").to_string()
}

/// Add a release section for `version` dated today.
///
/// A missing marker is returned as [`ChangelogUpdate::MarkerMissing`] for the
/// caller to report as a skipped step, or rejected when
/// `release.missing_marker = "error"`.
pub fn update_changelog(ctx: &ProjectContext, version: &ProductVersion) -> ShipResult<ChangelogUpdate> {
  update_changelog_on(ctx, version, &today())
}

pub(crate) fn update_changelog_on(ctx: &ProjectContext, version: &ProductVersion, date: &str) -> ShipResult<ChangelogUpdate> {
  let path = ctx.changelog_path();
  if !path.exists() {
    return Ok(ChangelogUpdate::FileMissing);
  }

  let content = fs::read_to_string(&path).with_context(|| format!("Failed to read {}", path.display()))?;
  let ReleaseConfig {
    unreleased_marker: marker,
    missing_marker,
    ..
  } = &ctx.config.release;

  let Some(updated) = insert_release_section(&content, version.as_str(), date, marker) else {
    return match missing_marker {
      MissingMarker::Warn => Ok(ChangelogUpdate::MarkerMissing),
      MissingMarker::Error => Err(ShipError::Validation(ValidationError::UnreleasedMissing {
        path,
        marker: marker.clone(),
      })),
    };
  };

  fs::write(&path, updated).with_context(|| format!("Failed to write {}", path.display()))?;

  Ok(ChangelogUpdate::Updated)
}
