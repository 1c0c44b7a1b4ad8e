//! Utility functions for cross-platform path handling and reporting

use std::path::Path;

/// Convert a path to the form passed on a tool command line
///
/// Config paths are written with forward slashes; on Windows MSBuild property
/// values are happier with native separators, so convert there.
pub fn path_arg(path: &Path) -> String {
  #[cfg(target_os = "windows")]
  {
    path.to_string_lossy().replace('/', "\\")
  }
  #[cfg(not(target_os = "windows"))]
  {
    path.to_string_lossy().to_string()
  }
}

/// Show `path` relative to `root` when it lives underneath it
pub fn display_relative(root: &Path, path: &Path) -> String {
  path
    .strip_prefix(root)
    .unwrap_or(path)
    .to_string_lossy()
    .to_string()
}

/// Human-readable size in megabytes with one decimal, e.g. `42.3 MB`
pub fn format_megabytes(bytes: u64) -> String {
  format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
}
