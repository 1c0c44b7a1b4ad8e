//! Project context - resolve once, pass everywhere
//!
//! The root directory and loaded configuration are resolved once in `main.rs` and
//! handed to every command by reference. All relative paths (version file,
//! manifest, changelog, build output) are joined onto `root` here, so nothing ever
//! changes the process working directory.

use crate::core::config::ShipConfig;
use crate::core::error::{ResultExt, ShipError, ShipResult, ValidationError};
use std::path::{Component, Path, PathBuf};

#[derive(Debug, Clone)]
pub struct ProjectContext {
  /// Project root directory (absolute path)
  pub root: PathBuf,

  /// barrow.toml, or defaults when the file is absent
  pub config: ShipConfig,
}

impl ProjectContext {
  /// Build the context for a root directory, loading barrow.toml if present.
  pub fn build(root: &Path) -> ShipResult<Self> {
    let root = if root.is_absolute() {
      root.to_path_buf()
    } else {
      std::env::current_dir()
        .context("Failed to read the current directory")?
        .join(root)
    };
    // `--root .` must not leave `/./` in every reported path
    let root: PathBuf = root
      .components()
      .filter(|c| !matches!(c, Component::CurDir))
      .collect();
    let config = ShipConfig::load(&root)?;
    Ok(Self { root, config })
  }

  /// Context with explicit config
  #[cfg(test)]
  pub fn with_config(root: &Path, config: ShipConfig) -> Self {
    Self {
      root: root.to_path_buf(),
      config,
    }
  }

  /// Resolve a path relative to the project root; absolute paths pass through
  pub fn resolve(&self, path: &Path) -> PathBuf {
    self.root.join(path)
  }

  pub fn project_file(&self) -> PathBuf {
    self.resolve(&self.config.project.project_file)
  }

  pub fn manifest_path(&self) -> PathBuf {
    self.resolve(&self.config.project.manifest)
  }

  pub fn version_file(&self) -> PathBuf {
    self.resolve(&self.config.project.version_file)
  }

  pub fn changelog_path(&self) -> PathBuf {
    self.resolve(&self.config.project.changelog)
  }

  /// Release output directory, honouring a command-line override
  pub fn output_dir(&self, overridden: Option<&Path>) -> PathBuf {
    self.resolve(overridden.unwrap_or(&self.config.build.output_dir))
  }

  /// Project file path or a precondition error if it is missing
  pub fn require_project_file(&self) -> ShipResult<PathBuf> {
    let path = self.project_file();
    if !path.exists() {
      return Err(ShipError::Validation(ValidationError::ProjectMissing { path }));
    }
    Ok(path)
  }
}
