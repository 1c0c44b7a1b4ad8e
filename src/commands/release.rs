//! `barrow-dev release` - stamp the version, date the changelog, tag and push
//!
//! Steps, in order:
//! 1. Resolve the version (`--version` is validated and written to VERSION)
//! 2. Insert a dated section under `## [Unreleased]` (unless `--skip-changelog`)
//! 3. Refuse to continue if the tag already exists
//! 4. Create the annotated tag
//! 5. Push it (unless `--no-push`)
//!
//! Nothing is rolled back on failure; a failed push leaves the local tag in place.

use crate::core::context::ProjectContext;
use crate::core::error::{ExitCode, GitError, ShipError, ShipResult};
use crate::core::exec::CommandRunner;
use crate::core::vcs::SystemGit;
use crate::release::{ChangelogUpdate, ProductVersion, ReleaseTag, read_version, update_changelog, write_version};
use crate::ui::Console;

#[derive(Debug, Clone, Default)]
pub struct ReleaseOptions {
  /// Version to release instead of the one in VERSION
  pub version: Option<String>,
  pub no_push: bool,
  pub skip_changelog: bool,
  /// Remote to push to; the configured remote when None
  pub remote: Option<String>,
}

/// Run the release command; returns the process exit status
pub fn run_release(ctx: &ProjectContext, runner: &dyn CommandRunner, opts: &ReleaseOptions) -> ShipResult<u8> {
  let console = Console::default();
  let dry_run = !runner.executes();

  // Validate before touching anything on disk
  let override_version = opts.version.as_deref().map(ProductVersion::parse_strict).transpose()?;

  let git = SystemGit::new(&ctx.root, runner);
  if !dry_run {
    match git.version() {
      Ok(version) => console.line(format!("✅ Found {}", version)),
      Err(e) => {
        console.fail(format!("git not found or not working: {}", e));
        return Ok(ExitCode::Failure.as_u8());
      }
    }
  }

  let version = match override_version {
    Some(version) => {
      if dry_run {
        console.line(format!("DRY RUN: would write {} to VERSION", version));
      } else {
        write_version(ctx, &version)?;
        console.line(format!("📝 Updated VERSION file to {}", version));
      }
      version
    }
    None => {
      let version = read_version(ctx);
      console.line(format!("🏷️  Using version from VERSION file: {}", version));
      version
    }
  };

  if !opts.skip_changelog {
    record_changelog(ctx, &console, &version, dry_run)?;
  }

  let tag = ReleaseTag::new(&ctx.config.release.tag_prefix, &version);
  console.line(format!("\n🔖 Creating git tag: {}", tag));

  if git.tag_exists(&tag.name)? {
    return Err(ShipError::Git(GitError::TagExists { tag: tag.name }));
  }

  git.create_annotated_tag(&tag.name, &tag.message())?;
  console.line(format!("✅ Created tag {}", tag));

  let remote = opts.remote.as_deref().unwrap_or(&ctx.config.release.remote);
  if opts.no_push {
    console.line(format!(
      "\nTag created locally. Push with: git push {} {}",
      remote, tag
    ));
  } else {
    console.line("\n🚀 Pushing tag to remote...");
    git.push_tag(remote, &tag.name)?;
    console.line(format!("✅ Pushed {} to {}", tag, remote));
  }

  console.line(format!("\n✨ Release {} ready", version));
  Ok(0)
}

fn record_changelog(ctx: &ProjectContext, console: &Console, version: &ProductVersion, dry_run: bool) -> ShipResult<()> {
  if dry_run {
    console.line(format!("DRY RUN: would add a [{}] section to the changelog", version));
    return Ok(());
  }

  match update_changelog(ctx, version)? {
    ChangelogUpdate::Updated => console.line(format!("📝 Updated CHANGELOG.md with version {}", version)),
    ChangelogUpdate::MarkerMissing => console.warn(format!(
      "Skipped changelog update: no '{}' section",
      ctx.config.release.unreleased_marker
    )),
    ChangelogUpdate::FileMissing => console.warn(format!(
      "Skipped changelog update: {} not found",
      ctx.changelog_path().display()
    )),
  }
  Ok(())
}
