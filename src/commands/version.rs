//! `barrow-dev version` - show or set the product version

use crate::commands::build::report_manifest_update;
use crate::core::context::ProjectContext;
use crate::core::error::ShipResult;
use crate::release::{ProductVersion, read_version, update_manifest_version, write_version};
use crate::ui::Console;

/// Print the current version, or write `set` to VERSION and the manifest
pub fn run_version(ctx: &ProjectContext, set: Option<&str>) -> ShipResult<u8> {
  let Some(requested) = set else {
    println!("{}", read_version(ctx));
    return Ok(0);
  };

  let version = ProductVersion::parse_strict(requested)?;
  let console = Console::default();

  write_version(ctx, &version)?;
  console.line(format!("📝 Updated VERSION file to {}", version));
  report_manifest_update(&console, ctx, update_manifest_version(ctx, &version)?, &version);

  Ok(0)
}
