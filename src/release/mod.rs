//! Release bookkeeping for the Windows app
//!
//! Flat files that change when a version is cut:
//!
//! - **version**: the single-line VERSION file (source of truth)
//! - **manifest**: `<Identity Version>` in Package.appxmanifest
//! - **changelog**: dated sections under `## [Unreleased]` in CHANGELOG.md
//! - **tag**: naming of the annotated git tag for a version

pub mod changelog;
pub mod manifest;
pub mod tag;
pub mod version;

pub use changelog::{ChangelogUpdate, update_changelog};
pub use manifest::{ManifestUpdate, update_manifest_version};
pub use tag::ReleaseTag;
pub use version::{ProductVersion, read_version, write_version};
