//! CLI commands for barrow-dev
//!
//! - **doctor**: prerequisite and project layout checks
//! - **build**: multi-platform build, publish and MSIX packaging
//! - **release**: version stamp, changelog section, git tag and push
//! - **run**: build and launch the app locally
//! - **version**: show or set the product version
//!
//! All commands take `&ProjectContext` and return the process exit status.

pub mod build;
pub mod doctor;
pub mod release;
pub mod run;
pub mod version;

pub use build::{BuildOptions, run_build};
pub use doctor::run_doctor;
pub use release::{ReleaseOptions, run_release};
pub use run::{RunOptions, run_launch};
pub use version::run_version;
