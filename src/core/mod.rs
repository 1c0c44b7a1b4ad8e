//! Core building blocks shared by every command
//!
//! - **config**: barrow.toml parsing and validation
//! - **context**: project root plus loaded config, resolved once
//! - **error**: error types with contextual help messages
//! - **exec**: external command execution behind the `CommandRunner` seam
//! - **platform**: build targets and configurations
//! - **vcs**: git operations (SystemGit)

pub mod config;
pub mod context;
pub mod error;
pub mod exec;
pub mod platform;
pub mod vcs;
