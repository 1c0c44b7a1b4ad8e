//! Integration tests for barrow-dev
//!
//! Each test builds a throwaway project with real git. Commands that need the
//! .NET SDK run against a fake `dotnet` shell script, so those are unix-only.

mod helpers;

#[cfg(unix)]
mod test_build;
mod test_release;
#[cfg(unix)]
mod test_run;
mod test_version;
