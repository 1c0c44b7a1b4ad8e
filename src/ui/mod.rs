//! Terminal output
//!
//! - **progress**: linya progress bar for parallel builds
//! - [`Console`]: status lines that can be silenced for `--json` / `--parallel`

pub mod progress;

use std::fmt::Display;

/// Status output for a command
///
/// Progress lines go to stdout unless quiet; warnings and failures always go to
/// stderr so they survive `--json`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Console {
  quiet: bool,
}

impl Console {
  pub fn new(quiet: bool) -> Self {
    Self { quiet }
  }

  pub fn is_quiet(&self) -> bool {
    self.quiet
  }

  pub fn line(&self, msg: impl Display) {
    if !self.quiet {
      println!("{}", msg);
    }
  }

  pub fn warn(&self, msg: impl Display) {
    if self.quiet {
      eprintln!("⚠️  {}", msg);
    } else {
      println!("⚠️  {}", msg);
    }
  }

  pub fn fail(&self, msg: impl Display) {
    if self.quiet {
      eprintln!("❌ {}", msg);
    } else {
      println!("❌ {}", msg);
    }
  }
}
