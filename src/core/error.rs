//! Error types for barrow-dev with contextual messages and exit codes
//!
//! Every failure a command can hit is categorized here. Each category knows how to
//! render itself and, where it can, offers a suggestion that points the user at the fix.

use std::fmt;
use std::io;
use std::path::PathBuf;

/// Exit codes for barrow-dev
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
  /// Any failure (missing tool, failed step, tag conflict, bad config)
  Failure = 1,
  /// Interrupted by the user (Ctrl+C)
  Interrupted = 130,
}

impl ExitCode {
  /// Convert to u8 for process exit
  pub fn as_u8(self) -> u8 {
    self as u8
  }
}

/// Main error type for barrow-dev
#[derive(Debug)]
pub enum ShipError {
  /// Configuration errors
  Config(ConfigError),

  /// External toolchain errors (dotnet)
  Tool(ToolError),

  /// Git operation errors
  Git(GitError),

  /// Precondition violations (missing project file, bad version, ...)
  Validation(ValidationError),

  /// I/O errors
  Io(io::Error),

  /// Generic error with message and optional context
  Message {
    message: String,
    context: Option<String>,
    help: Option<String>,
  },
}

impl ShipError {
  /// Create a simple error message
  pub fn message(msg: impl Into<String>) -> Self {
    ShipError::Message {
      message: msg.into(),
      context: None,
      help: None,
    }
  }

  /// Add context to an existing error
  pub fn context(self, ctx: impl Into<String>) -> Self {
    let ctx_str = ctx.into();
    match self {
      ShipError::Message { message, context, help } => ShipError::Message {
        message,
        context: Some(context.map(|c| format!("{}\n{}", ctx_str, c)).unwrap_or(ctx_str)),
        help,
      },
      ShipError::Io(e) => ShipError::Message {
        message: format!("{}: {}", ctx_str, e),
        context: None,
        help: None,
      },
      _ => self,
    }
  }

  /// Get the appropriate exit code for this error
  pub fn exit_code(&self) -> ExitCode {
    match self {
      ShipError::Tool(ToolError::Interrupted { .. }) => ExitCode::Interrupted,
      _ => ExitCode::Failure,
    }
  }

  /// Get contextual help message for this error
  pub fn help_message(&self) -> Option<String> {
    match self {
      ShipError::Config(e) => e.help_message(),
      ShipError::Tool(e) => e.help_message(),
      ShipError::Git(e) => e.help_message(),
      ShipError::Validation(e) => e.help_message(),
      ShipError::Message { help, .. } => help.clone(),
      ShipError::Io(_) => None,
    }
  }
}

impl fmt::Display for ShipError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ShipError::Config(e) => write!(f, "{}", e),
      ShipError::Tool(e) => write!(f, "{}", e),
      ShipError::Git(e) => write!(f, "{}", e),
      ShipError::Validation(e) => write!(f, "{}", e),
      ShipError::Io(e) => write!(f, "I/O error: {}", e),
      ShipError::Message { message, context, .. } => {
        write!(f, "{}", message)?;
        if let Some(ctx) = context {
          write!(f, "\n{}", ctx)?;
        }
        Ok(())
      }
    }
  }
}

impl std::error::Error for ShipError {
  fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
    match self {
      ShipError::Io(e) => Some(e),
      _ => None,
    }
  }
}

impl From<io::Error> for ShipError {
  fn from(err: io::Error) -> Self {
    ShipError::Io(err)
  }
}

impl From<String> for ShipError {
  fn from(msg: String) -> Self {
    ShipError::message(msg)
  }
}

impl From<&str> for ShipError {
  fn from(msg: &str) -> Self {
    ShipError::message(msg)
  }
}

impl From<toml_edit::de::Error> for ShipError {
  fn from(err: toml_edit::de::Error) -> Self {
    ShipError::message(format!("TOML deserialization error: {}", err))
  }
}

impl From<serde_json::Error> for ShipError {
  fn from(err: serde_json::Error) -> Self {
    ShipError::message(format!("JSON error: {}", err))
  }
}

impl From<glob::PatternError> for ShipError {
  fn from(err: glob::PatternError) -> Self {
    ShipError::message(format!("Invalid glob pattern: {}", err))
  }
}

/// Configuration-related errors
#[derive(Debug)]
pub enum ConfigError {
  /// A field holds a value we cannot use
  InvalidField { field: String, reason: String },

  /// Unknown platform named in config or on the command line
  UnknownPlatform { name: String },
}

impl ConfigError {
  fn help_message(&self) -> Option<String> {
    match self {
      ConfigError::UnknownPlatform { .. } => Some("Supported platforms are: x64, x86, ARM64".to_string()),
      ConfigError::InvalidField { field, .. } => Some(format!("Fix `{}` in barrow.toml or remove it to use the default.", field)),
    }
  }
}

impl fmt::Display for ConfigError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ConfigError::InvalidField { field, reason } => {
        write!(f, "Invalid configuration value for {}: {}", field, reason)
      }
      ConfigError::UnknownPlatform { name } => {
        write!(f, "Unknown platform '{}'", name)
      }
    }
  }
}

/// External toolchain errors
#[derive(Debug)]
pub enum ToolError {
  /// Program could not be spawned (not installed / not on PATH)
  NotFound { program: String },

  /// Program ran and exited non-zero
  CommandFailed { command: String, code: Option<i64> },

  /// Program exceeded the configured timeout and was killed
  TimedOut { command: String, secs: u64 },

  /// The user interrupted the program
  Interrupted { command: String },
}

impl ToolError {
  fn help_message(&self) -> Option<String> {
    match self {
      ToolError::NotFound { program } if program == "dotnet" => Some(
        "Install the .NET 8 SDK from https://dotnet.microsoft.com/download/dotnet/8.0".to_string(),
      ),
      ToolError::NotFound { program } => Some(format!("Make sure `{}` is installed and on PATH.", program)),
      ToolError::TimedOut { .. } => Some("Raise `toolchain.timeout_secs` in barrow.toml (0 disables it).".to_string()),
      _ => None,
    }
  }
}

impl fmt::Display for ToolError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ToolError::NotFound { program } => write!(f, "Could not run `{}`: program not found", program),
      ToolError::CommandFailed { command, code } => match code {
        Some(code) => write!(f, "Command failed with exit code {}: {}", code, command),
        None => write!(f, "Command terminated by signal: {}", command),
      },
      ToolError::TimedOut { command, secs } => write!(f, "Command timed out after {}s: {}", secs, command),
      ToolError::Interrupted { command } => write!(f, "Interrupted: {}", command),
    }
  }
}

/// Git operation errors
#[derive(Debug)]
pub enum GitError {
  /// Git command failed
  CommandFailed { command: String, code: Option<i64>, stderr: String },

  /// Release tag already exists
  TagExists { tag: String },

  /// Push failed
  PushFailed { remote: String, tag: String, reason: String },
}

impl GitError {
  fn help_message(&self) -> Option<String> {
    match self {
      GitError::TagExists { tag } => Some(format!(
        "Bump VERSION or pass --version. To re-tag, delete it first: git tag -d {}",
        tag
      )),
      GitError::PushFailed { remote, tag, reason } => {
        if reason.contains("permission denied") || reason.contains("403") {
          Some("Check your credentials and repository access.".to_string())
        } else {
          Some(format!("The tag exists locally. Retry with: git push {} {}", remote, tag))
        }
      }
      _ => None,
    }
  }
}

impl fmt::Display for GitError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      GitError::CommandFailed { command, code, stderr } => {
        match code {
          Some(code) => write!(f, "Git command failed with exit code {}: {}", code, command)?,
          None => write!(f, "Git command failed: {}", command)?,
        }
        if !stderr.trim().is_empty() {
          write!(f, "\n{}", stderr.trim_end())?;
        }
        Ok(())
      }
      GitError::TagExists { tag } => write!(f, "Tag {} already exists", tag),
      GitError::PushFailed { remote, tag, reason } => {
        write!(f, "Push of {} to {} failed", tag, remote)?;
        if !reason.trim().is_empty() {
          write!(f, ": {}", reason.trim_end())?;
        }
        Ok(())
      }
    }
  }
}

/// Precondition violations
#[derive(Debug)]
pub enum ValidationError {
  /// The .csproj the toolchain should build does not exist
  ProjectMissing { path: PathBuf },

  /// A version given on the command line is malformed
  InvalidVersion { version: String },

  /// Changelog has no Unreleased section and policy requires one
  UnreleasedMissing { path: PathBuf, marker: String },
}

impl ValidationError {
  fn help_message(&self) -> Option<String> {
    match self {
      ValidationError::ProjectMissing { .. } => {
        Some("Run from the repository root, or pass --root / set project.project_file.".to_string())
      }
      ValidationError::InvalidVersion { .. } => {
        Some("Versions are dot-separated non-negative integers, e.g. 1.4.2".to_string())
      }
      ValidationError::UnreleasedMissing { marker, .. } => Some(format!(
        "Add a '{}' section, pass --skip-changelog, or set release.missing_marker = \"warn\".",
        marker
      )),
    }
  }
}

impl fmt::Display for ValidationError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ValidationError::ProjectMissing { path } => write!(f, "Project file not found at {}", path.display()),
      ValidationError::InvalidVersion { version } => write!(f, "Invalid version '{}'", version),
      ValidationError::UnreleasedMissing { path, marker } => {
        write!(f, "{} has no '{}' section", path.display(), marker)
      }
    }
  }
}

/// Result type alias for barrow-dev
pub type ShipResult<T> = Result<T, ShipError>;

/// Helper trait to add context to Results
pub trait ResultExt<T> {
  /// Add context to an error result
  fn context(self, ctx: impl Into<String>) -> ShipResult<T>;

  /// Add context using a closure (lazy evaluation)
  fn with_context<F>(self, f: F) -> ShipResult<T>
  where
    F: FnOnce() -> String;
}

impl<T, E> ResultExt<T> for Result<T, E>
where
  E: Into<ShipError>,
{
  fn context(self, ctx: impl Into<String>) -> ShipResult<T> {
    self.map_err(|e| e.into().context(ctx))
  }

  fn with_context<F>(self, f: F) -> ShipResult<T>
  where
    F: FnOnce() -> String,
  {
    self.map_err(|e| e.into().context(f()))
  }
}

/// Pretty-print an error to stderr with help text
pub fn print_error(error: &ShipError) {
  eprintln!("\n❌ {}\n", error);

  if let Some(help) = error.help_message() {
    eprintln!("💡 Help: {}\n", help);
  }
}
