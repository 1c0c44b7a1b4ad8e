//! External command execution
//!
//! Every call barrow-dev makes to `dotnet`, `git` or the built application goes
//! through [`CommandRunner`]. Higher layers only ever build an [`Invocation`] and
//! inspect the returned [`Outcome`], so the whole pipeline can be driven by a
//! scripted runner in tests or by [`PrintRunner`] for `--dry-run`.

use crate::core::error::{ShipError, ShipResult, ToolError};
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process::{Child, Command, ExitStatus, Stdio};
use std::sync::OnceLock;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::{Duration, Instant};

/// One external command to run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
  pub program: String,
  pub args: Vec<String>,
  /// Working directory; inherits ours when None
  pub cwd: Option<PathBuf>,
  /// Capture stdout/stderr instead of streaming them to the terminal
  pub capture: bool,
  pub timeout: Option<Duration>,
}

impl Invocation {
  pub fn new(program: impl Into<String>) -> Self {
    Self {
      program: program.into(),
      args: Vec::new(),
      cwd: None,
      capture: false,
      timeout: None,
    }
  }

  pub fn arg(mut self, arg: impl Into<String>) -> Self {
    self.args.push(arg.into());
    self
  }

  pub fn args<I, S>(mut self, args: I) -> Self
  where
    I: IntoIterator<Item = S>,
    S: Into<String>,
  {
    self.args.extend(args.into_iter().map(Into::into));
    self
  }

  pub fn cwd(mut self, dir: &Path) -> Self {
    self.cwd = Some(dir.to_path_buf());
    self
  }

  pub fn captured(mut self) -> Self {
    self.capture = true;
    self
  }

  /// Apply a timeout in seconds; 0 means none
  pub fn timeout_secs(mut self, secs: u64) -> Self {
    self.timeout = (secs > 0).then(|| Duration::from_secs(secs));
    self
  }

  /// Shell-like rendering for progress lines and dry runs
  pub fn display(&self) -> String {
    std::iter::once(self.program.as_str())
      .chain(self.args.iter().map(String::as_str))
      .map(|part| {
        if part.is_empty() || part.contains(char::is_whitespace) {
          format!("\"{}\"", part)
        } else {
          part.to_string()
        }
      })
      .collect::<Vec<_>>()
      .join(" ")
  }
}

/// What happened when an invocation ran
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Outcome {
  /// Exit code; None when the process was killed by a signal
  pub code: Option<i64>,
  pub stdout: String,
  pub stderr: String,
  /// Ctrl+C arrived while the process was running
  pub interrupted: bool,
}

impl Outcome {
  /// Successful exit with no output
  pub fn ok() -> Self {
    Self::exited(0)
  }

  pub fn exited(code: i64) -> Self {
    Self {
      code: Some(code),
      ..Self::default()
    }
  }

  #[cfg(test)]
  pub fn with_stdout(mut self, stdout: impl Into<String>) -> Self {
    self.stdout = stdout.into();
    self
  }

  pub fn success(&self) -> bool {
    !self.interrupted && self.code == Some(0)
  }
}

/// Narrow interface over process execution
pub trait CommandRunner: Sync {
  /// Run the command to completion. Spawn failures and timeouts are errors; a
  /// non-zero exit is reported through [`Outcome`].
  fn run(&self, invocation: &Invocation) -> ShipResult<Outcome>;

  /// Whether commands actually execute (false for dry runs)
  fn executes(&self) -> bool {
    true
  }
}

static INTERRUPTED: AtomicBool = AtomicBool::new(false);

/// Install a Ctrl+C handler that records the interrupt instead of killing us.
///
/// The child shares our console, so it receives the signal itself; we only need to
/// survive long enough to report it. Safe to call more than once.
pub fn install_interrupt_handler() -> ShipResult<()> {
  static INSTALLED: OnceLock<Result<(), String>> = OnceLock::new();

  INSTALLED
    .get_or_init(|| ctrlc::set_handler(|| INTERRUPTED.store(true, Ordering::SeqCst)).map_err(|e| e.to_string()))
    .clone()
    .map_err(|e| ShipError::message(format!("Failed to install Ctrl+C handler: {}", e)))
}

fn take_interrupt() -> bool {
  INTERRUPTED.swap(false, Ordering::SeqCst)
}

/// Runs commands as real child processes
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
  fn run(&self, invocation: &Invocation) -> ShipResult<Outcome> {
    let mut cmd = Command::new(&invocation.program);
    cmd.args(&invocation.args);

    if let Some(cwd) = &invocation.cwd {
      cmd.current_dir(cwd);
    }

    if invocation.capture {
      cmd.stdin(Stdio::null()).stdout(Stdio::piped()).stderr(Stdio::piped());
    }

    let mut child = cmd.spawn().map_err(|e| match e.kind() {
      io::ErrorKind::NotFound => ShipError::Tool(ToolError::NotFound {
        program: invocation.program.clone(),
      }),
      _ => ShipError::message(format!("Failed to execute {}: {}", invocation.display(), e)),
    })?;

    // Drain pipes on their own threads so a chatty child can't block on a full pipe
    let stdout = child.stdout.take().map(spawn_reader);
    let stderr = child.stderr.take().map(spawn_reader);

    let status = wait_for(&mut child, invocation)?;

    Ok(Outcome {
      code: status.code().map(i64::from),
      stdout: stdout.map(join_reader).unwrap_or_default(),
      stderr: stderr.map(join_reader).unwrap_or_default(),
      interrupted: take_interrupt(),
    })
  }
}

fn wait_for(child: &mut Child, invocation: &Invocation) -> ShipResult<ExitStatus> {
  let Some(limit) = invocation.timeout else {
    return Ok(child.wait()?);
  };

  let started = Instant::now();
  loop {
    if let Some(status) = child.try_wait()? {
      return Ok(status);
    }
    if started.elapsed() >= limit {
      let _ = child.kill();
      let _ = child.wait();
      return Err(ShipError::Tool(ToolError::TimedOut {
        command: invocation.display(),
        secs: limit.as_secs(),
      }));
    }
    thread::sleep(Duration::from_millis(50));
  }
}

fn spawn_reader<R: Read + Send + 'static>(mut pipe: R) -> thread::JoinHandle<String> {
  thread::spawn(move || {
    let mut buf = Vec::new();
    let _ = pipe.read_to_end(&mut buf);
    String::from_utf8_lossy(&buf).into_owned()
  })
}

fn join_reader(handle: thread::JoinHandle<String>) -> String {
  handle.join().unwrap_or_default()
}

/// Prints commands instead of running them (`--dry-run`)
pub struct PrintRunner;

impl CommandRunner for PrintRunner {
  fn run(&self, invocation: &Invocation) -> ShipResult<Outcome> {
    println!("   $ {}", invocation.display());
    Ok(Outcome::ok())
  }

  fn executes(&self) -> bool {
    false
  }
}
