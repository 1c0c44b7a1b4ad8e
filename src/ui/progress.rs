//! Progress indicators for parallel builds
//!
//! Uses `linya` for allocation-free, concurrency-optimized progress bars

use linya::{Bar, Progress};
use std::sync::{Arc, Mutex};

/// Thread-safe progress bar counting finished build targets
#[derive(Clone)]
pub struct TargetProgress {
  progress: Arc<Mutex<Progress>>,
  bar: Arc<Bar>,
}

impl TargetProgress {
  /// Create a bar for `total` targets
  pub fn new(total: usize, label: impl Into<String>) -> Self {
    let mut progress = Progress::new();
    let bar = progress.bar(total, label.into());
    Self {
      progress: Arc::new(Mutex::new(progress)),
      bar: Arc::new(bar),
    }
  }

  /// Mark one target finished (thread-safe)
  pub fn inc(&self) {
    let mut progress = self.progress.lock().unwrap_or_else(|e| e.into_inner());
    progress.inc_and_draw(&self.bar, 1);
  }
}
