// batchrun/src/config.rs

//! Runner configuration.

use std::time::Duration;
use tracing::Level;

/// Settings for a `StepExecutionRunner`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunnerConfig {
  /// Upper bound on a single hook invocation. `None` waits indefinitely.
  pub hook_timeout: Option<Duration>,
  /// Level at which a phase without a hook is reported.
  pub missing_hook_level: Level,
}

impl Default for RunnerConfig {
  fn default() -> Self {
    Self {
      hook_timeout: None,
      missing_hook_level: Level::WARN,
    }
  }
}

impl RunnerConfig {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn with_hook_timeout(mut self, timeout: Duration) -> Self {
    self.hook_timeout = Some(timeout);
    self
  }

  pub fn without_hook_timeout(mut self) -> Self {
    self.hook_timeout = None;
    self
  }

  pub fn with_missing_hook_level(mut self, level: Level) -> Self {
    self.missing_hook_level = level;
    self
  }
}
