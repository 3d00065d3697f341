// batchrun/src/core/execution.rs

//! The shared record of a single step execution.

use parking_lot::{RwLock, RwLockReadGuard};
use std::fmt;
use std::sync::Arc;
use std::time::SystemTime;

/// Lifecycle state of a step execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BatchStatus {
  Starting,
  Started,
  Completed,
  Failed,
  Stopped,
}

impl BatchStatus {
  pub fn is_terminal(&self) -> bool {
    matches!(self, BatchStatus::Completed | BatchStatus::Failed | BatchStatus::Stopped)
  }
}

impl fmt::Display for BatchStatus {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let s = match self {
      BatchStatus::Starting => "STARTING",
      BatchStatus::Started => "STARTED",
      BatchStatus::Completed => "COMPLETED",
      BatchStatus::Failed => "FAILED",
      BatchStatus::Stopped => "STOPPED",
    };
    f.write_str(s)
  }
}

/// Snapshot of a step execution's state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepExecutionState {
  pub status: BatchStatus,
  /// Defaults to the status name once terminal.
  pub exit_status: Option<String>,
  pub failure_reason: Option<String>,
  pub start_time: Option<SystemTime>,
  pub end_time: Option<SystemTime>,
}

/// A step execution record shared between the runner and the job orchestrator.
///
/// Cloning yields another handle to the same record. Guards returned by
/// [`StepExecution::read`] are blocking and must not be held across `.await` points.
#[derive(Debug, Clone)]
pub struct StepExecution {
  id: u64,
  step_name: String,
  state: Arc<RwLock<StepExecutionState>>,
}

impl StepExecution {
  pub fn new(id: u64, step_name: impl Into<String>) -> Self {
    StepExecution {
      id,
      step_name: step_name.into(),
      state: Arc::new(RwLock::new(StepExecutionState {
        status: BatchStatus::Starting,
        exit_status: None,
        failure_reason: None,
        start_time: None,
        end_time: None,
      })),
    }
  }

  pub fn id(&self) -> u64 {
    self.id
  }

  pub fn step_name(&self) -> &str {
    &self.step_name
  }

  pub fn read(&self) -> RwLockReadGuard<'_, StepExecutionState> {
    self.state.read()
  }

  pub fn status(&self) -> BatchStatus {
    self.state.read().status
  }

  pub fn snapshot(&self) -> StepExecutionState {
    self.state.read().clone()
  }

  pub(crate) fn mark_started(&self) {
    let mut state = self.state.write();
    state.status = BatchStatus::Started;
    state.start_time = Some(SystemTime::now());
  }

  /// Moves the record into a terminal status. A record that already
  /// terminated keeps its first terminal status.
  pub(crate) fn finish(&self, status: BatchStatus, failure_reason: Option<String>) {
    debug_assert!(status.is_terminal());
    let mut state = self.state.write();
    if state.status.is_terminal() {
      return;
    }
    state.status = status;
    state.exit_status.get_or_insert_with(|| status.to_string());
    state.failure_reason = failure_reason;
    state.end_time = Some(SystemTime::now());
  }

  /// Lets the artifact or orchestrator set a custom exit status before the step ends.
  pub fn set_exit_status(&self, exit_status: impl Into<String>) {
    self.state.write().exit_status = Some(exit_status.into());
  }
}
