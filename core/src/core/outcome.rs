// batchrun/src/core/outcome.rs

//! Defines the explicit result of running one step.

use crate::core::execution::BatchStatus;
use crate::error::BatchError;
use std::fmt;

/// Category of a step failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
  /// The artifact factory could not produce the artifact.
  ArtifactCreation,
  /// A lifecycle hook returned an error.
  HookInvocation,
  /// A lifecycle hook exceeded the configured timeout.
  HookTimeout,
  /// The step is of a kind this runner does not execute (chunk).
  UnsupportedStep,
}

impl FailureKind {
  /// Classifies an error raised after the artifact exists.
  pub(crate) fn of_lifecycle(err: &BatchError) -> Self {
    match err {
      BatchError::HookTimeout { .. } => FailureKind::HookTimeout,
      BatchError::UnsupportedStep { .. } => FailureKind::UnsupportedStep,
      BatchError::ArtifactNotFound { .. } | BatchError::ArtifactCreation { .. } => FailureKind::ArtifactCreation,
      _ => FailureKind::HookInvocation,
    }
  }
}

impl fmt::Display for FailureKind {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let s = match self {
      FailureKind::ArtifactCreation => "artifact creation",
      FailureKind::HookInvocation => "hook invocation",
      FailureKind::HookTimeout => "hook timeout",
      FailureKind::UnsupportedStep => "unsupported step",
    };
    f.write_str(s)
  }
}

#[derive(Debug)]
pub struct StepFailure {
  pub kind: FailureKind,
  pub cause: BatchError,
}

impl fmt::Display for StepFailure {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{} failure: {}", self.kind, self.cause)
  }
}

/// Outcome of one step execution, consumed by the job orchestrator.
#[derive(Debug)]
pub enum StepOutcome {
  /// Every present lifecycle hook ran to completion.
  Succeeded,
  /// The step failed; no further phases were run.
  Failed(StepFailure),
  /// Cancellation was observed before all phases ran.
  Stopped,
}

impl StepOutcome {
  pub(crate) fn failed(kind: FailureKind, cause: BatchError) -> Self {
    StepOutcome::Failed(StepFailure { kind, cause })
  }

  pub fn is_success(&self) -> bool {
    matches!(self, StepOutcome::Succeeded)
  }

  pub fn failure(&self) -> Option<&StepFailure> {
    match self {
      StepOutcome::Failed(failure) => Some(failure),
      _ => None,
    }
  }

  /// The terminal batch status this outcome records on the step execution.
  pub fn batch_status(&self) -> BatchStatus {
    match self {
      StepOutcome::Succeeded => BatchStatus::Completed,
      StepOutcome::Failed(_) => BatchStatus::Failed,
      StepOutcome::Stopped => BatchStatus::Stopped,
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::core::phase::LifecyclePhase;

  #[test]
  fn lifecycle_errors_are_classified() {
    let invocation = BatchError::HookInvocation {
      step_name: "s1".to_string(),
      phase: LifecyclePhase::Process,
      source: anyhow::anyhow!("boom"),
    };
    assert_eq!(FailureKind::of_lifecycle(&invocation), FailureKind::HookInvocation);

    let timeout = BatchError::HookTimeout {
      step_name: "s1".to_string(),
      phase: LifecyclePhase::BeginStep,
      timeout: std::time::Duration::from_secs(1),
    };
    assert_eq!(FailureKind::of_lifecycle(&timeout), FailureKind::HookTimeout);
  }

  #[test]
  fn failed_outcome_keeps_kind_and_cause() {
    let outcome = StepOutcome::failed(
      FailureKind::ArtifactCreation,
      BatchError::ArtifactNotFound {
        ref_name: "greeter".to_string(),
      },
    );
    let failure = outcome.failure().unwrap();
    assert_eq!(failure.kind, FailureKind::ArtifactCreation);
    assert_eq!(
      failure.to_string(),
      "artifact creation failure: No artifact registered under reference 'greeter'"
    );
    assert_eq!(outcome.batch_status(), BatchStatus::Failed);
  }

  #[test]
  fn success_maps_to_completed() {
    assert!(StepOutcome::Succeeded.is_success());
    assert_eq!(StepOutcome::Succeeded.batch_status(), BatchStatus::Completed);
    assert_eq!(StepOutcome::Stopped.batch_status(), BatchStatus::Stopped);
  }
}
