// batchrun/src/error.rs
use crate::core::phase::LifecyclePhase;
use anyhow::Error as AnyhowError;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BatchError {
  /// The step definition itself is malformed. The only error `StepExecutionRunner::run`
  /// returns as `Err`.
  #[error("Configuration error for step '{step_name}': {message}")]
  Configuration { step_name: String, message: String },

  #[error("No artifact registered under reference '{ref_name}'")]
  ArtifactNotFound { ref_name: String },

  #[error("Failed to create artifact '{ref_name}'. Source: {source}")]
  ArtifactCreation {
    ref_name: String,
    #[source]
    source: AnyhowError,
  },

  #[error("Artifact '{artifact}' declares more than one {phase} hook")]
  DuplicateHook { artifact: String, phase: LifecyclePhase },

  #[error("{phase} hook failed for step '{step_name}'. Source: {source}")]
  HookInvocation {
    step_name: String,
    phase: LifecyclePhase,
    #[source]
    source: AnyhowError,
  },

  #[error("{phase} hook for step '{step_name}' did not finish within {timeout:?}")]
  HookTimeout {
    step_name: String,
    phase: LifecyclePhase,
    timeout: Duration,
  },

  #[error("Step '{step_name}' is a {kind} step, which this runner does not execute")]
  UnsupportedStep { step_name: String, kind: &'static str },
}

impl BatchError {
  pub(crate) fn configuration(step_name: &str, message: impl Into<String>) -> Self {
    BatchError::Configuration {
      step_name: step_name.to_string(),
      message: message.into(),
    }
  }

  pub fn is_configuration(&self) -> bool {
    matches!(self, BatchError::Configuration { .. } | BatchError::DuplicateHook { .. })
  }
}

pub type BatchResult<T, E = BatchError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn creation_error_keeps_constructor_cause_as_source() {
    let err = BatchError::ArtifactCreation {
      ref_name: "greeter".to_string(),
      source: anyhow::anyhow!("disk full"),
    };
    let source = std::error::Error::source(&err).expect("source should be kept");
    assert_eq!(source.to_string(), "disk full");
    assert!(!err.is_configuration());
  }

  #[test]
  fn duplicate_hook_counts_as_configuration() {
    let err = BatchError::DuplicateHook {
      artifact: "greeter".to_string(),
      phase: LifecyclePhase::Process,
    };
    assert!(err.is_configuration());
    assert_eq!(err.to_string(), "Artifact 'greeter' declares more than one Process hook");
  }
}
