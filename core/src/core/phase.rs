// batchrun/src/core/phase.rs

//! Defines the fixed, ordered set of lifecycle phases an artifact is driven through.

use std::fmt;

/// A lifecycle hook point on a batchlet artifact.
///
/// Every step execution visits the phases in the order of [`LifecyclePhase::ORDERED`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum LifecyclePhase {
  BeginStep,
  Process,
  EndStep,
}

impl LifecyclePhase {
  /// The invocation order used for every step execution.
  pub const ORDERED: [LifecyclePhase; 3] = [LifecyclePhase::BeginStep, LifecyclePhase::Process, LifecyclePhase::EndStep];

  pub fn as_str(&self) -> &'static str {
    match self {
      LifecyclePhase::BeginStep => "BeginStep",
      LifecyclePhase::Process => "Process",
      LifecyclePhase::EndStep => "EndStep",
    }
  }
}

impl fmt::Display for LifecyclePhase {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}
