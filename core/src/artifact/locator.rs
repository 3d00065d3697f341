// batchrun/src/artifact/locator.rs

//! Finds the hook an artifact declares for a lifecycle phase.

use crate::artifact::{Artifact, Hook};
use crate::core::phase::LifecyclePhase;

/// Returns the single hook `artifact` declares for `phase`, or `None` when the
/// artifact does not implement that phase.
///
/// Pure lookup; safe to call any number of times.
pub fn locate_hook(artifact: &Artifact, phase: LifecyclePhase) -> Option<&Hook> {
  match phase {
    LifecyclePhase::BeginStep => artifact.begin_step.as_ref(),
    LifecyclePhase::Process => artifact.process.as_ref(),
    LifecyclePhase::EndStep => artifact.end_step.as_ref(),
  }
}
