// batchrun/src/artifact/mod.rs

//! Defines the `Artifact` type: a per-step user object expressed as a set of
//! optional lifecycle hooks, one slot per phase.

pub mod hooks;
pub mod locator;

pub use hooks::{ArtifactBuilder, Hook};
pub use locator::locate_hook;

use crate::core::phase::LifecyclePhase;

/// A batchlet artifact, created fresh for each step execution and owned by the
/// runner until the step completes.
pub struct Artifact {
  pub(crate) name: String,
  pub(crate) begin_step: Option<Hook>,
  pub(crate) process: Option<Hook>,
  pub(crate) end_step: Option<Hook>,
}

impl Artifact {
  pub fn builder(name: impl Into<String>) -> ArtifactBuilder {
    ArtifactBuilder::new(name)
  }

  pub fn name(&self) -> &str {
    &self.name
  }

  pub fn hook(&self, phase: LifecyclePhase) -> Option<&Hook> {
    locate_hook(self, phase)
  }

  /// Phases this artifact implements, in invocation order.
  pub fn declared_phases(&self) -> Vec<LifecyclePhase> {
    LifecyclePhase::ORDERED
      .into_iter()
      .filter(|phase| locate_hook(self, *phase).is_some())
      .collect()
  }

  pub(crate) fn slot_mut(&mut self, phase: LifecyclePhase) -> &mut Option<Hook> {
    match phase {
      LifecyclePhase::BeginStep => &mut self.begin_step,
      LifecyclePhase::Process => &mut self.process,
      LifecyclePhase::EndStep => &mut self.end_step,
    }
  }
}

// Hooks are closures, so Debug only shows which slots are filled.
impl std::fmt::Debug for Artifact {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("Artifact")
      .field("name", &self.name)
      .field("begin_step_present", &self.begin_step.is_some())
      .field("process_present", &self.process.is_some())
      .field("end_step_present", &self.end_step.is_some())
      .finish()
  }
}
