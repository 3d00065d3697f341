// batchrun/src/artifact/hooks.rs

//! Contains the `Hook` type and the `ArtifactBuilder` used to declare which
//! lifecycle phases an artifact implements.

use crate::artifact::Artifact;
use crate::core::phase::LifecyclePhase;
use crate::error::{BatchError, BatchResult};
use std::future::Future;
use std::pin::Pin;
use tracing::{event, Level};

/// A lifecycle hook: an asynchronous, argument-less function on the artifact.
///
/// Hooks capture whatever state the artifact needs. Errors are reported as
/// `anyhow::Error` and become the step's failure cause.
pub type Hook = Box<dyn Fn() -> Pin<Box<dyn Future<Output = anyhow::Result<()>> + Send>> + Send + Sync>;

fn box_hook<F, E>(hook_fn: impl Fn() -> F + Send + Sync + 'static) -> Hook
where
  F: Future<Output = Result<(), E>> + Send + 'static,
  E: Into<anyhow::Error> + Send + Sync + 'static,
{
  Box::new(move || {
    let user_fut = hook_fn();
    Box::pin(async move { user_fut.await.map_err(Into::into) })
  })
}

/// Collects hook registrations for an artifact.
///
/// Registering a phase twice is accepted here and rejected by [`ArtifactBuilder::build`].
pub struct ArtifactBuilder {
  name: String,
  registrations: Vec<(LifecyclePhase, Hook)>,
}

impl ArtifactBuilder {
  pub fn new(name: impl Into<String>) -> Self {
    Self {
      name: name.into(),
      registrations: Vec::new(),
    }
  }

  /// Registers the hook for an arbitrary phase.
  pub fn hook<F, E>(mut self, phase: LifecyclePhase, hook_fn: impl Fn() -> F + Send + Sync + 'static) -> Self
  where
    F: Future<Output = Result<(), E>> + Send + 'static,
    E: Into<anyhow::Error> + Send + Sync + 'static,
  {
    self.registrations.push((phase, box_hook(hook_fn)));
    self
  }

  pub fn begin_step<F, E>(self, hook_fn: impl Fn() -> F + Send + Sync + 'static) -> Self
  where
    F: Future<Output = Result<(), E>> + Send + 'static,
    E: Into<anyhow::Error> + Send + Sync + 'static,
  {
    self.hook(LifecyclePhase::BeginStep, hook_fn)
  }

  pub fn process<F, E>(self, hook_fn: impl Fn() -> F + Send + Sync + 'static) -> Self
  where
    F: Future<Output = Result<(), E>> + Send + 'static,
    E: Into<anyhow::Error> + Send + Sync + 'static,
  {
    self.hook(LifecyclePhase::Process, hook_fn)
  }

  pub fn end_step<F, E>(self, hook_fn: impl Fn() -> F + Send + Sync + 'static) -> Self
  where
    F: Future<Output = Result<(), E>> + Send + 'static,
    E: Into<anyhow::Error> + Send + Sync + 'static,
  {
    self.hook(LifecyclePhase::EndStep, hook_fn)
  }

  /// Produces the artifact, failing with `BatchError::DuplicateHook` if any
  /// phase was registered more than once.
  pub fn build(self) -> BatchResult<Artifact> {
    let mut artifact = Artifact {
      name: self.name,
      begin_step: None,
      process: None,
      end_step: None,
    };

    for (phase, hook) in self.registrations {
      let slot = artifact.slot_mut(phase);
      if slot.is_some() {
        event!(Level::ERROR, artifact = %artifact.name, %phase, "Duplicate lifecycle hook registration.");
        return Err(BatchError::DuplicateHook {
          artifact: artifact.name,
          phase,
        });
      }
      *slot = Some(hook);
    }

    event!(
      Level::TRACE,
      artifact = %artifact.name,
      phases = ?artifact.declared_phases(),
      "Artifact built."
    );
    Ok(artifact)
  }
}
