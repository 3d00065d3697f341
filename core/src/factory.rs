// batchrun/src/factory.rs

//! Defines the `ArtifactFactory` trait the runner creates artifacts through,
//! and `ArtifactRegistry`, a name-keyed factory of artifact constructors.

use crate::artifact::Artifact;
use crate::core::context::ArtifactContext;
use crate::error::{BatchError, BatchResult};

use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{event, instrument, Level};

/// Resolves a symbolic artifact reference to a fresh artifact instance.
#[async_trait]
pub trait ArtifactFactory: Send + Sync {
  /// Creates the artifact registered under `ref_name`.
  ///
  /// Called once per step execution; the returned artifact is never reused.
  async fn create(&self, ref_name: &str, context: &ArtifactContext) -> BatchResult<Artifact>;
}

/// Constructor stored in the registry.
pub type ArtifactConstructor = Arc<dyn Fn(&ArtifactContext) -> anyhow::Result<Artifact> + Send + Sync + 'static>;

/// A registry of artifact constructors keyed by reference name.
#[derive(Default)]
pub struct ArtifactRegistry {
  constructors: RwLock<HashMap<String, ArtifactConstructor>>,
}

impl ArtifactRegistry {
  pub fn new() -> Self {
    Self::default()
  }

  /// Registers `constructor` under `ref_name`, replacing any previous registration.
  pub fn register(
    &self,
    ref_name: impl Into<String>,
    constructor: impl Fn(&ArtifactContext) -> anyhow::Result<Artifact> + Send + Sync + 'static,
  ) {
    let ref_name = ref_name.into();
    event!(Level::DEBUG, %ref_name, "Registering artifact constructor.");
    let previous = self.constructors.write().insert(ref_name.clone(), Arc::new(constructor));
    if previous.is_some() {
      event!(Level::WARN, %ref_name, "Artifact constructor replaced an existing registration.");
    }
  }

  pub fn contains(&self, ref_name: &str) -> bool {
    self.constructors.read().contains_key(ref_name)
  }

  pub fn len(&self) -> usize {
    self.constructors.read().len()
  }

  pub fn is_empty(&self) -> bool {
    self.constructors.read().is_empty()
  }
}

#[async_trait]
impl ArtifactFactory for ArtifactRegistry {
  #[instrument(name = "ArtifactRegistry::create", skip(self, context), err(Display))]
  async fn create(&self, ref_name: &str, context: &ArtifactContext) -> BatchResult<Artifact> {
    // Clone the constructor out so the lock is released before it runs.
    let constructor = self.constructors.read().get(ref_name).cloned().ok_or_else(|| {
      event!(Level::ERROR, "No artifact registered for reference.");
      BatchError::ArtifactNotFound {
        ref_name: ref_name.to_string(),
      }
    })?;

    let artifact = constructor(context).map_err(|source| BatchError::ArtifactCreation {
      ref_name: ref_name.to_string(),
      source,
    })?;
    event!(Level::DEBUG, artifact = %artifact.name(), "Artifact created.");
    Ok(artifact)
  }
}
