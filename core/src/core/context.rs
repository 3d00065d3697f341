// batchrun/src/core/context.rs

//! Defines `ApplicationMetaData` and the type-keyed `ArtifactContext` handed to
//! artifact factories.

use std::any::{type_name, Any};
use std::collections::HashMap;
use std::sync::Arc;

/// Application-level metadata owned by a job instance.
///
/// The runner never inspects it; it only forwards it to artifact creation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApplicationMetaData {
  pub application_name: String,
  pub properties: HashMap<String, String>,
}

impl ApplicationMetaData {
  pub fn new(application_name: impl Into<String>) -> Self {
    Self {
      application_name: application_name.into(),
      properties: HashMap::new(),
    }
  }

  pub fn with_property(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
    self.properties.insert(key.into(), value.into());
    self
  }
}

/// Lookup context passed to `ArtifactFactory::create`.
///
/// Entries are keyed by the type identifier (`std::any::type_name`) of the value
/// they hold and shared read-only through `Arc`.
#[derive(Clone, Default)]
pub struct ArtifactContext {
  entries: HashMap<String, Arc<dyn Any + Send + Sync>>,
}

impl ArtifactContext {
  pub fn new() -> Self {
    Self::default()
  }

  /// The context the runner builds for a step: the job's application metadata
  /// keyed by its type identifier.
  pub fn for_application(metadata: Arc<ApplicationMetaData>) -> Self {
    let mut ctx = Self::new();
    ctx.insert_shared(metadata);
    ctx
  }

  /// The key under which a value of type `T` is stored.
  pub fn key_of<T: 'static>() -> &'static str {
    type_name::<T>()
  }

  pub fn insert<T: Any + Send + Sync>(&mut self, value: T) {
    self.insert_shared(Arc::new(value));
  }

  pub fn insert_shared<T: Any + Send + Sync>(&mut self, value: Arc<T>) {
    self.entries.insert(Self::key_of::<T>().to_string(), value);
  }

  /// Returns the entry for `T`, or `None` if it is absent or stored under a different type.
  pub fn get<T: Any + Send + Sync>(&self) -> Option<Arc<T>> {
    self
      .entries
      .get(Self::key_of::<T>())
      .cloned()
      .and_then(|entry| entry.downcast::<T>().ok())
  }

  pub fn application_metadata(&self) -> Option<Arc<ApplicationMetaData>> {
    self.get::<ApplicationMetaData>()
  }

  pub fn contains_key(&self, key: &str) -> bool {
    self.entries.contains_key(key)
  }

  pub fn keys(&self) -> impl Iterator<Item = &str> {
    self.entries.keys().map(String::as_str)
  }

  pub fn len(&self) -> usize {
    self.entries.len()
  }

  pub fn is_empty(&self) -> bool {
    self.entries.is_empty()
  }
}

impl std::fmt::Debug for ArtifactContext {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("ArtifactContext")
      .field("keys", &self.entries.keys().collect::<Vec<_>>())
      .finish()
  }
}
