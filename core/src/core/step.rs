// batchrun/src/core/step.rs

//! Defines the immutable description of a job step and its shape validation.

use crate::error::{BatchError, BatchResult};

/// Reference to the single artifact that performs a batchlet step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchletSpec {
  /// Symbolic name resolved by the artifact factory.
  pub ref_name: String,
}

impl BatchletSpec {
  pub fn new(ref_name: impl Into<String>) -> Self {
    Self {
      ref_name: ref_name.into(),
    }
  }
}

/// Reader/processor/writer references of a chunk-oriented step.
/// Only carried for shape validation; chunk steps are never executed here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChunkSpec {
  pub reader: String,
  pub processor: Option<String>,
  pub writer: String,
  pub item_count: u32,
}

/// Definition of a job step, as produced by the job metadata loader.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepDefinition {
  pub id: String,
  pub chunk: Option<ChunkSpec>,
  pub batchlet: Option<BatchletSpec>,
}

/// The validated shape of a step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepKind<'a> {
  Batchlet(&'a BatchletSpec),
  Chunk(&'a ChunkSpec),
}

impl StepKind<'_> {
  pub fn label(&self) -> &'static str {
    match self {
      StepKind::Batchlet(_) => "batchlet",
      StepKind::Chunk(_) => "chunk",
    }
  }
}

impl StepDefinition {
  pub fn batchlet(id: impl Into<String>, ref_name: impl Into<String>) -> Self {
    Self {
      id: id.into(),
      chunk: None,
      batchlet: Some(BatchletSpec::new(ref_name)),
    }
  }

  pub fn chunk(id: impl Into<String>, chunk: ChunkSpec) -> Self {
    Self {
      id: id.into(),
      chunk: Some(chunk),
      batchlet: None,
    }
  }

  /// Checks the chunk/batchlet exclusivity and returns which kind of step this is.
  ///
  /// A step declaring both, or neither, is a malformed job definition.
  pub fn kind(&self) -> BatchResult<StepKind<'_>> {
    match (&self.chunk, &self.batchlet) {
      (Some(_), Some(_)) => Err(BatchError::configuration(
        &self.id,
        "a step cannot be both chunk-type and batchlet-type",
      )),
      (None, None) => Err(BatchError::configuration(
        &self.id,
        "a step must declare either a chunk or a batchlet",
      )),
      (Some(chunk), None) => Ok(StepKind::Chunk(chunk)),
      (None, Some(batchlet)) => Ok(StepKind::Batchlet(batchlet)),
    }
  }
}
