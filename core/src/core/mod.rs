pub mod context;
pub mod execution;
pub mod outcome;
pub mod phase;
pub mod step;

// Re-export key types for easier access from other batchrun modules (and lib.rs)
pub use context::{ApplicationMetaData, ArtifactContext};
pub use execution::{BatchStatus, StepExecution, StepExecutionState};
pub use outcome::{FailureKind, StepFailure, StepOutcome};
pub use phase::LifecyclePhase;
pub use step::{BatchletSpec, ChunkSpec, StepDefinition, StepKind};
