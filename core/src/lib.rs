// src/lib.rs

//! batchrun: executes a single batchlet-style step of a batch job.
//!
//! A step runner:
//!  - Validates the step definition (exactly one of chunk or batchlet).
//!  - Asks the job's artifact factory for a fresh artifact, passing the job's
//!    application metadata in a type-keyed context.
//!  - Drives the artifact through BeginStep, Process and EndStep, skipping phases
//!    the artifact does not implement and stopping at the first hook fault.
//!  - Records the terminal status on the step execution and reports an explicit
//!    `StepOutcome` to the job run.
//!  - Honours a per-hook timeout and a cancellation token checked between phases.

pub mod artifact;
pub mod config;
pub mod core;
pub mod error;
pub mod events;
pub mod factory;
pub mod job;
pub mod runner;

// --- Re-exports for the Public API ---

pub use crate::core::context::{ApplicationMetaData, ArtifactContext};
pub use crate::core::execution::{BatchStatus, StepExecution, StepExecutionState};
pub use crate::core::outcome::{FailureKind, StepFailure, StepOutcome};
pub use crate::core::phase::LifecyclePhase;
pub use crate::core::step::{BatchletSpec, ChunkSpec, StepDefinition, StepKind};

pub use crate::artifact::{locate_hook, Artifact, ArtifactBuilder, Hook};
pub use crate::factory::{ArtifactFactory, ArtifactRegistry};
pub use crate::job::{JobRun, JobRunContext, StepReport};

pub use crate::config::RunnerConfig;
pub use crate::events::{StepEvent, StepEventSink, TracingSink};
pub use crate::runner::{PhaseProgress, StepExecutionRunner};

pub use crate::error::{BatchError, BatchResult};

// Re-exported so callers need not depend on tokio-util directly.
pub use tokio_util::sync::CancellationToken;

/*
    Typical use:
    1. Register artifact constructors in an `ArtifactRegistry` under their reference names.
       Each constructor returns `Artifact::builder(name).begin_step(..).process(..).build()`.
    2. Create a `JobRun` with the job's `ApplicationMetaData` and the registry.
    3. For each step, allocate a `StepExecution` with `job.new_step_execution(&step)` and build
       a `StepExecutionRunner::new(step, execution, job)`.
    4. `runner.spawn()` (or `runner.run().await`) and act on the returned `StepOutcome`.
*/
