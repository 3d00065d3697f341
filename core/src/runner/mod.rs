// batchrun/src/runner/mod.rs

//! Defines the `StepExecutionRunner`, its construction and its execution logic.

pub mod definition;
pub mod execution;

pub use definition::StepExecutionRunner;
pub use execution::PhaseProgress;
