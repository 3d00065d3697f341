// batchrun/src/runner/definition.rs

//! Contains the `StepExecutionRunner` struct and its construction.

use crate::config::RunnerConfig;
use crate::core::execution::StepExecution;
use crate::core::step::StepDefinition;
use crate::events::{StepEvent, StepEventSink, TracingSink};
use crate::job::JobRunContext;

use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::Level;

/// Executes one step of a job run on behalf of that run.
///
/// A runner is built per (step, step execution, job run) and consumed by
/// [`StepExecutionRunner::run`], so it executes at most once.
pub struct StepExecutionRunner {
  pub(crate) step: Arc<StepDefinition>,
  pub(crate) execution: StepExecution,
  pub(crate) job: Arc<dyn JobRunContext>,
  pub(crate) config: RunnerConfig,
  pub(crate) sink: Arc<dyn StepEventSink>,
  pub(crate) cancellation: CancellationToken,
}

impl StepExecutionRunner {
  pub fn new(step: Arc<StepDefinition>, execution: StepExecution, job: Arc<dyn JobRunContext>) -> Self {
    Self {
      step,
      execution,
      job,
      config: RunnerConfig::default(),
      sink: Arc::new(TracingSink),
      cancellation: CancellationToken::new(),
    }
  }

  pub fn with_config(mut self, config: RunnerConfig) -> Self {
    self.config = config;
    self
  }

  /// Replaces the default `TracingSink`.
  pub fn with_sink(mut self, sink: Arc<dyn StepEventSink>) -> Self {
    self.sink = sink;
    self
  }

  /// Uses `token` as this step's stop signal. The token is checked before
  /// artifact creation and before every lifecycle phase.
  pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
    self.cancellation = token;
    self
  }

  pub fn step(&self) -> &StepDefinition {
    &self.step
  }

  /// The execution record this runner updates. Clone it to observe the step
  /// after the runner has been consumed.
  pub fn execution(&self) -> &StepExecution {
    &self.execution
  }

  pub fn cancellation_token(&self) -> CancellationToken {
    self.cancellation.clone()
  }

  pub(crate) fn emit(&self, level: Level, event: StepEvent) {
    self.sink.record(level, &event);
  }
}

impl std::fmt::Debug for StepExecutionRunner {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("StepExecutionRunner")
      .field("step", &self.step.id)
      .field("execution_id", &self.execution.id())
      .field("job", &self.job.job_name())
      .field("config", &self.config)
      .field("cancelled", &self.cancellation.is_cancelled())
      .finish()
  }
}
