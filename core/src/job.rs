// batchrun/src/job.rs

//! Defines `JobRunContext`, the view of the owning job run a step runner needs,
//! and `JobRun`, an in-memory implementation that records step outcomes.

use crate::core::context::ApplicationMetaData;
use crate::core::execution::{BatchStatus, StepExecution};
use crate::core::outcome::{FailureKind, StepOutcome};
use crate::core::step::StepDefinition;
use crate::factory::ArtifactFactory;

use parking_lot::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{event, Level};

/// What a step runner consumes from the job run that owns it.
pub trait JobRunContext: Send + Sync {
  fn job_name(&self) -> &str;

  /// Metadata forwarded to every artifact this job creates.
  fn application_metadata(&self) -> Arc<ApplicationMetaData>;

  fn artifact_factory(&self) -> Arc<dyn ArtifactFactory>;

  /// Receives each step's outcome once the step has reached a terminal status.
  fn step_finished(&self, execution: &StepExecution, outcome: &StepOutcome);
}

/// Summary of one finished step, as recorded by [`JobRun`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepReport {
  pub step_name: String,
  pub execution_id: u64,
  pub status: BatchStatus,
  pub failure_kind: Option<FailureKind>,
  pub failure_reason: Option<String>,
}

/// A job run holding its application metadata and artifact factory, and
/// collecting the reports of the steps it ran.
pub struct JobRun {
  name: String,
  metadata: Arc<ApplicationMetaData>,
  factory: Arc<dyn ArtifactFactory>,
  next_execution_id: AtomicU64,
  reports: Mutex<Vec<StepReport>>,
}

impl JobRun {
  pub fn new(name: impl Into<String>, metadata: ApplicationMetaData, factory: Arc<dyn ArtifactFactory>) -> Self {
    Self {
      name: name.into(),
      metadata: Arc::new(metadata),
      factory,
      next_execution_id: AtomicU64::new(1),
      reports: Mutex::new(Vec::new()),
    }
  }

  /// Allocates a fresh execution record for `step`.
  pub fn new_step_execution(&self, step: &StepDefinition) -> StepExecution {
    let id = self.next_execution_id.fetch_add(1, Ordering::Relaxed);
    StepExecution::new(id, step.id.clone())
  }

  pub fn reports(&self) -> Vec<StepReport> {
    self.reports.lock().clone()
  }

  pub fn report_for(&self, step_name: &str) -> Option<StepReport> {
    self.reports.lock().iter().rev().find(|r| r.step_name == step_name).cloned()
  }
}

impl JobRunContext for JobRun {
  fn job_name(&self) -> &str {
    &self.name
  }

  fn application_metadata(&self) -> Arc<ApplicationMetaData> {
    Arc::clone(&self.metadata)
  }

  fn artifact_factory(&self) -> Arc<dyn ArtifactFactory> {
    Arc::clone(&self.factory)
  }

  fn step_finished(&self, execution: &StepExecution, outcome: &StepOutcome) {
    let failure = outcome.failure();
    let report = StepReport {
      step_name: execution.step_name().to_string(),
      execution_id: execution.id(),
      status: outcome.batch_status(),
      failure_kind: failure.map(|f| f.kind),
      failure_reason: failure.map(|f| f.cause.to_string()),
    };
    event!(Level::DEBUG, job = %self.name, step = %report.step_name, status = %report.status, "Step report recorded.");
    self.reports.lock().push(report);
  }
}
