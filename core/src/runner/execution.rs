// batchrun/src/runner/execution.rs

//! Contains `StepExecutionRunner::run()`: shape validation, artifact creation,
//! lifecycle invocation and outcome reporting for one step.

use crate::artifact::{locate_hook, Artifact, Hook};
use crate::core::context::ArtifactContext;
use crate::core::execution::BatchStatus;
use crate::core::outcome::{FailureKind, StepOutcome};
use crate::core::phase::LifecyclePhase;
use crate::core::step::StepKind;
use crate::error::{BatchError, BatchResult};
use crate::events::StepEvent;
use crate::runner::definition::StepExecutionRunner;

use futures_util::FutureExt;
use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{event, instrument, span, Instrument, Level};

/// How far `invoke_lifecycle_methods` got without a fault.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhaseProgress {
  /// Every phase was either run or skipped for lack of a hook.
  Completed,
  /// Cancellation was observed before `next_phase` started.
  Stopped { next_phase: LifecyclePhase },
}

impl StepExecutionRunner {
  /// Executes the step and returns its outcome.
  ///
  /// Only a malformed step definition (chunk and batchlet both declared, or
  /// neither) is returned as `Err`; it is raised before any artifact is created.
  /// Every other failure becomes `StepOutcome::Failed`. In all cases the
  /// execution record ends in a terminal status, and outcomes are reported to
  /// the job run.
  #[instrument(
    name = "StepExecutionRunner::run",
    skip_all,
    fields(
      job = %self.job.job_name(),
      step = %self.step.id,
      execution_id = self.execution.id(),
    ),
    err(Display)
  )]
  pub async fn run(self) -> BatchResult<StepOutcome> {
    self.execution.mark_started();
    self.emit(
      Level::DEBUG,
      StepEvent::Started {
        step: self.step.id.clone(),
        execution_id: self.execution.id(),
      },
    );

    let step = Arc::clone(&self.step);
    let ref_name = match step.kind() {
      Ok(StepKind::Batchlet(batchlet)) => batchlet.ref_name.as_str(),
      Ok(kind @ StepKind::Chunk(_)) => {
        let err = BatchError::UnsupportedStep {
          step_name: step.id.clone(),
          kind: kind.label(),
        };
        return Ok(self.conclude(StepOutcome::failed(FailureKind::UnsupportedStep, err)));
      }
      Err(err) => {
        event!(Level::ERROR, error = %err, "Step definition rejected.");
        self.execution.finish(BatchStatus::Failed, Some(err.to_string()));
        self.emit(
          Level::ERROR,
          StepEvent::Rejected {
            step: step.id.clone(),
            reason: err.to_string(),
          },
        );
        return Err(err);
      }
    };

    if self.cancellation.is_cancelled() {
      self.emit(
        Level::INFO,
        StepEvent::Stopped {
          step: step.id.clone(),
          next_phase: None,
        },
      );
      return Ok(self.conclude(StepOutcome::Stopped));
    }

    let context = ArtifactContext::for_application(self.job.application_metadata());
    let factory = self.job.artifact_factory();
    event!(Level::DEBUG, %ref_name, "Creating artifact.");
    let created = AssertUnwindSafe(factory.create(ref_name, &context))
      .catch_unwind()
      .await
      .unwrap_or_else(|payload| {
        Err(BatchError::ArtifactCreation {
          ref_name: ref_name.to_string(),
          source: anyhow::anyhow!("artifact constructor panicked: {}", panic_message(payload.as_ref())),
        })
      });
    let artifact = match created {
      Ok(artifact) => artifact,
      Err(err) => {
        event!(Level::ERROR, %ref_name, error = %err, "Artifact creation failed.");
        let err = match err {
          err @ (BatchError::ArtifactNotFound { .. } | BatchError::ArtifactCreation { .. }) => err,
          other => BatchError::ArtifactCreation {
            ref_name: ref_name.to_string(),
            source: anyhow::Error::new(other),
          },
        };
        return Ok(self.conclude(StepOutcome::failed(FailureKind::ArtifactCreation, err)));
      }
    };
    self.emit(
      Level::DEBUG,
      StepEvent::ArtifactCreated {
        step: step.id.clone(),
        artifact: artifact.name().to_string(),
      },
    );

    let outcome = match self.invoke_lifecycle_methods(&artifact).await {
      Ok(PhaseProgress::Completed) => StepOutcome::Succeeded,
      Ok(PhaseProgress::Stopped { .. }) => StepOutcome::Stopped,
      Err(err) => StepOutcome::failed(FailureKind::of_lifecycle(&err), err),
    };
    // The artifact lives for exactly one step execution.
    drop(artifact);
    Ok(self.conclude(outcome))
  }

  /// Drives `artifact` through BeginStep, Process and EndStep, in that order.
  ///
  /// A phase without a hook is reported and skipped. The first hook fault
  /// ends iteration and is returned; later phases never run.
  pub async fn invoke_lifecycle_methods(&self, artifact: &Artifact) -> BatchResult<PhaseProgress> {
    for phase in LifecyclePhase::ORDERED {
      if self.cancellation.is_cancelled() {
        event!(Level::INFO, %phase, "Cancellation observed, not starting phase.");
        self.emit(
          Level::INFO,
          StepEvent::Stopped {
            step: self.step.id.clone(),
            next_phase: Some(phase),
          },
        );
        return Ok(PhaseProgress::Stopped { next_phase: phase });
      }

      let Some(hook) = locate_hook(artifact, phase) else {
        self.emit(
          self.config.missing_hook_level,
          StepEvent::HookMissing {
            step: self.step.id.clone(),
            phase,
            artifact: artifact.name().to_string(),
          },
        );
        continue;
      };

      let phase_span = span!(Level::DEBUG, "lifecycle_phase", %phase, artifact = %artifact.name());
      self.invoke_hook(phase, hook).instrument(phase_span).await?;
      self.emit(
        Level::DEBUG,
        StepEvent::PhaseCompleted {
          step: self.step.id.clone(),
          phase,
        },
      );
    }
    Ok(PhaseProgress::Completed)
  }

  async fn invoke_hook(&self, phase: LifecyclePhase, hook: &Hook) -> BatchResult<()> {
    event!(Level::TRACE, "Invoking hook.");
    // A panicking hook fails the step like an error would.
    let hook_fut = AssertUnwindSafe(async { hook().await })
      .catch_unwind()
      .map(|caught| {
        caught.unwrap_or_else(|payload| Err(anyhow::anyhow!("hook panicked: {}", panic_message(payload.as_ref()))))
      });
    let result = match self.config.hook_timeout {
      Some(limit) => match tokio::time::timeout(limit, hook_fut).await {
        Ok(result) => result,
        Err(_elapsed) => {
          event!(Level::ERROR, timeout = ?limit, "Hook timed out.");
          return Err(BatchError::HookTimeout {
            step_name: self.step.id.clone(),
            phase,
            timeout: limit,
          });
        }
      },
      None => hook_fut.await,
    };

    result.map_err(|source| {
      event!(Level::ERROR, error = %source, "Hook failed.");
      BatchError::HookInvocation {
        step_name: self.step.id.clone(),
        phase,
        source,
      }
    })
  }

  /// Records the terminal status, reports it and hands the outcome back.
  fn conclude(self, outcome: StepOutcome) -> StepOutcome {
    let step = self.step.id.clone();
    match &outcome {
      StepOutcome::Succeeded => self.emit(Level::INFO, StepEvent::Succeeded { step }),
      StepOutcome::Failed(failure) => self.emit(
        Level::WARN,
        StepEvent::Failed {
          step,
          kind: failure.kind,
          reason: failure.cause.to_string(),
        },
      ),
      // Already reported where cancellation was observed.
      StepOutcome::Stopped => {}
    }

    self
      .execution
      .finish(outcome.batch_status(), outcome.failure().map(|f| f.cause.to_string()));
    self.job.step_finished(&self.execution, &outcome);
    outcome
  }

  /// Submits the runner to the tokio executor as a single task.
  pub fn spawn(self) -> JoinHandle<BatchResult<StepOutcome>> {
    tokio::spawn(self.run())
  }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
  if let Some(msg) = payload.downcast_ref::<&'static str>() {
    msg.to_string()
  } else if let Some(msg) = payload.downcast_ref::<String>() {
    msg.clone()
  } else {
    "non-string panic payload".to_string()
  }
}
