// batchrun/src/events.rs

//! Observability sink injected into each runner, plus the default
//! implementation that forwards to `tracing`.

use crate::core::outcome::FailureKind;
use crate::core::phase::LifecyclePhase;
use std::fmt;
use tracing::{event, Level};

/// Something worth reporting about a step execution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepEvent {
  Started { step: String, execution_id: u64 },
  /// The step definition was malformed; nothing was executed.
  Rejected { step: String, reason: String },
  ArtifactCreated { step: String, artifact: String },
  PhaseCompleted { step: String, phase: LifecyclePhase },
  /// The artifact declares no hook for this phase; the phase is skipped.
  HookMissing { step: String, phase: LifecyclePhase, artifact: String },
  Succeeded { step: String },
  Failed { step: String, kind: FailureKind, reason: String },
  /// Cancellation was observed; `next_phase` is the first phase that did not run.
  Stopped { step: String, next_phase: Option<LifecyclePhase> },
}

impl StepEvent {
  pub fn step(&self) -> &str {
    match self {
      StepEvent::Started { step, .. }
      | StepEvent::Rejected { step, .. }
      | StepEvent::ArtifactCreated { step, .. }
      | StepEvent::PhaseCompleted { step, .. }
      | StepEvent::HookMissing { step, .. }
      | StepEvent::Succeeded { step }
      | StepEvent::Failed { step, .. }
      | StepEvent::Stopped { step, .. } => step,
    }
  }
}

impl fmt::Display for StepEvent {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      StepEvent::Started { step, execution_id } => write!(f, "Step {} started (execution {})", step, execution_id),
      StepEvent::Rejected { step, reason } => write!(f, "Step {} rejected: {}", step, reason),
      StepEvent::ArtifactCreated { step, artifact } => write!(f, "Step {} created artifact {}", step, artifact),
      StepEvent::PhaseCompleted { step, phase } => write!(f, "Step {} completed {}", step, phase),
      StepEvent::HookMissing { step, phase, artifact } => {
        write!(f, "No method for {} on artifact {} (step {})", phase, artifact, step)
      }
      StepEvent::Succeeded { step } => write!(f, "Step {} succeeded", step),
      StepEvent::Failed { step, kind, reason } => write!(f, "Failed to run step {} ({}): {}", step, kind, reason),
      StepEvent::Stopped { step, next_phase: Some(phase) } => write!(f, "Step {} stopped before {}", step, phase),
      StepEvent::Stopped { step, next_phase: None } => write!(f, "Step {} stopped", step),
    }
  }
}

/// Receives the events of a step execution at the level the runner chose.
pub trait StepEventSink: Send + Sync {
  fn record(&self, level: Level, event: &StepEvent);
}

/// Forwards step events to the `tracing` dispatcher under the `batchrun::step` target.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl StepEventSink for TracingSink {
  fn record(&self, level: Level, step_event: &StepEvent) {
    let step = step_event.step();
    // event! needs a constant level.
    if level == Level::ERROR {
      event!(target: "batchrun::step", Level::ERROR, step, "{}", step_event);
    } else if level == Level::WARN {
      event!(target: "batchrun::step", Level::WARN, step, "{}", step_event);
    } else if level == Level::INFO {
      event!(target: "batchrun::step", Level::INFO, step, "{}", step_event);
    } else if level == Level::DEBUG {
      event!(target: "batchrun::step", Level::DEBUG, step, "{}", step_event);
    } else {
      event!(target: "batchrun::step", Level::TRACE, step, "{}", step_event);
    }
  }
}
