// tests/common/mod.rs
#![allow(dead_code)] // Allow unused code in this common test module

use async_trait::async_trait;
use batchrun::{
  ApplicationMetaData, Artifact, ArtifactContext, ArtifactFactory, ArtifactRegistry, BatchResult, JobRun,
  LifecyclePhase, StepDefinition, StepEvent, StepEventSink, StepExecutionRunner,
};
use parking_lot::Mutex;
use std::sync::{
  atomic::{AtomicUsize, Ordering},
  Arc,
};
use tracing::Level;

// --- Shared call log for hooks ---
pub type CallLog = Arc<Mutex<Vec<String>>>;

pub fn new_call_log() -> CallLog {
  Arc::new(Mutex::new(Vec::new()))
}

/// Builds an artifact whose hooks append `label` to `log` for each `(phase, label)` pair.
pub fn recording_artifact(name: &str, log: &CallLog, hooks: &[(LifecyclePhase, &'static str)]) -> Artifact {
  let mut builder = Artifact::builder(name);
  for (phase, label) in hooks {
    let log = log.clone();
    let label = *label;
    builder = builder.hook(*phase, move || {
      let log = log.clone();
      async move {
        log.lock().push(label.to_string());
        tracing::debug!(target: "test_hooks", label, "hook executed");
        Ok::<(), anyhow::Error>(())
      }
    });
  }
  builder.build().expect("test artifact should build")
}

// --- Recording event sink ---
#[derive(Default)]
pub struct RecordingSink {
  events: Mutex<Vec<(Level, StepEvent)>>,
}

impl RecordingSink {
  pub fn new() -> Arc<Self> {
    Arc::new(Self::default())
  }

  pub fn events(&self) -> Vec<(Level, StepEvent)> {
    self.events.lock().clone()
  }

  pub fn missing_hooks(&self) -> Vec<(Level, LifecyclePhase)> {
    self
      .events
      .lock()
      .iter()
      .filter_map(|(level, ev)| match ev {
        StepEvent::HookMissing { phase, .. } => Some((*level, *phase)),
        _ => None,
      })
      .collect()
  }

  pub fn count_at(&self, level: Level) -> usize {
    self.events.lock().iter().filter(|(l, _)| *l == level).count()
  }
}

impl StepEventSink for RecordingSink {
  fn record(&self, level: Level, event: &StepEvent) {
    self.events.lock().push((level, event.clone()));
  }
}

// --- Factory that counts calls and remembers what it was asked for ---
pub struct CountingFactory {
  inner: ArtifactRegistry,
  calls: AtomicUsize,
  requests: Mutex<Vec<(String, ArtifactContext)>>,
}

impl CountingFactory {
  pub fn new(inner: ArtifactRegistry) -> Arc<Self> {
    Arc::new(Self {
      inner,
      calls: AtomicUsize::new(0),
      requests: Mutex::new(Vec::new()),
    })
  }

  pub fn calls(&self) -> usize {
    self.calls.load(Ordering::SeqCst)
  }

  pub fn requests(&self) -> Vec<(String, ArtifactContext)> {
    self.requests.lock().clone()
  }
}

#[async_trait]
impl ArtifactFactory for CountingFactory {
  async fn create(&self, ref_name: &str, context: &ArtifactContext) -> BatchResult<Artifact> {
    self.calls.fetch_add(1, Ordering::SeqCst);
    self.requests.lock().push((ref_name.to_string(), context.clone()));
    self.inner.create(ref_name, context).await
  }
}

// --- Job and runner assembly ---
pub fn test_metadata() -> ApplicationMetaData {
  ApplicationMetaData::new("test-app").with_property("env", "test")
}

pub fn job_with(factory: Arc<CountingFactory>) -> Arc<JobRun> {
  Arc::new(JobRun::new("test-job", test_metadata(), factory))
}

pub fn runner_for(job: &Arc<JobRun>, step: StepDefinition, sink: Arc<RecordingSink>) -> StepExecutionRunner {
  let execution = job.new_step_execution(&step);
  StepExecutionRunner::new(Arc::new(step), execution, job.clone()).with_sink(sink)
}

// --- Helper for Tracing Setup (call once per test run if needed) ---
use once_cell::sync::Lazy;
static TRACING_INIT: Lazy<()> = Lazy::new(|| {
  tracing_subscriber::fmt()
    .with_max_level(Level::DEBUG)
    .with_test_writer() // Important for tests to capture output
    .try_init()
    .ok(); // Allow multiple initializations in tests (ok if fails)
});

pub fn setup_tracing() {
  Lazy::force(&TRACING_INIT);
}
