//! The build pipe.

use std::sync::Arc;
use std::time::{Duration, Instant};

use buildpipe_artifact::ArtifactGenerator;
use buildpipe_context::{BuildContext, ContextRegistry};
use buildpipe_task::TaskId;
use chrono::Utc;
use tracing::{debug, error, info, instrument};

use crate::error::PipelineError;
use crate::events::{PipelineEvent, PipelineReporter, ProgressLogger};
use crate::queue::{QueueEntry, TasksQueue};
use crate::result::{SkippedTask, TaskResult, TaskResultsList};
use crate::task::BuildTask;

/// Runs a [`TasksQueue`] through pre-build, execution and post-build.
///
/// A pipe is consumed by [`execute`](Self::execute), so failure tracking
/// never leaks from one run into another.
pub struct BuildPipe {
  queue: TasksQueue,
  registry: Arc<ContextRegistry>,
  reporter: Arc<dyn PipelineReporter>,
  artifact_generator: Arc<dyn ArtifactGenerator>,
}

/// Mutable state of a single run.
#[derive(Default)]
struct RunState {
  /// Failed tasks, in discovery order.
  failed_tasks: Vec<TaskId>,
  /// The first failed task found among a later task's dependencies. Once
  /// set, every remaining entry is skipped.
  failed_dependency: Option<TaskId>,
  results: Vec<TaskResult>,
  skipped: Vec<SkippedTask>,
}

impl RunState {
  fn update_failed_dependency(&mut self, task: &dyn BuildTask) -> Result<(), PipelineError> {
    if self.failed_dependency.is_some() || self.failed_tasks.is_empty() {
      return Ok(());
    }

    for dependency in task.dependencies() {
      let reference = parse_dependency(task, dependency)?;
      if let Some(failed) = self.failed_tasks.iter().find(|f| reference.matches(f)) {
        self.failed_dependency = Some(failed.clone());
        break;
      }
    }

    Ok(())
  }
}

impl BuildPipe {
  pub fn new(
    queue: TasksQueue,
    registry: Arc<ContextRegistry>,
    reporter: Arc<dyn PipelineReporter>,
    artifact_generator: Arc<dyn ArtifactGenerator>,
  ) -> Self {
    Self {
      queue,
      registry,
      reporter,
      artifact_generator,
    }
  }

  pub fn queue(&self) -> &TasksQueue {
    &self.queue
  }

  /// Check that every entry has a build context and that every declared
  /// dependency is a valid task id.
  pub fn validate(&self) -> Result<(), PipelineError> {
    for entry in &self.queue {
      self.context_for(entry)?;
      for dependency in entry.task.dependencies() {
        parse_dependency(entry.task.as_ref(), dependency)?;
      }
    }
    Ok(())
  }

  /// Run the whole pipeline and return the results of every executed entry.
  #[instrument(name = "pipeline_execute", skip(self), fields(tasks = self.queue.len()))]
  pub async fn execute(self) -> Result<TaskResultsList, PipelineError> {
    info!(
      tasks = self.queue.len(),
      envs = self.registry.len(),
      "pipeline_started"
    );

    let result = self.run().await;

    match &result {
      Ok(results) => {
        info!(
          executed = results.len(),
          skipped = results.skipped().len(),
          failed = results.failed_tasks().len(),
          "pipeline_completed"
        );
      }
      Err(e) => {
        error!(error = %e, "pipeline_aborted");
      }
    }

    result
  }

  async fn run(&self) -> Result<TaskResultsList, PipelineError> {
    self.validate()?;
    self.execute_pre_build().await?;

    let mut state = RunState::default();
    let mut progress = ProgressLogger::start(self.reporter.clone(), "running tasks", self.queue.len());
    for entry in &self.queue {
      self.execute_task(entry, &mut state, &mut progress).await?;
    }
    progress.end();

    let results = TaskResultsList::new(state.results, state.skipped, state.failed_tasks);
    self.execute_post_build(&results).await?;

    Ok(results)
  }

  async fn execute_pre_build(&self) -> Result<(), PipelineError> {
    self.status("executing pre-build for all tasks");

    for entry in &self.queue {
      let context = self.context_for(entry)?;
      debug!(task = %entry.task.id(), env_id = %entry.env_id, "pre_build");

      if let Err(source) = entry.task.pre_build(context).await {
        self.failure(format!(
          "env: {}, task \"{}\" threw an error during pre-build",
          entry.env_id,
          entry.task.id()
        ));
        return Err(PipelineError::PreBuild {
          task_id: entry.task.id().clone(),
          env_id: entry.env_id.clone(),
          source,
        });
      }
    }

    self.reporter.notify(PipelineEvent::Success { message: None });
    Ok(())
  }

  async fn execute_task(
    &self,
    entry: &QueueEntry,
    state: &mut RunState,
    progress: &mut ProgressLogger,
  ) -> Result<(), PipelineError> {
    let task = &entry.task;
    let task_id = task.id();
    let env_id = &entry.env_id;

    progress.log_progress(format!("env \"{}\", task \"{}\"", env_id, task.label()));

    let context = self.context_for(entry)?;

    state.update_failed_dependency(task.as_ref())?;
    if let Some(cause) = &state.failed_dependency {
      debug!(task = %task_id, env_id = %env_id, cause = %cause, "task_skipped");
      self.reporter.notify(PipelineEvent::Warning {
        message: format!(
          "env: {}, task \"{}\" has skipped due to \"{}\" failure",
          env_id, task_id, cause
        ),
      });
      state.skipped.push(SkippedTask {
        task_id: task_id.clone(),
        env_id: env_id.clone(),
        cause: cause.clone(),
      });
      return Ok(());
    }

    let started = Instant::now();
    let start_time = Utc::now();

    let result = match task.execute(context).await {
      Ok(result) => result,
      Err(source) => {
        self.failure(format!("env: {}, task \"{}\" threw an error", env_id, task_id));
        return Err(PipelineError::Execute {
          task_id: task_id.clone(),
          env_id: env_id.clone(),
          source,
        });
      }
    };

    let artifacts = if result.has_errors() {
      debug!(
        task = %task_id,
        env_id = %env_id,
        failed_components = result.failed_components().count(),
        "task_failed"
      );
      self.failure(format!("env: {}, task \"{}\" has failed", env_id, task_id));
      state.failed_tasks.push(task_id.clone());
      None
    } else {
      let elapsed = started.elapsed();
      debug!(
        task = %task_id,
        env_id = %env_id,
        elapsed_ms = elapsed.as_millis() as u64,
        "task_completed"
      );
      self.reporter.notify(PipelineEvent::Success {
        message: Some(format!(
          "env: {}, task \"{}\" has completed successfully in {}",
          env_id,
          task_id,
          format_duration(elapsed)
        )),
      });

      let artifacts = self
        .artifact_generator
        .generate(context, &result.artifact_definitions, task_id)
        .await
        .map_err(|source| PipelineError::Artifacts {
          task_id: task_id.clone(),
          env_id: env_id.clone(),
          source,
        })?;
      Some(artifacts)
    };

    state.results.push(TaskResult {
      task: Arc::clone(task),
      env_id: env_id.clone(),
      components_results: result.components_results,
      artifacts,
      start_time,
      end_time: Utc::now(),
    });

    Ok(())
  }

  async fn execute_post_build(&self, results: &TaskResultsList) -> Result<(), PipelineError> {
    self.status("executing post-build for all tasks");

    for entry in &self.queue {
      let context = self.context_for(entry)?;
      debug!(task = %entry.task.id(), env_id = %entry.env_id, "post_build");

      if let Err(source) = entry.task.post_build(context, results).await {
        self.failure(format!(
          "env: {}, task \"{}\" threw an error during post-build",
          entry.env_id,
          entry.task.id()
        ));
        return Err(PipelineError::PostBuild {
          task_id: entry.task.id().clone(),
          env_id: entry.env_id.clone(),
          source,
        });
      }
    }

    self.reporter.notify(PipelineEvent::Success { message: None });
    Ok(())
  }

  fn context_for(&self, entry: &QueueEntry) -> Result<&BuildContext, PipelineError> {
    self
      .registry
      .get(&entry.env_id)
      .ok_or_else(|| PipelineError::MissingContext {
        env_id: entry.env_id.clone(),
        task_id: entry.task.id().clone(),
      })
  }

  fn status(&self, message: &str) {
    self.reporter.notify(PipelineEvent::Status {
      message: message.to_string(),
    });
  }

  fn failure(&self, message: String) {
    self.reporter.notify(PipelineEvent::Failure { message });
  }
}

fn parse_dependency(task: &dyn BuildTask, dependency: &str) -> Result<TaskId, PipelineError> {
  TaskId::parse(dependency).map_err(|source| PipelineError::InvalidDependency {
    task_id: task.id().clone(),
    dependency: dependency.to_string(),
    source,
  })
}

fn format_duration(duration: Duration) -> String {
  let secs = duration.as_secs_f64();
  if secs >= 60.0 {
    format!("{}m {:.1}s", duration.as_secs() / 60, secs % 60.0)
  } else if secs >= 1.0 {
    format!("{:.2}s", secs)
  } else {
    format!("{}ms", duration.as_millis())
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use async_trait::async_trait;
  use buildpipe_task::{ExecuteResult, TaskError};

  struct StubTask {
    id: TaskId,
    dependencies: Vec<String>,
  }

  #[async_trait]
  impl BuildTask for StubTask {
    fn id(&self) -> &TaskId {
      &self.id
    }

    fn dependencies(&self) -> &[String] {
      &self.dependencies
    }

    async fn execute(&self, _context: &BuildContext) -> Result<ExecuteResult, TaskError> {
      Ok(ExecuteResult::default())
    }
  }

  fn stub(id: &str, dependencies: &[&str]) -> StubTask {
    StubTask {
      id: TaskId::parse(id).unwrap(),
      dependencies: dependencies.iter().map(|d| d.to_string()).collect(),
    }
  }

  #[test]
  fn test_no_cause_without_failures() {
    let mut state = RunState::default();
    state.update_failed_dependency(&stub("b", &["a"])).unwrap();
    assert!(state.failed_dependency.is_none());
  }

  #[test]
  fn test_first_dependency_match_wins() {
    let mut state = RunState {
      failed_tasks: vec![TaskId::parse("x:one").unwrap(), TaskId::parse("y:two").unwrap()],
      ..Default::default()
    };

    state
      .update_failed_dependency(&stub("c", &["unrelated", "y", "x"]))
      .unwrap();
    assert_eq!(state.failed_dependency, Some(TaskId::parse("y:two").unwrap()));
  }

  #[test]
  fn test_failed_set_scanned_in_discovery_order() {
    let mut state = RunState {
      failed_tasks: vec![TaskId::parse("x:one").unwrap(), TaskId::parse("x:two").unwrap()],
      ..Default::default()
    };

    state.update_failed_dependency(&stub("c", &["x"])).unwrap();
    assert_eq!(state.failed_dependency, Some(TaskId::parse("x:one").unwrap()));
  }

  #[test]
  fn test_recorded_cause_is_never_replaced() {
    let mut state = RunState {
      failed_tasks: vec![TaskId::parse("x:one").unwrap(), TaskId::parse("y:two").unwrap()],
      failed_dependency: Some(TaskId::parse("x:one").unwrap()),
      ..Default::default()
    };

    state.update_failed_dependency(&stub("c", &["y"])).unwrap();
    assert_eq!(state.failed_dependency, Some(TaskId::parse("x:one").unwrap()));
  }

  #[test]
  fn test_named_dependency_with_other_name_does_not_match() {
    let mut state = RunState {
      failed_tasks: vec![TaskId::parse("owner:y").unwrap()],
      ..Default::default()
    };

    state.update_failed_dependency(&stub("b", &["owner:x"])).unwrap();
    assert!(state.failed_dependency.is_none());
  }

  #[test]
  fn test_invalid_dependency_is_an_error() {
    let mut state = RunState {
      failed_tasks: vec![TaskId::parse("a").unwrap()],
      ..Default::default()
    };

    let err = state.update_failed_dependency(&stub("b", &["a:"])).unwrap_err();
    assert!(matches!(err, PipelineError::InvalidDependency { .. }));
  }

  #[test]
  fn test_format_duration() {
    assert_eq!(format_duration(Duration::from_millis(250)), "250ms");
    assert_eq!(format_duration(Duration::from_millis(1500)), "1.50s");
    assert_eq!(format_duration(Duration::from_secs(90)), "1m 30.0s");
  }
}
