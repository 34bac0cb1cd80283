//! Pipeline results.

use std::fmt;
use std::fmt::Write as _;
use std::sync::Arc;

use buildpipe_artifact::ComponentArtifacts;
use buildpipe_task::{ComponentResult, TaskId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::PipelineError;
use crate::task::BuildTask;

/// Result of one executed queue entry.
#[derive(Clone)]
pub struct TaskResult {
  pub task: Arc<dyn BuildTask>,
  pub env_id: String,
  pub components_results: Vec<ComponentResult>,
  /// Present if and only if no component reported an error.
  pub artifacts: Option<ComponentArtifacts>,
  pub start_time: DateTime<Utc>,
  pub end_time: DateTime<Utc>,
}

impl TaskResult {
  pub fn task_id(&self) -> &TaskId {
    self.task.id()
  }

  pub fn has_errors(&self) -> bool {
    self.components_results.iter().any(ComponentResult::has_errors)
  }

  pub fn status(&self) -> TaskStatus {
    if self.has_errors() {
      TaskStatus::Failed
    } else {
      TaskStatus::Succeeded
    }
  }

  pub fn duration(&self) -> chrono::Duration {
    self.end_time - self.start_time
  }

  /// Result of a single component, if the task reported one.
  pub fn component(&self, component_id: &str) -> Option<&ComponentResult> {
    self
      .components_results
      .iter()
      .find(|c| c.component_id == component_id)
  }
}

impl fmt::Debug for TaskResult {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("TaskResult")
      .field("task", &self.task.id().to_string())
      .field("env_id", &self.env_id)
      .field("components_results", &self.components_results)
      .field("artifacts", &self.artifacts)
      .field("start_time", &self.start_time)
      .field("end_time", &self.end_time)
      .finish()
  }
}

/// A queue entry that did not run because a task it depends on failed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedTask {
  pub task_id: TaskId,
  pub env_id: String,
  /// The failed task that caused the skip.
  pub cause: TaskId,
}

/// Terminal state of an executed entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
  Succeeded,
  Failed,
}

/// Results of a pipeline run, in execution order.
///
/// Skipped entries have no [`TaskResult`]; they are listed separately in
/// [`skipped`](Self::skipped).
#[derive(Debug, Clone, Default)]
pub struct TaskResultsList {
  results: Vec<TaskResult>,
  skipped: Vec<SkippedTask>,
  failed_tasks: Vec<TaskId>,
}

impl TaskResultsList {
  pub(crate) fn new(
    results: Vec<TaskResult>,
    skipped: Vec<SkippedTask>,
    failed_tasks: Vec<TaskId>,
  ) -> Self {
    Self {
      results,
      skipped,
      failed_tasks,
    }
  }

  pub fn results(&self) -> &[TaskResult] {
    &self.results
  }

  pub fn iter(&self) -> std::slice::Iter<'_, TaskResult> {
    self.results.iter()
  }

  pub fn len(&self) -> usize {
    self.results.len()
  }

  pub fn is_empty(&self) -> bool {
    self.results.is_empty()
  }

  /// First result of the given task.
  pub fn get(&self, task_id: &TaskId) -> Option<&TaskResult> {
    self.results.iter().find(|r| r.task_id() == task_id)
  }

  /// Result of the given task for one environment.
  pub fn get_for_env(&self, task_id: &TaskId, env_id: &str) -> Option<&TaskResult> {
    self
      .results
      .iter()
      .find(|r| r.task_id() == task_id && r.env_id == env_id)
  }

  pub fn results_for_env<'a>(&'a self, env_id: &'a str) -> impl Iterator<Item = &'a TaskResult> {
    self.results.iter().filter(move |r| r.env_id == env_id)
  }

  /// Every result reported for a component, paired with the task that
  /// produced it, in execution order.
  pub fn component_results<'a>(
    &'a self,
    component_id: &'a str,
  ) -> impl Iterator<Item = (&'a TaskId, &'a ComponentResult)> {
    self
      .results
      .iter()
      .filter_map(move |r| r.component(component_id).map(|c| (r.task_id(), c)))
  }

  pub fn skipped(&self) -> &[SkippedTask] {
    &self.skipped
  }

  /// Failed tasks, in the order their failures were discovered.
  pub fn failed_tasks(&self) -> &[TaskId] {
    &self.failed_tasks
  }

  /// True if no task failed.
  pub fn is_success(&self) -> bool {
    self.failed_tasks.is_empty()
  }

  pub fn has_errors(&self) -> bool {
    self.results.iter().any(TaskResult::has_errors)
  }

  /// Human readable summary of every component error, or `None` if the run
  /// had none.
  pub fn error_report(&self) -> Option<String> {
    let mut report = String::new();

    for result in self.results.iter().filter(|r| r.has_errors()) {
      let _ = writeln!(
        report,
        "env: {}, task \"{}\" has failed:",
        result.env_id,
        result.task.label()
      );
      for component in result.components_results.iter().filter(|c| c.has_errors()) {
        let _ = writeln!(report, "  {}:", component.component_id);
        for error in &component.errors {
          let _ = writeln!(report, "    {}", error);
        }
      }
    }

    if report.is_empty() {
      return None;
    }

    for skipped in &self.skipped {
      let _ = writeln!(
        report,
        "env: {}, task \"{}\" was skipped due to \"{}\" failure",
        skipped.env_id, skipped.task_id, skipped.cause
      );
    }

    Some(report.trim_end().to_string())
  }

  /// Turn component errors into a [`PipelineError::BuildFailed`].
  pub fn ensure_success(&self) -> Result<(), PipelineError> {
    match self.error_report() {
      Some(report) => Err(PipelineError::BuildFailed { report }),
      None => Ok(()),
    }
  }

  /// Serializable snapshot of the run.
  pub fn report(&self) -> RunReport {
    RunReport {
      success: self.is_success(),
      tasks: self.results.iter().map(TaskReport::from).collect(),
      skipped: self.skipped.clone(),
    }
  }
}

impl<'a> IntoIterator for &'a TaskResultsList {
  type Item = &'a TaskResult;
  type IntoIter = std::slice::Iter<'a, TaskResult>;

  fn into_iter(self) -> Self::IntoIter {
    self.iter()
  }
}

/// Serializable summary of a whole run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
  pub success: bool,
  pub tasks: Vec<TaskReport>,
  pub skipped: Vec<SkippedTask>,
}

/// Serializable summary of one executed entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskReport {
  pub task_id: TaskId,
  pub description: Option<String>,
  pub env_id: String,
  pub status: TaskStatus,
  pub start_time: DateTime<Utc>,
  pub end_time: DateTime<Utc>,
  pub duration_ms: i64,
  pub components: Vec<ComponentResult>,
  pub artifacts: Option<ComponentArtifacts>,
}

impl From<&TaskResult> for TaskReport {
  fn from(result: &TaskResult) -> Self {
    Self {
      task_id: result.task_id().clone(),
      description: result.task.description().map(str::to_string),
      env_id: result.env_id.clone(),
      status: result.status(),
      start_time: result.start_time,
      end_time: result.end_time,
      duration_ms: result.duration().num_milliseconds(),
      components: result.components_results.clone(),
      artifacts: result.artifacts.clone(),
    }
  }
}
