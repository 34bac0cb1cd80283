//! Error types for pipeline execution.

use buildpipe_artifact::ArtifactError;
use buildpipe_task::{TaskError, TaskId, TaskIdError};
use thiserror::Error;

/// Errors that abort a pipeline run.
///
/// Component build failures are not errors at this level; they are recorded
/// in the results list. The exception is [`PipelineError::BuildFailed`],
/// which callers opt into through
/// [`TaskResultsList::ensure_success`](crate::TaskResultsList::ensure_success).
#[derive(Debug, Error)]
pub enum PipelineError {
  /// A queue entry references an environment with no build context.
  #[error("no build context registered for env '{env_id}' (task '{task_id}')")]
  MissingContext { env_id: String, task_id: TaskId },

  /// A task declares a dependency that is not a valid task id.
  #[error("task '{task_id}' declares an invalid dependency '{dependency}': {source}")]
  InvalidDependency {
    task_id: TaskId,
    dependency: String,
    #[source]
    source: TaskIdError,
  },

  /// A pre-build hook raised an error.
  #[error("pre-build of task '{task_id}' failed for env '{env_id}': {source}")]
  PreBuild {
    task_id: TaskId,
    env_id: String,
    #[source]
    source: TaskError,
  },

  /// A task's execute operation raised an error.
  #[error("task '{task_id}' threw an error for env '{env_id}': {source}")]
  Execute {
    task_id: TaskId,
    env_id: String,
    #[source]
    source: TaskError,
  },

  /// A post-build hook raised an error.
  #[error("post-build of task '{task_id}' failed for env '{env_id}': {source}")]
  PostBuild {
    task_id: TaskId,
    env_id: String,
    #[source]
    source: TaskError,
  },

  /// Artifacts of a successful task could not be generated.
  #[error("failed to generate artifacts of task '{task_id}' for env '{env_id}': {source}")]
  Artifacts {
    task_id: TaskId,
    env_id: String,
    #[source]
    source: ArtifactError,
  },

  /// At least one task reported component errors.
  #[error("build failed\n{report}")]
  BuildFailed { report: String },
}
