use async_trait::async_trait;
use buildpipe_context::BuildContext;
use buildpipe_task::{ExecuteResult, TaskError, TaskId};

use crate::result::TaskResultsList;

/// A unit of work run by the pipeline.
///
/// Only [`execute`](Self::execute) is required. The hooks default to no-ops,
/// which the pipeline treats the same as a task without that hook.
#[async_trait]
pub trait BuildTask: Send + Sync {
  fn id(&self) -> &TaskId;

  fn description(&self) -> Option<&str> {
    None
  }

  /// Serialized ids of the tasks this one depends on. A dependency without a
  /// name refers to every task of that owner.
  fn dependencies(&self) -> &[String] {
    &[]
  }

  /// Label used in reports, `id (description)`.
  fn label(&self) -> String {
    match self.description() {
      Some(description) => format!("{} ({})", self.id(), description),
      None => self.id().to_string(),
    }
  }

  /// Runs once per queue entry before any task executes.
  async fn pre_build(&self, _context: &BuildContext) -> Result<(), TaskError> {
    Ok(())
  }

  async fn execute(&self, context: &BuildContext) -> Result<ExecuteResult, TaskError>;

  /// Runs once per queue entry after all tasks, with the results of the whole
  /// run.
  async fn post_build(
    &self,
    _context: &BuildContext,
    _results: &TaskResultsList,
  ) -> Result<(), TaskError> {
    Ok(())
  }
}
