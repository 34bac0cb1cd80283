use serde::{Deserialize, Serialize};

use crate::env::EnvDef;
use crate::task::TaskDef;

/// A complete pipeline file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PipelineDef {
  pub name: String,
  #[serde(default)]
  pub envs: Vec<EnvDef>,
  #[serde(default)]
  pub tasks: Vec<TaskDef>,
  /// Entries in execution order. The order must already satisfy every
  /// declared dependency.
  #[serde(default)]
  pub queue: Vec<QueueEntryDef>,
}

impl PipelineDef {
  pub fn task(&self, id: &str) -> Option<&TaskDef> {
    self.tasks.iter().find(|t| t.id == id)
  }

  pub fn env(&self, id: &str) -> Option<&EnvDef> {
    self.envs.iter().find(|e| e.id == id)
  }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct QueueEntryDef {
  /// Id of a task in `tasks`
  pub task: String,
  /// Id of an environment in `envs`
  pub env: String,
}
