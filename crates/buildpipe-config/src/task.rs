use serde::{Deserialize, Serialize};

/// A task backed by shell commands.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TaskDef {
  /// Canonical task id, `owner` or `owner:name`
  pub id: String,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub description: Option<String>,
  /// Ids of tasks this one depends on
  #[serde(default)]
  pub dependencies: Vec<String>,
  /// Run once per queue entry before any task executes
  #[serde(skip_serializing_if = "Option::is_none")]
  pub pre_build: Option<String>,
  /// Run in every component directory
  pub command: String,
  /// Run once per queue entry after all tasks
  #[serde(skip_serializing_if = "Option::is_none")]
  pub post_build: Option<String>,
  #[serde(default)]
  pub artifacts: Vec<ArtifactDef>,
}

/// Declared output of a task.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ArtifactDef {
  pub name: String,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub description: Option<String>,
  /// Globs relative to the component directory, `!` to exclude
  pub patterns: Vec<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub root_dir: Option<String>,
}
