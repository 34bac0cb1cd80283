use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// A declared output of a task, resolved per component on success.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactDefinition {
  pub name: String,
  #[serde(default)]
  pub description: Option<String>,
  /// Glob patterns relative to the component directory. Patterns starting
  /// with `!` exclude matching files.
  pub patterns: Vec<String>,
  /// Sub-directory of the component directory to search in.
  #[serde(default)]
  pub root_dir: Option<PathBuf>,
}

impl ArtifactDefinition {
  pub fn new<I, S>(name: impl Into<String>, patterns: I) -> Self
  where
    I: IntoIterator<Item = S>,
    S: Into<String>,
  {
    Self {
      name: name.into(),
      description: None,
      patterns: patterns.into_iter().map(Into::into).collect(),
      root_dir: None,
    }
  }

  pub fn with_root_dir(mut self, root_dir: impl Into<PathBuf>) -> Self {
    self.root_dir = Some(root_dir.into());
    self
  }

  pub fn with_description(mut self, description: impl Into<String>) -> Self {
    self.description = Some(description.into());
    self
  }
}
