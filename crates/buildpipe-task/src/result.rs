//! Results returned by a task's execute step.

use serde::{Deserialize, Serialize};

use crate::artifact::ArtifactDefinition;

/// Outcome of a task for a single component.
///
/// A non-empty `errors` list marks the component, and therefore the whole
/// task, as failed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ComponentResult {
  pub component_id: String,
  #[serde(default)]
  pub errors: Vec<String>,
  #[serde(default)]
  pub warnings: Vec<String>,
  #[serde(default)]
  pub metadata: serde_json::Map<String, serde_json::Value>,
}

impl ComponentResult {
  /// A successful result with no errors.
  pub fn ok(component_id: impl Into<String>) -> Self {
    Self {
      component_id: component_id.into(),
      ..Default::default()
    }
  }

  /// A failed result carrying the given errors.
  pub fn failed<I, S>(component_id: impl Into<String>, errors: I) -> Self
  where
    I: IntoIterator<Item = S>,
    S: Into<String>,
  {
    Self {
      component_id: component_id.into(),
      errors: errors.into_iter().map(Into::into).collect(),
      ..Default::default()
    }
  }

  pub fn with_warning(mut self, warning: impl Into<String>) -> Self {
    self.warnings.push(warning.into());
    self
  }

  pub fn with_metadata(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
    self.metadata.insert(key.into(), value);
    self
  }

  pub fn has_errors(&self) -> bool {
    !self.errors.is_empty()
  }
}

/// Everything a task's execute step reports back.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExecuteResult {
  pub components_results: Vec<ComponentResult>,
  /// Outputs to collect when the task succeeds.
  #[serde(default)]
  pub artifact_definitions: Vec<ArtifactDefinition>,
}

impl ExecuteResult {
  pub fn new(components_results: Vec<ComponentResult>) -> Self {
    Self {
      components_results,
      artifact_definitions: Vec::new(),
    }
  }

  pub fn with_artifacts(mut self, definitions: Vec<ArtifactDefinition>) -> Self {
    self.artifact_definitions = definitions;
    self
  }

  /// True if at least one component reported an error.
  pub fn has_errors(&self) -> bool {
    self.components_results.iter().any(ComponentResult::has_errors)
  }

  pub fn failed_components(&self) -> impl Iterator<Item = &ComponentResult> {
    self.components_results.iter().filter(|c| c.has_errors())
  }
}
