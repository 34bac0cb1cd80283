use serde::{Deserialize, Serialize};

/// A build environment and the components it builds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EnvDef {
  pub id: String,
  #[serde(default)]
  pub components: Vec<ComponentDef>,
  /// Free-form metadata handed to tasks through the build context.
  #[serde(default, skip_serializing_if = "serde_json::Map::is_empty")]
  pub metadata: serde_json::Map<String, serde_json::Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ComponentDef {
  /// Component id, e.g. "ui/button"
  pub id: String,
  /// Component directory, relative to the pipeline file
  pub path: String,
}
