use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// A component built by an environment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Component {
  pub id: String,
  /// Directory holding the component's sources and build outputs.
  pub root_dir: PathBuf,
}

impl Component {
  pub fn new(id: impl Into<String>, root_dir: impl Into<PathBuf>) -> Self {
    Self {
      id: id.into(),
      root_dir: root_dir.into(),
    }
  }
}

/// Everything a task operates on for one environment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuildContext {
  pub env_id: String,
  pub components: Vec<Component>,
  #[serde(default)]
  pub metadata: serde_json::Map<String, serde_json::Value>,
}

impl BuildContext {
  pub fn new(env_id: impl Into<String>, components: Vec<Component>) -> Self {
    Self {
      env_id: env_id.into(),
      components,
      metadata: serde_json::Map::new(),
    }
  }

  pub fn with_metadata(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
    self.metadata.insert(key.into(), value);
    self
  }

  /// Get a component by ID.
  pub fn component(&self, component_id: &str) -> Option<&Component> {
    self.components.iter().find(|c| c.id == component_id)
  }

  pub fn component_ids(&self) -> impl Iterator<Item = &str> {
    self.components.iter().map(|c| c.id.as_str())
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use serde_json::json;

  #[test]
  fn test_component_lookup() {
    let context = BuildContext::new(
      "react",
      vec![
        Component::new("ui/button", "/ws/button"),
        Component::new("ui/card", "/ws/card"),
      ],
    )
    .with_metadata("bundler", json!("vite"));

    assert_eq!(context.component_ids().collect::<Vec<_>>(), vec!["ui/button", "ui/card"]);
    assert_eq!(
      context.component("ui/card").unwrap().root_dir,
      PathBuf::from("/ws/card")
    );
    assert!(context.component("ui/ghost").is_none());
    assert_eq!(context.metadata["bundler"], "vite");
  }
}
