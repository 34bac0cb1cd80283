use std::collections::HashMap;

use crate::context::BuildContext;

/// Mapping from environment id to its [`BuildContext`].
///
/// Populate it with [`insert`](Self::insert) or by collecting contexts, then
/// hand it to the pipeline (usually behind an `Arc`). The pipeline only reads
/// from it.
#[derive(Debug, Clone, Default)]
pub struct ContextRegistry {
  contexts: HashMap<String, BuildContext>,
}

impl ContextRegistry {
  pub fn new() -> Self {
    Self::default()
  }

  /// Register a context under its own `env_id`, replacing any previous one.
  pub fn insert(&mut self, context: BuildContext) -> Option<BuildContext> {
    self.contexts.insert(context.env_id.clone(), context)
  }

  pub fn with_context(mut self, context: BuildContext) -> Self {
    self.insert(context);
    self
  }

  pub fn get(&self, env_id: &str) -> Option<&BuildContext> {
    self.contexts.get(env_id)
  }

  pub fn contains(&self, env_id: &str) -> bool {
    self.contexts.contains_key(env_id)
  }

  /// Registered environment ids, sorted.
  pub fn env_ids(&self) -> Vec<&str> {
    let mut ids: Vec<&str> = self.contexts.keys().map(String::as_str).collect();
    ids.sort_unstable();
    ids
  }

  pub fn len(&self) -> usize {
    self.contexts.len()
  }

  pub fn is_empty(&self) -> bool {
    self.contexts.is_empty()
  }
}

impl FromIterator<BuildContext> for ContextRegistry {
  fn from_iter<T: IntoIterator<Item = BuildContext>>(iter: T) -> Self {
    let mut registry = Self::new();
    for context in iter {
      registry.insert(context);
    }
    registry
  }
}
