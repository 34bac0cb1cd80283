use std::fmt;
use std::sync::Arc;

use crate::task::BuildTask;

/// A task scheduled to run for one environment.
#[derive(Clone)]
pub struct QueueEntry {
  pub task: Arc<dyn BuildTask>,
  pub env_id: String,
}

impl QueueEntry {
  pub fn new(task: Arc<dyn BuildTask>, env_id: impl Into<String>) -> Self {
    Self {
      task,
      env_id: env_id.into(),
    }
  }
}

impl fmt::Debug for QueueEntry {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("QueueEntry")
      .field("task", &self.task.id().to_string())
      .field("env_id", &self.env_id)
      .finish()
  }
}

/// Ordered queue of entries.
///
/// The order must already respect every declared dependency; the pipeline
/// runs entries exactly in this order and never reorders them.
#[derive(Debug, Clone, Default)]
pub struct TasksQueue {
  entries: Vec<QueueEntry>,
}

impl TasksQueue {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn push(&mut self, task: Arc<dyn BuildTask>, env_id: impl Into<String>) {
    self.entries.push(QueueEntry::new(task, env_id));
  }

  pub fn iter(&self) -> std::slice::Iter<'_, QueueEntry> {
    self.entries.iter()
  }

  pub fn len(&self) -> usize {
    self.entries.len()
  }

  pub fn is_empty(&self) -> bool {
    self.entries.is_empty()
  }
}

impl FromIterator<QueueEntry> for TasksQueue {
  fn from_iter<T: IntoIterator<Item = QueueEntry>>(iter: T) -> Self {
    Self {
      entries: iter.into_iter().collect(),
    }
  }
}

impl<'a> IntoIterator for &'a TasksQueue {
  type Item = &'a QueueEntry;
  type IntoIter = std::slice::Iter<'a, QueueEntry>;

  fn into_iter(self) -> Self::IntoIter {
    self.iter()
  }
}
