use thiserror::Error;

/// Errors produced when building or parsing a [`TaskId`](crate::TaskId).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TaskIdError {
  #[error("task id owner must not be empty")]
  EmptyOwner,

  #[error("task name must not be empty when present (in '{0}')")]
  EmptyName(String),

  #[error("'{value}' contains the reserved separator ':'")]
  ReservedSeparator { value: String },
}

/// Error raised by a task hook (pre-build, execute, post-build).
///
/// These are infrastructural failures. Build failures of individual
/// components are reported as data through
/// [`ComponentResult::errors`](crate::ComponentResult) instead.
#[derive(Debug, Error)]
pub enum TaskError {
  #[error("{0}")]
  Message(String),

  #[error("io error: {0}")]
  Io(#[from] std::io::Error),

  #[error(transparent)]
  Other(#[from] Box<dyn std::error::Error + Send + Sync>),
}

impl TaskError {
  pub fn msg(message: impl Into<String>) -> Self {
    Self::Message(message.into())
  }
}
