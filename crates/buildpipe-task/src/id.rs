//! Canonical task identifiers.
//!
//! A task is identified by the id of the aspect that owns it plus an optional
//! task name. The canonical string form is `owner` or `owner:name`; the two
//! forms are parsed and printed by [`TaskId::parse`] and [`Display`], which
//! are inverses of each other for every valid id.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TaskIdError;

/// Separator between owner and name in the canonical form.
pub const SEPARATOR: char = ':';

/// Identifier of a build task.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TaskId {
  owner: String,
  name: Option<String>,
}

impl TaskId {
  /// Build an id from its parts, rejecting empty owners, empty names and
  /// parts containing the separator.
  pub fn new(owner: impl Into<String>, name: Option<String>) -> Result<Self, TaskIdError> {
    let owner = owner.into();
    if owner.is_empty() {
      return Err(TaskIdError::EmptyOwner);
    }
    if owner.contains(SEPARATOR) {
      return Err(TaskIdError::ReservedSeparator { value: owner });
    }
    if let Some(name) = &name {
      if name.is_empty() {
        return Err(TaskIdError::EmptyName(owner));
      }
      if name.contains(SEPARATOR) {
        return Err(TaskIdError::ReservedSeparator {
          value: name.clone(),
        });
      }
    }
    Ok(Self { owner, name })
  }

  /// Id with an owner only.
  pub fn owner_only(owner: impl Into<String>) -> Result<Self, TaskIdError> {
    Self::new(owner, None)
  }

  /// Id with both owner and task name.
  pub fn named(owner: impl Into<String>, name: impl Into<String>) -> Result<Self, TaskIdError> {
    Self::new(owner, Some(name.into()))
  }

  /// Parse the canonical string form.
  pub fn parse(value: &str) -> Result<Self, TaskIdError> {
    match value.split_once(SEPARATOR) {
      Some((owner, name)) => Self::new(owner, Some(name.to_string())),
      None => Self::new(value, None),
    }
  }

  pub fn owner(&self) -> &str {
    &self.owner
  }

  pub fn name(&self) -> Option<&str> {
    self.name.as_deref()
  }

  /// Whether this id, used as a dependency reference, points at `task`.
  ///
  /// Owners must be equal. A reference without a name matches every task of
  /// that owner; a named reference only matches the task with that name.
  pub fn matches(&self, task: &TaskId) -> bool {
    if self.owner != task.owner {
      return false;
    }
    match &self.name {
      Some(name) => task.name.as_deref() == Some(name.as_str()),
      None => true,
    }
  }
}

impl fmt::Display for TaskId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match &self.name {
      Some(name) => write!(f, "{}{}{}", self.owner, SEPARATOR, name),
      None => f.write_str(&self.owner),
    }
  }
}

impl FromStr for TaskId {
  type Err = TaskIdError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    Self::parse(s)
  }
}

impl TryFrom<String> for TaskId {
  type Error = TaskIdError;

  fn try_from(value: String) -> Result<Self, Self::Error> {
    Self::parse(&value)
  }
}

impl From<TaskId> for String {
  fn from(id: TaskId) -> Self {
    id.to_string()
  }
}
