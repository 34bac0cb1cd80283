//! Generated artifact types.

use std::collections::BTreeMap;
use std::path::PathBuf;

use buildpipe_task::TaskId;
use serde::{Deserialize, Serialize};

/// Files produced for one component by one artifact definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Artifact {
  /// Name of the definition this artifact was generated from.
  pub name: String,
  pub description: Option<String>,
  /// Task that declared the artifact.
  pub task: TaskId,
  /// Directory the files were collected from.
  pub root_dir: PathBuf,
  /// Matching files, relative to `root_dir`, sorted.
  pub files: Vec<String>,
}

impl Artifact {
  /// Absolute paths of the artifact's files.
  pub fn paths(&self) -> impl Iterator<Item = PathBuf> + '_ {
    self.files.iter().map(|f| self.root_dir.join(f))
  }
}

/// The artifacts of a single component.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ArtifactList {
  artifacts: Vec<Artifact>,
}

impl ArtifactList {
  pub fn push(&mut self, artifact: Artifact) {
    self.artifacts.push(artifact);
  }

  pub fn get(&self, name: &str) -> Option<&Artifact> {
    self.artifacts.iter().find(|a| a.name == name)
  }

  pub fn iter(&self) -> std::slice::Iter<'_, Artifact> {
    self.artifacts.iter()
  }

  pub fn len(&self) -> usize {
    self.artifacts.len()
  }

  pub fn is_empty(&self) -> bool {
    self.artifacts.is_empty()
  }

  pub fn file_count(&self) -> usize {
    self.artifacts.iter().map(|a| a.files.len()).sum()
  }
}

impl<'a> IntoIterator for &'a ArtifactList {
  type Item = &'a Artifact;
  type IntoIter = std::slice::Iter<'a, Artifact>;

  fn into_iter(self) -> Self::IntoIter {
    self.iter()
  }
}

/// Artifact lists keyed by component id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ComponentArtifacts {
  by_component: BTreeMap<String, ArtifactList>,
}

impl ComponentArtifacts {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn insert(&mut self, component_id: impl Into<String>, list: ArtifactList) {
    self.by_component.insert(component_id.into(), list);
  }

  pub fn get(&self, component_id: &str) -> Option<&ArtifactList> {
    self.by_component.get(component_id)
  }

  pub fn iter(&self) -> impl Iterator<Item = (&str, &ArtifactList)> {
    self.by_component.iter().map(|(id, list)| (id.as_str(), list))
  }

  /// Number of components with an entry (including empty lists).
  pub fn len(&self) -> usize {
    self.by_component.len()
  }

  pub fn is_empty(&self) -> bool {
    self.by_component.is_empty()
  }

  pub fn file_count(&self) -> usize {
    self.by_component.values().map(ArtifactList::file_count).sum()
  }
}
