use std::io::ErrorKind;
use std::path::{Component as PathComponent, Path, PathBuf};

use async_trait::async_trait;
use buildpipe_context::BuildContext;
use buildpipe_task::{ArtifactDefinition, TaskId};
use tokio::fs;
use tracing::{debug, info};

use crate::ArtifactGenerator;
use crate::error::ArtifactError;
use crate::list::{Artifact, ArtifactList, ComponentArtifacts};
use crate::pattern::ArtifactMatcher;

/// Resolves artifact definitions against component directories on disk.
///
/// For every component the search root is the component's `root_dir`, joined
/// with the definition's `root_dir` when one is set. A search root that does
/// not exist simply matches nothing.
///
/// Symlinks to files are listed under the link's own path. Symlinks to
/// directories are not descended into, and dangling links are ignored.
#[derive(Debug, Clone, Default)]
pub struct FsArtifactGenerator;

impl FsArtifactGenerator {
  pub fn new() -> Self {
    Self
  }
}

#[async_trait]
impl ArtifactGenerator for FsArtifactGenerator {
  async fn generate(
    &self,
    context: &BuildContext,
    definitions: &[ArtifactDefinition],
    task: &TaskId,
  ) -> Result<ComponentArtifacts, ArtifactError> {
    let mut matchers = Vec::with_capacity(definitions.len());
    for definition in definitions {
      check_root_dir(definition)?;
      matchers.push((definition, ArtifactMatcher::from_definition(definition)?));
    }

    let mut artifacts = ComponentArtifacts::new();
    for component in &context.components {
      let mut list = ArtifactList::default();

      for (definition, matcher) in &matchers {
        let root_dir = match &definition.root_dir {
          Some(dir) => component.root_dir.join(dir),
          None => component.root_dir.clone(),
        };

        let mut files: Vec<String> = list_files(&root_dir)
          .await?
          .into_iter()
          .filter(|f| matcher.is_match(f))
          .collect();

        if files.is_empty() {
          debug!(
            task = %task,
            component_id = %component.id,
            artifact = %definition.name,
            "artifact matched no files"
          );
          continue;
        }
        files.sort();

        list.push(Artifact {
          name: definition.name.clone(),
          description: definition.description.clone(),
          task: task.clone(),
          root_dir,
          files,
        });
      }

      artifacts.insert(component.id.clone(), list);
    }

    info!(
      env_id = %context.env_id,
      task = %task,
      components = artifacts.len(),
      files = artifacts.file_count(),
      "artifacts_generated"
    );

    Ok(artifacts)
  }
}

fn check_root_dir(definition: &ArtifactDefinition) -> Result<(), ArtifactError> {
  if let Some(dir) = &definition.root_dir
    && (dir.is_absolute() || dir.components().any(|c| matches!(c, PathComponent::ParentDir)))
  {
    return Err(ArtifactError::InvalidRootDir {
      artifact: definition.name.clone(),
      root_dir: dir.clone(),
    });
  }
  Ok(())
}

/// All files below `root`, as `/`-separated paths relative to it.
async fn list_files(root: &Path) -> Result<Vec<String>, ArtifactError> {
  let mut files = Vec::new();
  let mut pending: Vec<PathBuf> = vec![root.to_path_buf()];

  while let Some(dir) = pending.pop() {
    let mut entries = match fs::read_dir(&dir).await {
      Ok(entries) => entries,
      Err(e) if e.kind() == ErrorKind::NotFound && dir == root => return Ok(files),
      Err(source) => return Err(ArtifactError::Io { path: dir, source }),
    };

    while let Some(entry) = entries
      .next_entry()
      .await
      .map_err(|source| ArtifactError::Io {
        path: dir.clone(),
        source,
      })?
    {
      let path = entry.path();
      let file_type = entry
        .file_type()
        .await
        .map_err(|source| ArtifactError::Io {
          path: path.clone(),
          source,
        })?;

      let is_file = if file_type.is_symlink() {
        fs::metadata(&path).await.is_ok_and(|target| target.is_file())
      } else if file_type.is_dir() {
        pending.push(path);
        continue;
      } else {
        true
      };

      if is_file && let Ok(relative) = path.strip_prefix(root) {
        files.push(to_slash_path(relative));
      }
    }
  }

  Ok(files)
}

fn to_slash_path(path: &Path) -> String {
  path
    .components()
    .map(|c| c.as_os_str().to_string_lossy())
    .collect::<Vec<_>>()
    .join("/")
}
