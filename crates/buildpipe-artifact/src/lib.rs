//! Buildpipe Artifact
//!
//! Turns the [`ArtifactDefinition`]s a task declares into concrete per-component
//! artifact lists. Generation only happens for tasks whose components all
//! succeeded; the pipeline is responsible for that gate.
//!
//! The [`ArtifactGenerator`] trait is the seam the pipeline calls through.
//! [`FsArtifactGenerator`] resolves definitions against each component's
//! directory on disk. How artifacts are stored or packaged afterwards is not
//! this crate's concern.
//!
//! [`ArtifactDefinition`]: buildpipe_task::ArtifactDefinition

mod error;
mod fs;
mod list;
mod pattern;

pub use error::ArtifactError;
pub use fs::FsArtifactGenerator;
pub use list::{Artifact, ArtifactList, ComponentArtifacts};
pub use pattern::{ArtifactMatcher, Pattern};

use async_trait::async_trait;
use buildpipe_context::BuildContext;
use buildpipe_task::{ArtifactDefinition, TaskId};

/// Generates artifacts for a successful task.
///
/// Implementations must not modify `definitions`. A definition that matches
/// nothing for a component yields no artifact for it rather than an error.
#[async_trait]
pub trait ArtifactGenerator: Send + Sync {
  async fn generate(
    &self,
    context: &BuildContext,
    definitions: &[ArtifactDefinition],
    task: &TaskId,
  ) -> Result<ComponentArtifacts, ArtifactError>;
}
