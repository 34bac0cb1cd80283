use std::path::PathBuf;

/// Errors that can occur while generating artifacts.
#[derive(Debug, thiserror::Error)]
pub enum ArtifactError {
  /// A glob pattern could not be used.
  #[error("invalid pattern '{pattern}' in artifact '{artifact}': {reason}")]
  InvalidPattern {
    artifact: String,
    pattern: String,
    reason: String,
  },

  /// The definition's root dir escapes the component directory.
  #[error("invalid root dir '{}' in artifact '{artifact}'", root_dir.display())]
  InvalidRootDir { artifact: String, root_dir: PathBuf },

  /// Reading a component directory failed.
  #[error("failed to read '{}': {source}", path.display())]
  Io {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },
}
