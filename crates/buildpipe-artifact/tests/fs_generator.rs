//! Integration tests for FsArtifactGenerator against real directories.

use std::fs;
use std::path::Path;

use buildpipe_artifact::{ArtifactError, ArtifactGenerator, FsArtifactGenerator};
use buildpipe_context::{BuildContext, Component};
use buildpipe_task::{ArtifactDefinition, TaskId};

fn touch(root: &Path, relative: &str) {
  let path = root.join(relative);
  fs::create_dir_all(path.parent().unwrap()).unwrap();
  fs::write(path, b"content").unwrap();
}

fn compiler_task() -> TaskId {
  TaskId::named("teambit.compilation/compiler", "TSCompiler").unwrap()
}

#[tokio::test]
async fn test_generates_artifacts_per_component() {
  let temp = tempfile::tempdir().unwrap();
  let button = temp.path().join("button");
  let card = temp.path().join("card");

  touch(&button, "dist/index.js");
  touch(&button, "dist/index.js.map");
  touch(&button, "dist/esm/index.js");
  touch(&button, "src/index.ts");
  touch(&card, "dist/index.js");

  let context = BuildContext::new(
    "react",
    vec![
      Component::new("ui/button", &button),
      Component::new("ui/card", &card),
    ],
  );
  let definitions = vec![ArtifactDefinition::new("dist", ["dist/**", "!**/*.map"])];

  let artifacts = FsArtifactGenerator::new()
    .generate(&context, &definitions, &compiler_task())
    .await
    .unwrap();

  assert_eq!(artifacts.len(), 2);

  let button_list = artifacts.get("ui/button").unwrap();
  let dist = button_list.get("dist").unwrap();
  assert_eq!(dist.files, vec!["dist/esm/index.js", "dist/index.js"]);
  assert_eq!(dist.task, compiler_task());
  assert_eq!(dist.root_dir, button);

  let card_list = artifacts.get("ui/card").unwrap();
  assert_eq!(card_list.get("dist").unwrap().files, vec!["dist/index.js"]);
  assert_eq!(artifacts.file_count(), 3);

  // the definitions are left untouched
  assert_eq!(definitions[0].patterns, vec!["dist/**", "!**/*.map"]);
}

#[tokio::test]
async fn test_unmatched_definition_yields_empty_list() {
  let temp = tempfile::tempdir().unwrap();
  touch(temp.path(), "src/index.ts");

  let context = BuildContext::new("react", vec![Component::new("ui/button", temp.path())]);
  let definitions = vec![ArtifactDefinition::new("dist", ["dist/**"])];

  let artifacts = FsArtifactGenerator::new()
    .generate(&context, &definitions, &compiler_task())
    .await
    .unwrap();

  let list = artifacts.get("ui/button").unwrap();
  assert!(list.is_empty());
}

#[tokio::test]
async fn test_missing_component_directory_matches_nothing() {
  let temp = tempfile::tempdir().unwrap();
  let context = BuildContext::new(
    "react",
    vec![Component::new("ui/ghost", temp.path().join("does-not-exist"))],
  );
  let definitions = vec![ArtifactDefinition::new("all", ["**"])];

  let artifacts = FsArtifactGenerator::new()
    .generate(&context, &definitions, &compiler_task())
    .await
    .unwrap();

  assert!(artifacts.get("ui/ghost").unwrap().is_empty());
}

#[tokio::test]
async fn test_root_dir_narrows_search() {
  let temp = tempfile::tempdir().unwrap();
  touch(temp.path(), "dist/index.js");
  touch(temp.path(), "index.js");

  let context = BuildContext::new("react", vec![Component::new("ui/button", temp.path())]);
  let definitions = vec![ArtifactDefinition::new("dist", ["*.js"]).with_root_dir("dist")];

  let artifacts = FsArtifactGenerator::new()
    .generate(&context, &definitions, &compiler_task())
    .await
    .unwrap();

  let artifact = artifacts.get("ui/button").unwrap().get("dist").unwrap();
  assert_eq!(artifact.files, vec!["index.js"]);
  assert_eq!(artifact.root_dir, temp.path().join("dist"));
  assert_eq!(
    artifact.paths().collect::<Vec<_>>(),
    vec![temp.path().join("dist").join("index.js")]
  );
}

#[tokio::test]
async fn test_no_definitions_gives_every_component_an_empty_list() {
  let context = BuildContext::new(
    "react",
    vec![
      Component::new("ui/button", "/nonexistent/button"),
      Component::new("ui/card", "/nonexistent/card"),
    ],
  );

  let artifacts = FsArtifactGenerator::new()
    .generate(&context, &[], &compiler_task())
    .await
    .unwrap();

  assert_eq!(artifacts.len(), 2);
  assert_eq!(artifacts.file_count(), 0);
}

#[tokio::test]
async fn test_rejects_escaping_root_dir() {
  let context = BuildContext::new("react", vec![Component::new("ui/button", "/tmp")]);
  let definitions = vec![ArtifactDefinition::new("up", ["*"]).with_root_dir("../other")];

  let err = FsArtifactGenerator::new()
    .generate(&context, &definitions, &compiler_task())
    .await
    .unwrap_err();

  assert!(matches!(err, ArtifactError::InvalidRootDir { .. }));
}

#[tokio::test]
async fn test_artifact_keeps_definition_description() {
  let temp = tempfile::tempdir().unwrap();
  touch(temp.path(), "dist/index.js");

  let context = BuildContext::new("react", vec![Component::new("ui/button", temp.path())]);
  let definitions =
    vec![ArtifactDefinition::new("dist", ["dist/*.js"]).with_description("compiled output")];

  let artifacts = FsArtifactGenerator::new()
    .generate(&context, &definitions, &compiler_task())
    .await
    .unwrap();

  let artifact = artifacts.get("ui/button").unwrap().get("dist").unwrap();
  assert_eq!(artifact.description.as_deref(), Some("compiled output"));
}

#[cfg(unix)]
#[tokio::test]
async fn test_symlinked_directories_are_not_listed_or_followed() {
  use std::os::unix::fs::symlink;

  let temp = tempfile::tempdir().unwrap();
  let component = temp.path().join("button");
  touch(&component, "build/index.js");
  touch(temp.path(), "shared/util.js");
  symlink(component.join("build"), component.join("dist")).unwrap();
  symlink(temp.path().join("shared/util.js"), component.join("util.js")).unwrap();
  symlink(component.join("missing.js"), component.join("dangling.js")).unwrap();

  let context = BuildContext::new("react", vec![Component::new("ui/button", &component)]);
  let definitions = vec![ArtifactDefinition::new("all", ["**"])];

  let artifacts = FsArtifactGenerator::new()
    .generate(&context, &definitions, &compiler_task())
    .await
    .unwrap();

  let artifact = artifacts.get("ui/button").unwrap().get("all").unwrap();
  assert_eq!(artifact.files, vec!["build/index.js", "util.js"]);
}
