//! Turning a pipeline file into a runnable queue and context registry.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use buildpipe_config::PipelineDef;
use buildpipe_context::{BuildContext, Component, ContextRegistry};
use buildpipe_pipeline::{BuildTask, QueueEntry, TasksQueue};

use crate::command::CommandTask;

/// A loaded pipeline, ready to hand to a `BuildPipe`.
pub struct Plan {
  pub name: String,
  pub queue: TasksQueue,
  pub registry: ContextRegistry,
}

/// Read and parse a pipeline file.
pub async fn load(pipeline_file: &Path) -> Result<PipelineDef> {
  let content = tokio::fs::read_to_string(pipeline_file)
    .await
    .with_context(|| format!("failed to read pipeline file: {}", pipeline_file.display()))?;

  serde_json::from_str(&content)
    .with_context(|| format!("failed to parse pipeline file: {}", pipeline_file.display()))
}

/// Build the queue and registry. Relative component paths and hook working
/// directories resolve against `base_dir`.
pub fn build(def: PipelineDef, base_dir: &Path) -> Result<Plan> {
  let mut registry = ContextRegistry::new();
  for env in &def.envs {
    let components = env
      .components
      .iter()
      .map(|c| Component::new(&c.id, resolve(base_dir, &c.path)))
      .collect();

    let mut context = BuildContext::new(&env.id, components);
    context.metadata = env.metadata.clone();

    if registry.insert(context).is_some() {
      bail!("environment '{}' is defined more than once", env.id);
    }
  }

  let mut tasks: HashMap<&str, Arc<dyn BuildTask>> = HashMap::new();
  for task_def in &def.tasks {
    let task = CommandTask::from_def(task_def, base_dir)
      .with_context(|| format!("invalid task '{}'", task_def.id))?;
    if tasks.insert(&task_def.id, Arc::new(task)).is_some() {
      bail!("task '{}' is defined more than once", task_def.id);
    }
  }

  let mut queue = TasksQueue::new();
  for (index, entry) in def.queue.iter().enumerate() {
    let task = tasks.get(entry.task.as_str()).with_context(|| {
      format!(
        "queue entry {} references unknown task '{}'",
        index, entry.task
      )
    })?;
    queue.push(Arc::clone(task), &entry.env);
  }

  Ok(Plan {
    name: def.name,
    queue,
    registry,
  })
}

fn resolve(base_dir: &Path, path: &str) -> PathBuf {
  let path = Path::new(path);
  if path.is_absolute() {
    path.to_path_buf()
  } else {
    base_dir.join(path)
  }
}

/// Queue entries formatted for display.
pub fn describe(queue: &TasksQueue) -> Vec<String> {
  queue
    .iter()
    .map(|QueueEntry { task, env_id }| format!("{} @ {}", task.label(), env_id))
    .collect()
}

#[cfg(test)]
mod tests {
  use super::*;
  use serde_json::json;

  fn pipeline(value: serde_json::Value) -> PipelineDef {
    serde_json::from_value(value).unwrap()
  }

  #[test]
  fn test_build_plan() {
    let def = pipeline(json!({
      "name": "workspace",
      "envs": [
        {
          "id": "react",
          "metadata": { "bundler": "vite" },
          "components": [
            { "id": "ui/button", "path": "components/button" },
            { "id": "ui/abs", "path": "/abs/dir" }
          ]
        }
      ],
      "tasks": [
        { "id": "compiler:tsc", "command": "tsc", "description": "compile" },
        { "id": "tester", "command": "jest", "dependencies": ["compiler"] }
      ],
      "queue": [
        { "task": "compiler:tsc", "env": "react" },
        { "task": "tester", "env": "react" }
      ]
    }));

    let plan = build(def, Path::new("/ws")).unwrap();

    assert_eq!(plan.name, "workspace");
    assert_eq!(
      describe(&plan.queue),
      vec!["compiler:tsc (compile) @ react", "tester @ react"]
    );

    let context = plan.registry.get("react").unwrap();
    assert_eq!(
      context.component("ui/button").unwrap().root_dir,
      PathBuf::from("/ws/components/button")
    );
    assert_eq!(
      context.component("ui/abs").unwrap().root_dir,
      PathBuf::from("/abs/dir")
    );
    assert_eq!(context.metadata["bundler"], "vite");
  }

  #[test]
  fn test_unknown_queue_task_is_rejected() {
    let def = pipeline(json!({
      "name": "broken",
      "tasks": [{ "id": "compiler", "command": "tsc" }],
      "queue": [{ "task": "linter", "env": "react" }]
    }));

    let err = build(def, Path::new("/ws")).err().unwrap();
    assert!(err.to_string().contains("unknown task 'linter'"));
  }

  #[test]
  fn test_duplicate_definitions_are_rejected() {
    let def = pipeline(json!({
      "name": "dupes",
      "tasks": [
        { "id": "compiler", "command": "tsc" },
        { "id": "compiler", "command": "babel" }
      ]
    }));
    assert!(build(def, Path::new("/ws")).is_err());

    let def = pipeline(json!({
      "name": "dupes",
      "envs": [{ "id": "react" }, { "id": "react" }]
    }));
    assert!(build(def, Path::new("/ws")).is_err());
  }

  #[test]
  fn test_same_task_is_shared_across_entries() {
    let def = pipeline(json!({
      "name": "shared",
      "tasks": [{ "id": "compiler", "command": "tsc" }],
      "queue": [
        { "task": "compiler", "env": "react" },
        { "task": "compiler", "env": "node" }
      ]
    }));

    let plan = build(def, Path::new("/ws")).unwrap();
    let entries: Vec<_> = plan.queue.iter().collect();
    assert!(Arc::ptr_eq(&entries[0].task, &entries[1].task));
  }
}
