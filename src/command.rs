//! Build tasks backed by shell commands.

use std::path::{Path, PathBuf};
use std::process::Output;

use async_trait::async_trait;
use buildpipe_config::TaskDef;
use buildpipe_context::BuildContext;
use buildpipe_pipeline::{BuildTask, TaskResultsList};
use buildpipe_task::{ArtifactDefinition, ComponentResult, ExecuteResult, TaskError, TaskId};
use tokio::process::Command;
use tracing::debug;

/// Lines of stderr kept in a component's errors when its command fails.
const STDERR_TAIL_LINES: usize = 20;

/// A task that runs `command` in every component directory.
///
/// A non-zero exit marks that component as failed. The optional pre- and
/// post-build commands run once per queue entry from the pipeline directory
/// and abort the run when they fail.
#[derive(Debug, Clone)]
pub struct CommandTask {
  id: TaskId,
  description: Option<String>,
  dependencies: Vec<String>,
  pre_build: Option<String>,
  command: String,
  post_build: Option<String>,
  artifacts: Vec<ArtifactDefinition>,
  working_dir: PathBuf,
}

impl CommandTask {
  pub fn from_def(def: &TaskDef, working_dir: &Path) -> anyhow::Result<Self> {
    let id = TaskId::parse(&def.id)?;
    let artifacts = def
      .artifacts
      .iter()
      .map(|a| ArtifactDefinition {
        name: a.name.clone(),
        description: a.description.clone(),
        patterns: a.patterns.clone(),
        root_dir: a.root_dir.as_ref().map(PathBuf::from),
      })
      .collect();

    Ok(Self {
      id,
      description: def.description.clone(),
      dependencies: def.dependencies.clone(),
      pre_build: def.pre_build.clone(),
      command: def.command.clone(),
      post_build: def.post_build.clone(),
      artifacts,
      working_dir: working_dir.to_path_buf(),
    })
  }

  fn shell(&self, command: &str, dir: &Path, env_id: &str) -> Command {
    let mut cmd = if cfg!(windows) {
      let mut cmd = Command::new("cmd");
      cmd.arg("/C");
      cmd
    } else {
      let mut cmd = Command::new("sh");
      cmd.arg("-c");
      cmd
    };
    cmd
      .arg(command)
      .current_dir(dir)
      .env("BUILDPIPE_ENV", env_id)
      .env("BUILDPIPE_TASK", self.id.to_string())
      .kill_on_drop(true);
    cmd
  }

  /// Run a lifecycle hook command; a non-zero exit is an error.
  async fn run_hook(&self, hook: &str, command: &str, cmd: &mut Command) -> Result<(), TaskError> {
    debug!(task = %self.id, hook, command, "running hook");
    let output = cmd.output().await?;
    if !output.status.success() {
      return Err(TaskError::msg(format!(
        "{} command `{}` of task '{}' exited with {}",
        hook, command, self.id, output.status
      )));
    }
    Ok(())
  }
}

#[async_trait]
impl BuildTask for CommandTask {
  fn id(&self) -> &TaskId {
    &self.id
  }

  fn description(&self) -> Option<&str> {
    self.description.as_deref()
  }

  fn dependencies(&self) -> &[String] {
    &self.dependencies
  }

  async fn pre_build(&self, context: &BuildContext) -> Result<(), TaskError> {
    let Some(command) = &self.pre_build else {
      return Ok(());
    };
    let mut cmd = self.shell(command, &self.working_dir, &context.env_id);
    self.run_hook("pre-build", command, &mut cmd).await
  }

  async fn execute(&self, context: &BuildContext) -> Result<ExecuteResult, TaskError> {
    let mut components_results = Vec::with_capacity(context.components.len());

    for component in &context.components {
      debug!(
        task = %self.id,
        component_id = %component.id,
        command = %self.command,
        "running command"
      );
      let output = self
        .shell(&self.command, &component.root_dir, &context.env_id)
        .env("BUILDPIPE_COMPONENT", &component.id)
        .output()
        .await?;

      components_results.push(component_result(&component.id, &self.command, &output));
    }

    Ok(ExecuteResult::new(components_results).with_artifacts(self.artifacts.clone()))
  }

  async fn post_build(
    &self,
    context: &BuildContext,
    results: &TaskResultsList,
  ) -> Result<(), TaskError> {
    let Some(command) = &self.post_build else {
      return Ok(());
    };
    let mut cmd = self.shell(command, &self.working_dir, &context.env_id);
    cmd.env("BUILDPIPE_SUCCESS", results.is_success().to_string());
    self.run_hook("post-build", command, &mut cmd).await
  }
}

fn component_result(component_id: &str, command: &str, output: &Output) -> ComponentResult {
  let exit_code = serde_json::Value::from(output.status.code());

  if output.status.success() {
    return ComponentResult::ok(component_id).with_metadata("exit_code", exit_code);
  }

  let stderr = String::from_utf8_lossy(&output.stderr);
  let lines: Vec<&str> = stderr.lines().filter(|l| !l.trim().is_empty()).collect();
  let tail = &lines[lines.len().saturating_sub(STDERR_TAIL_LINES)..];

  let mut errors = vec![format!("`{}` exited with {}", command, output.status)];
  errors.extend(tail.iter().map(|l| l.to_string()));

  ComponentResult::failed(component_id, errors).with_metadata("exit_code", exit_code)
}
