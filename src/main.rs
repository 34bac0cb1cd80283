mod command;
mod plan;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

use buildpipe_artifact::FsArtifactGenerator;
use buildpipe_pipeline::{BuildPipe, RunReport, TracingReporter};

/// Buildpipe - runs an ordered queue of build tasks across environments
#[derive(Parser)]
#[command(name = "buildpipe")]
#[command(version, about, long_about = None)]
struct Cli {
  /// Path to the data directory (default: ~/.buildpipe)
  #[arg(long, global = true)]
  data_dir: Option<PathBuf>,

  #[command(subcommand)]
  command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
  /// Run every queued task of a pipeline
  Run {
    /// Path to the pipeline file (JSON)
    pipeline_file: PathBuf,
  },

  /// Check a pipeline file without running anything
  Validate {
    /// Path to the pipeline file (JSON)
    pipeline_file: PathBuf,
  },
}

fn main() -> Result<()> {
  let cli = Cli::parse();

  tracing_subscriber::registry()
    .with(
      fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr),
    )
    .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
    .init();

  let data_dir = match cli.data_dir {
    Some(dir) => dir,
    None => dirs::home_dir()
      .context("could not determine home directory")?
      .join(".buildpipe"),
  };

  match cli.command {
    Some(Commands::Run { pipeline_file }) => {
      let rt = tokio::runtime::Runtime::new()?;
      rt.block_on(run_pipeline(pipeline_file, data_dir))?;
    }
    Some(Commands::Validate { pipeline_file }) => {
      let rt = tokio::runtime::Runtime::new()?;
      rt.block_on(validate_pipeline(pipeline_file))?;
    }
    None => {
      println!("buildpipe - use --help to see available commands");
    }
  }

  Ok(())
}

async fn load_pipe(pipeline_file: &Path) -> Result<(String, BuildPipe)> {
  let def = plan::load(pipeline_file).await?;
  let base_dir = pipeline_file
    .parent()
    .filter(|p| !p.as_os_str().is_empty())
    .unwrap_or(Path::new("."));

  let plan = plan::build(def, base_dir)?;
  let pipe = BuildPipe::new(
    plan.queue,
    Arc::new(plan.registry),
    Arc::new(TracingReporter),
    Arc::new(FsArtifactGenerator::new()),
  );

  Ok((plan.name, pipe))
}

async fn run_pipeline(pipeline_file: PathBuf, data_dir: PathBuf) -> Result<()> {
  let (name, pipe) = load_pipe(&pipeline_file).await?;
  eprintln!("Loaded pipeline: {} ({} entries)", name, pipe.queue().len());

  let results = pipe.execute().await.context("pipeline execution failed")?;
  let report = results.report();

  println!("{}", serde_json::to_string_pretty(&report)?);

  let report_path = write_report(&data_dir, &name, &report).await?;
  eprintln!("Report written to {}", report_path.display());

  results.ensure_success()?;
  Ok(())
}

async fn validate_pipeline(pipeline_file: PathBuf) -> Result<()> {
  let (name, pipe) = load_pipe(&pipeline_file).await?;
  pipe.validate().context("pipeline is invalid")?;

  eprintln!("Pipeline {} is valid", name);
  for line in plan::describe(pipe.queue()) {
    println!("{}", line);
  }
  Ok(())
}

async fn write_report(data_dir: &Path, name: &str, report: &RunReport) -> Result<PathBuf> {
  let reports_dir = data_dir.join("reports");
  tokio::fs::create_dir_all(&reports_dir)
    .await
    .with_context(|| format!("failed to create {}", reports_dir.display()))?;

  let path = reports_dir.join(format!("{}.json", report_file_stem(name)));
  let content = serde_json::to_vec_pretty(report)?;
  tokio::fs::write(&path, content)
    .await
    .with_context(|| format!("failed to write report: {}", path.display()))?;

  Ok(path)
}

/// Pipeline names become file names; anything outside `[A-Za-z0-9_.-]` is
/// replaced.
fn report_file_stem(name: &str) -> String {
  let stem: String = name
    .chars()
    .map(|c| {
      if c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.') {
        c
      } else {
        '_'
      }
    })
    .collect();

  match stem.trim_matches('.') {
    "" => "pipeline".to_string(),
    trimmed => trimmed.to_string(),
  }
}
