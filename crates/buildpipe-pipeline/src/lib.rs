//! Buildpipe Pipeline
//!
//! This crate runs an ordered queue of (task, environment) pairs through the
//! build lifecycle:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │ pre-build    every entry's pre_build hook, in queue order   │
//! └─────────────────────────────────────────────────────────────┘
//!                               │
//!                               ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │ tasks        execute → classify → artifacts (success only)  │
//! │              dependents of a failed task are skipped        │
//! └─────────────────────────────────────────────────────────────┘
//!                               │
//!                               ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │ post-build   every entry's post_build hook, reading the     │
//! │              complete TaskResultsList                       │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! Everything runs one entry at a time. Component errors are data: they mark
//! the task as failed and drive the skip logic. Hook errors and a missing
//! build context are fatal and abort the run with a [`PipelineError`].
//!
//! # Usage
//!
//! ```ignore
//! let queue: TasksQueue = [QueueEntry::new(compile, "react")].into_iter().collect();
//! let pipe = BuildPipe::new(
//!   queue,
//!   Arc::new(registry),
//!   Arc::new(TracingReporter),
//!   Arc::new(FsArtifactGenerator::new()),
//! );
//! let results = pipe.execute().await?;
//! results.ensure_success()?;
//! ```

mod error;
mod events;
mod pipe;
mod queue;
mod result;
mod task;

pub use error::PipelineError;
pub use events::{
  ChannelReporter, NoopReporter, PipelineEvent, PipelineReporter, ProgressLogger, TracingReporter,
};
pub use pipe::BuildPipe;
pub use queue::{QueueEntry, TasksQueue};
pub use result::{RunReport, SkippedTask, TaskReport, TaskResult, TaskResultsList, TaskStatus};
pub use task::BuildTask;
