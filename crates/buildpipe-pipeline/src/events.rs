//! Pipeline events and reporters.
//!
//! The pipeline reports progress and outcomes as [`PipelineEvent`]s. What
//! happens to them (printing, streaming to a UI, collecting in tests) is up
//! to the [`PipelineReporter`] handed to the pipe.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tracing::{error, info, warn};

/// Events emitted while a pipeline runs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PipelineEvent {
  /// A long-running phase has started.
  ProgressStarted { description: String, total: usize },

  /// One step of the current long-running phase.
  Progress {
    step: usize,
    total: usize,
    message: String,
  },

  /// The current long-running phase has ended.
  ProgressEnded { description: String },

  /// Status line update.
  Status { message: String },

  /// Something completed successfully.
  Success { message: Option<String> },

  /// Something was skipped or is suspicious.
  Warning { message: String },

  /// Something failed.
  Failure { message: String },
}

/// Receives pipeline events.
///
/// Reporting is fire-and-forget: `notify` returns nothing and the pipeline
/// never waits on it.
pub trait PipelineReporter: Send + Sync {
  fn notify(&self, event: PipelineEvent);
}

/// A reporter that discards all events.
#[derive(Debug, Clone, Default)]
pub struct NoopReporter;

impl PipelineReporter for NoopReporter {
  fn notify(&self, _event: PipelineEvent) {}
}

/// A reporter that sends events to an unbounded channel.
#[derive(Debug, Clone)]
pub struct ChannelReporter {
  // unbounded so a slow consumer never stalls the pipeline; volume is a
  // handful of events per queue entry
  sender: mpsc::UnboundedSender<PipelineEvent>,
}

impl ChannelReporter {
  pub fn new(sender: mpsc::UnboundedSender<PipelineEvent>) -> Self {
    Self { sender }
  }

  /// Create a reporter together with the receiving end of its channel.
  pub fn channel() -> (Self, mpsc::UnboundedReceiver<PipelineEvent>) {
    let (sender, receiver) = mpsc::unbounded_channel();
    (Self::new(sender), receiver)
  }
}

impl PipelineReporter for ChannelReporter {
  fn notify(&self, event: PipelineEvent) {
    // receiver may have been dropped
    let _ = self.sender.send(event);
  }
}

/// A reporter that turns events into `tracing` log lines.
#[derive(Debug, Clone, Default)]
pub struct TracingReporter;

impl PipelineReporter for TracingReporter {
  fn notify(&self, event: PipelineEvent) {
    match event {
      PipelineEvent::ProgressStarted { description, total } => {
        info!(total, "{}", description);
      }
      PipelineEvent::Progress {
        step,
        total,
        message,
      } => {
        info!("({}/{}) {}", step, total, message);
      }
      PipelineEvent::ProgressEnded { description } => {
        info!("{} done", description);
      }
      PipelineEvent::Status { message } => {
        info!("{}", message);
      }
      PipelineEvent::Success { message } => {
        if let Some(message) = message {
          info!("{}", message);
        }
      }
      PipelineEvent::Warning { message } => {
        warn!("{}", message);
      }
      PipelineEvent::Failure { message } => {
        error!("{}", message);
      }
    }
  }
}

/// Tracks a long-running phase with a known number of steps.
pub struct ProgressLogger {
  reporter: Arc<dyn PipelineReporter>,
  description: String,
  total: usize,
  step: usize,
}

impl ProgressLogger {
  /// Start the phase and announce its total step count.
  pub fn start(
    reporter: Arc<dyn PipelineReporter>,
    description: impl Into<String>,
    total: usize,
  ) -> Self {
    let description = description.into();
    reporter.notify(PipelineEvent::ProgressStarted {
      description: description.clone(),
      total,
    });
    Self {
      reporter,
      description,
      total,
      step: 0,
    }
  }

  /// Log the next step.
  pub fn log_progress(&mut self, message: impl Into<String>) {
    self.step += 1;
    self.reporter.notify(PipelineEvent::Progress {
      step: self.step,
      total: self.total,
      message: message.into(),
    });
  }

  pub fn end(self) {
    self.reporter.notify(PipelineEvent::ProgressEnded {
      description: self.description,
    });
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_progress_logger_counts_steps() {
    let (reporter, mut receiver) = ChannelReporter::channel();
    let mut progress = ProgressLogger::start(Arc::new(reporter), "running tasks", 2);
    progress.log_progress("first");
    progress.log_progress("second");
    progress.end();

    let mut events = Vec::new();
    while let Ok(event) = receiver.try_recv() {
      events.push(event);
    }

    assert_eq!(
      events,
      vec![
        PipelineEvent::ProgressStarted {
          description: "running tasks".to_string(),
          total: 2,
        },
        PipelineEvent::Progress {
          step: 1,
          total: 2,
          message: "first".to_string(),
        },
        PipelineEvent::Progress {
          step: 2,
          total: 2,
          message: "second".to_string(),
        },
        PipelineEvent::ProgressEnded {
          description: "running tasks".to_string(),
        },
      ]
    );
  }

  #[test]
  fn test_channel_reporter_ignores_dropped_receiver() {
    let (reporter, receiver) = ChannelReporter::channel();
    drop(receiver);
    reporter.notify(PipelineEvent::Status {
      message: "still fine".to_string(),
    });
  }
}
