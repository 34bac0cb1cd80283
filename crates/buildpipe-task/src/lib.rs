//! Buildpipe Task
//!
//! This crate holds the data model shared by everything that produces or
//! consumes build tasks:
//! - [`TaskId`], the canonical `owner[:name]` identifier and its codec
//! - [`ComponentResult`] and [`ExecuteResult`], what a task's execute step
//!   hands back to the pipeline
//! - [`ArtifactDefinition`], the outputs a task declares on success
//!
//! The task behaviour itself (`BuildTask`) lives in `buildpipe-pipeline`,
//! because its post-build hook reads the pipeline's results list.

mod artifact;
mod error;
mod id;
mod result;

pub use artifact::ArtifactDefinition;
pub use error::{TaskError, TaskIdError};
pub use id::{SEPARATOR, TaskId};
pub use result::{ComponentResult, ExecuteResult};
