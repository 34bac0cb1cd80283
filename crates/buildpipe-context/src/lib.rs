//! Buildpipe Context
//!
//! A [`BuildContext`] is what a task sees when it runs for one environment:
//! the components that environment builds plus free-form metadata. The
//! [`ContextRegistry`] maps environment ids to their contexts. It is filled
//! before a run starts and only read while the pipeline executes.

mod context;
mod registry;

pub use context::{BuildContext, Component};
pub use registry::ContextRegistry;
