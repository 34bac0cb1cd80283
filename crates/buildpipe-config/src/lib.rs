//! Buildpipe Config
//!
//! Serializable pipeline definitions. A pipeline file describes the build
//! environments and their components, the tasks to run, and the queue that
//! pairs tasks with environments in the order they must run.
//!
//! ```json
//! {
//!   "name": "workspace",
//!   "envs": [
//!     { "id": "react", "components": [{ "id": "ui/button", "path": "components/button" }] }
//!   ],
//!   "tasks": [
//!     { "id": "compiler:tsc", "command": "tsc -p .", "artifacts": [{ "name": "dist", "patterns": ["dist/**"] }] },
//!     { "id": "tester:jest", "command": "jest", "dependencies": ["compiler"] }
//!   ],
//!   "queue": [
//!     { "task": "compiler:tsc", "env": "react" },
//!     { "task": "tester:jest", "env": "react" }
//!   ]
//! }
//! ```
//!
//! The definitions are plain data; turning them into runnable tasks and build
//! contexts happens in the binary.

mod env;
mod pipeline;
mod task;

pub use env::{ComponentDef, EnvDef};
pub use pipeline::{PipelineDef, QueueEntryDef};
pub use task::{ArtifactDef, TaskDef};
