//! daxgen - abstract workflow DAG authoring and DAX XML generation

pub mod adag;
pub mod error;
pub mod job_graph;
pub mod validate;
pub mod workflow;
pub mod xml;

pub use adag::{Adag, Arg, Dependency, File, FileUse, Job, JobRef, Link};
pub use error::{DaxError, FixSuggestion};
pub use job_graph::JobGraph;
pub use workflow::{Workflow, WORKFLOW_SCHEMA};
