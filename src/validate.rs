//! Structural validation
//!
//! Validates:
//! - Job id format (snake_case) in workflow descriptions
//! - Logical file names
//! - Acyclicity of the dependency graph
//! - File linkage: single producer per file, producer upstream of consumers
//!
//! Error codes:
//! - DAX-011: Invalid job id format (non-snake_case)
//! - DAX-012: Invalid logical file name
//! - DAX-020: Cycle detected
//! - DAX-031: File produced by more than one job
//! - DAX-032: Producer not connected to consumer

use std::collections::HashMap;

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use crate::adag::{Adag, Link};
use crate::error::DaxError;

static JOB_ID_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-z][a-z0-9_]*$").expect("valid job id regex"));

/// Validate a workflow-local job id (snake_case)
pub fn validate_job_id(id: &str) -> Result<(), DaxError> {
    if !JOB_ID_RE.is_match(id) {
        return Err(DaxError::InvalidJobId { id: id.to_string() });
    }
    Ok(())
}

/// Validate a logical file name: non-empty, no whitespace or control chars
pub fn validate_file_name(name: &str) -> Result<(), DaxError> {
    if name.is_empty() || name.chars().any(|c| c.is_whitespace() || c.is_control()) {
        return Err(DaxError::InvalidFileName {
            name: name.to_string(),
        });
    }
    Ok(())
}

/// Validate a built [`Adag`]: acyclicity, then file linkage.
///
/// Per-insertion rules (duplicate ids, unknown endpoints, self-edges,
/// duplicate uses) are already enforced by `Adag` itself; this pass checks
/// the properties only visible over the whole graph. Checks run in document
/// order, so the first violation reported is deterministic.
pub fn validate_adag(adag: &Adag) -> Result<(), DaxError> {
    let graph = adag.graph();
    graph.detect_cycles()?;

    // file -> producing job. Inout counts as both producer and consumer.
    let mut producers: HashMap<&str, &str> = HashMap::new();
    for (id, job) in adag.jobs() {
        for file_use in &job.uses {
            if matches!(file_use.link, Link::Output | Link::Inout) {
                if let Some(first) = producers.insert(file_use.file.name(), id) {
                    return Err(DaxError::DuplicateProducer {
                        file: file_use.file.name().to_string(),
                        first: first.to_string(),
                        second: id.to_string(),
                    });
                }
            }
        }
    }

    // Every produced file consumed by another job needs a dependency path
    // from producer to consumer. Files with no producer are workflow inputs
    // staged from outside and are legal.
    for (id, job) in adag.jobs() {
        for file_use in &job.uses {
            if matches!(file_use.link, Link::Input | Link::Inout) {
                if let Some(&producer) = producers.get(file_use.file.name()) {
                    if producer != id && !graph.has_path(producer, id) {
                        return Err(DaxError::MissingFlowEdge {
                            file: file_use.file.name().to_string(),
                            producer: producer.to_string(),
                            consumer: id.to_string(),
                        });
                    }
                }
            }
        }
    }

    debug!(
        jobs = adag.job_count(),
        dependencies = adag.dependency_count(),
        "validated workflow '{}'",
        adag.name
    );
    Ok(())
}
