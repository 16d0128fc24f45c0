//! Error types with fix suggestions

use thiserror::Error;

/// Trait for errors that provide fix suggestions
pub trait FixSuggestion {
    fn fix_suggestion(&self) -> Option<&str>;
}

#[derive(Error, Debug)]
pub enum DaxError {
    #[error("YAML parse error: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("DAX-001: Invalid schema tag '{found}' (expected '{expected}')")]
    SchemaMismatch { expected: String, found: String },

    // ─────────────────────────────────────────────────────────────
    // Job errors (DAX-010 to DAX-012)
    // ─────────────────────────────────────────────────────────────

    #[error("DAX-010: Duplicate job id '{id}'")]
    DuplicateJob { id: String },

    #[error("DAX-011: Invalid job id '{id}' (expected snake_case: [a-z][a-z0-9_]*)")]
    InvalidJobId { id: String },

    #[error("DAX-012: Invalid logical file name '{name}'")]
    InvalidFileName { name: String },

    // ─────────────────────────────────────────────────────────────
    // Dependency errors (DAX-020 to DAX-023)
    // ─────────────────────────────────────────────────────────────

    #[error("DAX-020: Cycle detected in workflow: {cycle}")]
    CycleDetected { cycle: String },

    #[error("DAX-021: Dependency references unknown job '{id}'")]
    UnknownJob { id: String },

    #[error("DAX-022: Job '{id}' cannot depend on itself")]
    SelfDependency { id: String },

    #[error("DAX-023: Duplicate dependency {parent} → {child}")]
    DuplicateDependency { parent: String, child: String },

    // ─────────────────────────────────────────────────────────────
    // File linkage errors (DAX-030 to DAX-032)
    // ─────────────────────────────────────────────────────────────

    #[error("DAX-030: Job '{job}' declares file '{file}' more than once")]
    DuplicateUse { job: String, file: String },

    #[error("DAX-031: File '{file}' is produced by both '{first}' and '{second}'")]
    DuplicateProducer {
        file: String,
        first: String,
        second: String,
    },

    #[error(
        "DAX-032: File '{file}' flows from '{producer}' to '{consumer}' \
         but no dependency path connects them"
    )]
    MissingFlowEdge {
        file: String,
        producer: String,
        consumer: String,
    },
}

impl FixSuggestion for DaxError {
    fn fix_suggestion(&self) -> Option<&str> {
        match self {
            DaxError::YamlParse(_) => Some("Check YAML syntax: indentation and quoting"),
            DaxError::Io(_) => Some("Check file path and permissions"),
            DaxError::SchemaMismatch { .. } => {
                Some("Set schema: daxgen/workflow@0.1 at the top of the workflow file")
            }
            DaxError::DuplicateJob { .. } => Some("Use unique job ids within the workflow"),
            DaxError::InvalidJobId { .. } => {
                Some("Rename the job id to lowercase letters, digits and underscores")
            }
            DaxError::InvalidFileName { .. } => {
                Some("Logical file names must be non-empty and contain no whitespace")
            }
            DaxError::CycleDetected { .. } => {
                Some("Remove one of the flows along the cycle - workflows must be acyclic")
            }
            DaxError::UnknownJob { .. } => Some("Verify the job id exists in your workflow"),
            DaxError::SelfDependency { .. } => Some("Remove the flow from the job to itself"),
            DaxError::DuplicateDependency { .. } => {
                Some("Declare each parent/child pair only once")
            }
            DaxError::DuplicateUse { .. } => Some("List each file at most once per job in uses:"),
            DaxError::DuplicateProducer { .. } => {
                Some("Give each output file a distinct name, or merge the producing jobs")
            }
            DaxError::MissingFlowEdge { .. } => {
                Some("Add a flow from the producing job to the consuming job")
            }
        }
    }
}
