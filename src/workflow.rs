//! Workflow parsing structures

use serde::Deserialize;

use crate::adag::Link;

/// Schema tag every workflow file must carry
pub const WORKFLOW_SCHEMA: &str = "daxgen/workflow@0.1";

/// Workflow description parsed from YAML
#[derive(Debug, Deserialize)]
pub struct Workflow {
    pub schema: String,
    pub name: String,
    /// Partition index (0 for unpartitioned workflows)
    #[serde(default)]
    pub index: u32,
    /// Total partition count
    #[serde(default = "default_count")]
    pub count: u32,
    pub jobs: Vec<JobSpec>,
    #[serde(default)]
    pub flows: Vec<Flow>,
}

fn default_count() -> u32 {
    1
}

#[derive(Debug, Deserialize)]
pub struct JobSpec {
    /// Workflow-local id (snake_case), referenced by flows
    pub id: String,
    /// Executable name; defaults to the id
    #[serde(default)]
    pub transformation: Option<String>,
    #[serde(default)]
    pub namespace: Option<String>,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub args: Vec<ArgSpec>,
    #[serde(default)]
    pub uses: Vec<UsesSpec>,
}

impl JobSpec {
    pub fn transformation_name(&self) -> &str {
        self.transformation.as_deref().unwrap_or(&self.id)
    }
}

/// Argument list entry: plain text OR a `{file: name}` mapping
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum ArgSpec {
    Plain(String),
    File { file: String },
}

#[derive(Debug, Deserialize)]
pub struct UsesSpec {
    pub file: String,
    pub link: Link,
    #[serde(default)]
    pub transfer: Option<bool>,
    #[serde(default)]
    pub register: Option<bool>,
    #[serde(default)]
    pub optional: Option<bool>,
}

#[derive(Debug, Deserialize)]
pub struct Flow {
    pub source: FlowEndpoint,
    pub target: FlowEndpoint,
}

/// Handles string OR array for source/target
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum FlowEndpoint {
    Single(String),
    Multiple(Vec<String>),
}

impl FlowEndpoint {
    pub fn as_vec(&self) -> Vec<&str> {
        match self {
            FlowEndpoint::Single(s) => vec![s.as_str()],
            FlowEndpoint::Multiple(v) => v.iter().map(|s| s.as_str()).collect(),
        }
    }
}
