//! DAX authoring object model (Arc<str> optimized)
//!
//! An [`Adag`] is the abstract DAG of a workflow: jobs with file-usage
//! annotations plus parent/child precedence edges. Jobs receive sequential
//! document identifiers (`ID0000001`, ...) when added. Structural rules that
//! only make sense over the whole graph (acyclicity, file linkage) live in
//! [`crate::validate`]; everything enforceable per insertion is enforced here.

use std::collections::{HashMap, HashSet};
use std::io;
use std::sync::Arc;

use serde::Deserialize;
use tracing::debug;

use crate::error::DaxError;
use crate::job_graph::JobGraph;
use crate::validate;
use crate::workflow::{ArgSpec, Workflow};
use crate::xml;

/// A logical file name, usable in argument lists and `uses` declarations.
///
/// Equality and hashing are by name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct File {
    name: String,
}

impl File {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }
}

/// Direction of a file usage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Link {
    Input,
    Output,
    Inout,
}

impl Link {
    pub fn as_str(&self) -> &'static str {
        match self {
            Link::Input => "input",
            Link::Output => "output",
            Link::Inout => "inout",
        }
    }
}

/// A `uses` declaration: file + direction + optional staging flags.
///
/// Unset flags are omitted from the serialized document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileUse {
    pub file: File,
    pub link: Link,
    pub transfer: Option<bool>,
    pub register: Option<bool>,
    pub optional: Option<bool>,
}

impl FileUse {
    pub fn new(file: &File, link: Link) -> Self {
        Self {
            file: file.clone(),
            link,
            transfer: None,
            register: None,
            optional: None,
        }
    }

    pub fn transfer(mut self, transfer: bool) -> Self {
        self.transfer = Some(transfer);
        self
    }

    pub fn register(mut self, register: bool) -> Self {
        self.register = Some(register);
        self
    }

    pub fn optional(mut self, optional: bool) -> Self {
        self.optional = Some(optional);
        self
    }
}

/// One element of a job argument list
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Arg {
    Plain(String),
    File(File),
}

/// A workflow node: transformation name, arguments, file usages.
///
/// Order of `args` and `uses` is preserved exactly as authored.
#[derive(Debug, Clone)]
pub struct Job {
    pub name: String,
    pub namespace: Option<String>,
    pub version: Option<String>,
    pub args: Vec<Arg>,
    pub uses: Vec<FileUse>,
}

impl Job {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            namespace: None,
            version: None,
            args: Vec::new(),
            uses: Vec::new(),
        }
    }

    pub fn namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }

    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    /// Append a plain-text argument
    pub fn arg(mut self, text: impl Into<String>) -> Self {
        self.args.push(Arg::Plain(text.into()));
        self
    }

    /// Append a file reference argument (serialized inline as `<file name=…/>`)
    pub fn file_arg(mut self, file: &File) -> Self {
        self.args.push(Arg::File(file.clone()));
        self
    }

    /// Declare a file usage with no staging flags
    pub fn uses(mut self, file: &File, link: Link) -> Self {
        self.uses.push(FileUse::new(file, link));
        self
    }

    /// Declare a file usage with explicit flags
    pub fn uses_with(mut self, file_use: FileUse) -> Self {
        self.uses.push(file_use);
        self
    }
}

/// Opaque handle to a job added to an [`Adag`]
///
/// Cloning is O(1); the handle is the job's document identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct JobRef {
    id: Arc<str>,
}

impl JobRef {
    #[inline]
    pub fn id(&self) -> &str {
        &self.id
    }
}

/// A parent → child precedence edge
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dependency {
    pub parent: Arc<str>,
    pub child: Arc<str>,
    /// Optional edge label, serialized as `edge-label` on the parent ref
    pub label: Option<String>,
}

#[derive(Debug, Clone)]
struct JobEntry {
    id: Arc<str>,
    job: Job,
}

/// The abstract DAG: jobs plus dependencies, serializable to DAX XML
#[derive(Debug, Clone)]
pub struct Adag {
    pub name: String,
    /// Partition index of this document (0 for unpartitioned workflows)
    pub index: u32,
    /// Total partition count
    pub count: u32,
    entries: Vec<JobEntry>,
    id_set: HashSet<Arc<str>>,
    dependencies: Vec<Dependency>,
    edge_set: HashSet<(Arc<str>, Arc<str>)>,
    next_seq: u32,
}

impl Adag {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            index: 0,
            count: 1,
            entries: Vec::new(),
            id_set: HashSet::new(),
            dependencies: Vec::new(),
            edge_set: HashSet::new(),
            next_seq: 1,
        }
    }

    /// Add a job under the next sequential identifier (`ID0000001`, ...)
    pub fn add_job(&mut self, job: Job) -> Result<JobRef, DaxError> {
        let id = format!("ID{:07}", self.next_seq);
        let job_ref = self.insert_job(Arc::from(id.as_str()), job)?;
        self.next_seq += 1;
        Ok(job_ref)
    }

    /// Add a job under an explicit identifier
    pub fn add_job_with_id(&mut self, id: &str, job: Job) -> Result<JobRef, DaxError> {
        if id.is_empty() || id.chars().any(|c| c.is_whitespace() || c.is_control()) {
            return Err(DaxError::InvalidJobId { id: id.to_string() });
        }
        self.insert_job(Arc::from(id), job)
    }

    fn insert_job(&mut self, id: Arc<str>, job: Job) -> Result<JobRef, DaxError> {
        if self.id_set.contains(id.as_ref()) {
            return Err(DaxError::DuplicateJob {
                id: id.as_ref().to_string(),
            });
        }

        {
            let mut seen_files: HashSet<&str> = HashSet::with_capacity(job.uses.len());
            for file_use in &job.uses {
                validate::validate_file_name(file_use.file.name())?;
                if !seen_files.insert(file_use.file.name()) {
                    return Err(DaxError::DuplicateUse {
                        job: job.name.clone(),
                        file: file_use.file.name().to_string(),
                    });
                }
            }
            for arg in &job.args {
                if let Arg::File(file) = arg {
                    validate::validate_file_name(file.name())?;
                }
            }
        }

        self.id_set.insert(Arc::clone(&id));
        self.entries.push(JobEntry {
            id: Arc::clone(&id),
            job,
        });
        Ok(JobRef { id })
    }

    /// Register a precedence edge between two added jobs
    pub fn add_dependency(&mut self, parent: &JobRef, child: &JobRef) -> Result<(), DaxError> {
        self.insert_dependency(parent.id(), child.id(), None)
    }

    /// Register a labeled precedence edge between two added jobs
    pub fn add_dependency_labeled(
        &mut self,
        parent: &JobRef,
        child: &JobRef,
        label: impl Into<String>,
    ) -> Result<(), DaxError> {
        self.insert_dependency(parent.id(), child.id(), Some(label.into()))
    }

    /// Register a precedence edge by job identifier
    pub fn depends(&mut self, parent: &str, child: &str) -> Result<(), DaxError> {
        self.insert_dependency(parent, child, None)
    }

    fn insert_dependency(
        &mut self,
        parent: &str,
        child: &str,
        label: Option<String>,
    ) -> Result<(), DaxError> {
        let parent_arc = self
            .id_set
            .get(parent)
            .cloned()
            .ok_or_else(|| DaxError::UnknownJob {
                id: parent.to_string(),
            })?;
        let child_arc = self
            .id_set
            .get(child)
            .cloned()
            .ok_or_else(|| DaxError::UnknownJob {
                id: child.to_string(),
            })?;

        if parent_arc == child_arc {
            return Err(DaxError::SelfDependency {
                id: parent.to_string(),
            });
        }
        if !self
            .edge_set
            .insert((Arc::clone(&parent_arc), Arc::clone(&child_arc)))
        {
            return Err(DaxError::DuplicateDependency {
                parent: parent.to_string(),
                child: child.to_string(),
            });
        }

        self.dependencies.push(Dependency {
            parent: parent_arc,
            child: child_arc,
            label,
        });
        Ok(())
    }

    /// Check whether an exact edge is already registered
    pub fn has_edge(&self, parent: &str, child: &str) -> bool {
        match (self.id_set.get(parent), self.id_set.get(child)) {
            (Some(p), Some(c)) => self.edge_set.contains(&(Arc::clone(p), Arc::clone(c))),
            _ => false,
        }
    }

    /// Jobs in insertion order, with their document identifiers
    pub fn jobs(&self) -> impl Iterator<Item = (&str, &Job)> {
        self.entries.iter().map(|e| (e.id.as_ref(), &e.job))
    }

    /// Look up a job by document identifier
    pub fn job(&self, id: &str) -> Option<&Job> {
        self.entries
            .iter()
            .find(|e| e.id.as_ref() == id)
            .map(|e| &e.job)
    }

    pub fn dependencies(&self) -> &[Dependency] {
        &self.dependencies
    }

    pub fn job_count(&self) -> usize {
        self.entries.len()
    }

    pub fn dependency_count(&self) -> usize {
        self.dependencies.len()
    }

    pub(crate) fn id_arcs(&self) -> impl Iterator<Item = &Arc<str>> {
        self.entries.iter().map(|e| &e.id)
    }

    /// Build the dependency graph over the registered edges
    pub fn graph(&self) -> JobGraph {
        JobGraph::from_adag(self)
    }

    /// Run the full structural pass: acyclicity and file linkage
    pub fn validate(&self) -> Result<(), DaxError> {
        validate::validate_adag(self)
    }

    /// Serialize to a DAX 3.4 document
    pub fn write_xml<W: io::Write>(&self, writer: &mut W) -> Result<(), DaxError> {
        xml::write_adag(self, writer)
    }

    pub fn to_xml_string(&self) -> String {
        xml::adag_to_string(self)
    }

    /// Compile a declarative workflow description into the object model.
    ///
    /// Jobs receive sequential identifiers in declaration order. Fan-out and
    /// fan-in flows expand to individual edges; a flow pair declared twice
    /// collapses to a single edge.
    pub fn from_workflow(workflow: &Workflow) -> Result<Adag, DaxError> {
        let mut adag = Adag::new(workflow.name.as_str());
        adag.index = workflow.index;
        adag.count = workflow.count;

        let mut refs: HashMap<&str, JobRef> = HashMap::with_capacity(workflow.jobs.len());
        for spec in &workflow.jobs {
            validate::validate_job_id(&spec.id)?;
            if refs.contains_key(spec.id.as_str()) {
                return Err(DaxError::DuplicateJob {
                    id: spec.id.clone(),
                });
            }

            let mut job = Job::new(spec.transformation_name());
            if let Some(ref namespace) = spec.namespace {
                job = job.namespace(namespace.as_str());
            }
            if let Some(ref version) = spec.version {
                job = job.version(version.as_str());
            }
            for arg in &spec.args {
                job = match arg {
                    ArgSpec::Plain(text) => job.arg(text.as_str()),
                    ArgSpec::File { file } => job.file_arg(&File::new(file.as_str())),
                };
            }
            for uses in &spec.uses {
                let mut file_use = FileUse::new(&File::new(uses.file.as_str()), uses.link);
                file_use.transfer = uses.transfer;
                file_use.register = uses.register;
                file_use.optional = uses.optional;
                job = job.uses_with(file_use);
            }

            let job_ref = adag.add_job(job)?;
            refs.insert(spec.id.as_str(), job_ref);
        }

        for flow in &workflow.flows {
            for source in flow.source.as_vec() {
                for target in flow.target.as_vec() {
                    let parent = refs.get(source).ok_or_else(|| DaxError::UnknownJob {
                        id: source.to_string(),
                    })?;
                    let child = refs.get(target).ok_or_else(|| DaxError::UnknownJob {
                        id: target.to_string(),
                    })?;
                    // Declarative form is idempotent: repeated pairs collapse
                    if adag.has_edge(parent.id(), child.id()) {
                        continue;
                    }
                    adag.add_dependency(parent, child)?;
                }
            }
        }

        debug!(
            jobs = adag.job_count(),
            dependencies = adag.dependency_count(),
            "compiled workflow '{}'",
            adag.name
        );
        Ok(adag)
    }
}
