//! Job graph built from workflow dependencies (Arc<str> optimized)
//!
//! Uses Arc<str> for zero-cost cloning of job identifiers.

use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::Arc;

use crate::adag::Adag;
use crate::error::DaxError;

/// Graph of job dependencies built from an [`Adag`]'s edges
pub struct JobGraph {
    /// job_id -> list of successor job_ids
    adjacency: HashMap<Arc<str>, Vec<Arc<str>>>,
    /// job_id -> list of predecessor job_ids (dependencies)
    predecessors: HashMap<Arc<str>, Vec<Arc<str>>>,
    /// All job ids, in document order
    job_ids: Vec<Arc<str>>,
}

impl JobGraph {
    pub fn from_adag(adag: &Adag) -> Self {
        let capacity = adag.job_count();
        let mut adjacency: HashMap<Arc<str>, Vec<Arc<str>>> = HashMap::with_capacity(capacity);
        let mut predecessors: HashMap<Arc<str>, Vec<Arc<str>>> = HashMap::with_capacity(capacity);
        let mut job_ids: Vec<Arc<str>> = Vec::with_capacity(capacity);

        // Reuse the Adag's Arc<str> ids, one clone per job
        for id in adag.id_arcs() {
            job_ids.push(Arc::clone(id));
            adjacency.insert(Arc::clone(id), Vec::new());
            predecessors.insert(Arc::clone(id), Vec::new());
        }

        // Endpoints are guaranteed present: Adag rejects unknown ids on insert
        for dep in adag.dependencies() {
            adjacency
                .entry(Arc::clone(&dep.parent))
                .or_default()
                .push(Arc::clone(&dep.child));
            predecessors
                .entry(Arc::clone(&dep.child))
                .or_default()
                .push(Arc::clone(&dep.parent));
        }

        Self {
            adjacency,
            predecessors,
            job_ids,
        }
    }

    /// Get dependencies of a job (returns Arc<str> slice)
    #[inline]
    pub fn dependencies(&self, job_id: &str) -> &[Arc<str>] {
        static EMPTY: &[Arc<str>] = &[];
        self.predecessors
            .get(job_id)
            .map(|v| v.as_slice())
            .unwrap_or(EMPTY)
    }

    /// Get successors of a job
    #[inline]
    pub fn successors(&self, job_id: &str) -> &[Arc<str>] {
        static EMPTY: &[Arc<str>] = &[];
        self.adjacency
            .get(job_id)
            .map(|v| v.as_slice())
            .unwrap_or(EMPTY)
    }

    /// Jobs with no predecessors (workflow entry points)
    pub fn roots(&self) -> Vec<Arc<str>> {
        self.job_ids
            .iter()
            .filter(|id| {
                self.predecessors
                    .get(id.as_ref())
                    .map(|v| v.is_empty())
                    .unwrap_or(true)
            })
            .cloned()
            .collect()
    }

    /// Jobs with no successors (final jobs)
    pub fn leaves(&self) -> Vec<Arc<str>> {
        self.job_ids
            .iter()
            .filter(|id| {
                self.adjacency
                    .get(id.as_ref())
                    .map(|v| v.is_empty())
                    .unwrap_or(true)
            })
            .cloned()
            .collect()
    }

    /// Check if there's a path from `from` to `to` (BFS)
    pub fn has_path(&self, from: &str, to: &str) -> bool {
        if from == to {
            return true;
        }

        let mut visited: HashSet<&str> = HashSet::new();
        let mut queue: VecDeque<&str> = VecDeque::new();

        queue.push_back(from);
        visited.insert(from);

        while let Some(current) = queue.pop_front() {
            if let Some(neighbors) = self.adjacency.get(current) {
                for neighbor in neighbors {
                    if neighbor.as_ref() == to {
                        return true;
                    }
                    if !visited.contains(neighbor.as_ref()) {
                        visited.insert(neighbor.as_ref());
                        queue.push_back(neighbor.as_ref());
                    }
                }
            }
        }

        false
    }

    /// Detect cycles using DFS with three-color marking.
    ///
    /// Returns `Ok(())` if acyclic, `Err(DaxError::CycleDetected)` with the
    /// cycle path if one is found.
    ///
    /// - White: unvisited
    /// - Gray: currently in DFS stack (visiting)
    /// - Black: fully processed (all descendants visited)
    ///
    /// A cycle is detected when a Gray node is reached while traversing.
    pub fn detect_cycles(&self) -> Result<(), DaxError> {
        #[derive(Clone, Copy, PartialEq, Eq)]
        enum Color {
            White,
            Gray,
            Black,
        }

        let mut colors: HashMap<Arc<str>, Color> = self
            .job_ids
            .iter()
            .map(|id| (Arc::clone(id), Color::White))
            .collect();
        let mut stack: Vec<Arc<str>> = Vec::new();

        fn dfs(
            node: Arc<str>,
            adjacency: &HashMap<Arc<str>, Vec<Arc<str>>>,
            colors: &mut HashMap<Arc<str>, Color>,
            stack: &mut Vec<Arc<str>>,
        ) -> Result<(), String> {
            colors.insert(Arc::clone(&node), Color::Gray);
            stack.push(Arc::clone(&node));

            if let Some(neighbors) = adjacency.get(&node) {
                for neighbor in neighbors {
                    match colors.get(neighbor) {
                        Some(Color::Gray) => {
                            // A Gray neighbor is in the current DFS path
                            let cycle_start = stack
                                .iter()
                                .position(|x| x.as_ref() == neighbor.as_ref())
                                .unwrap_or(0);
                            let cycle: Vec<&str> =
                                stack[cycle_start..].iter().map(|s| s.as_ref()).collect();
                            return Err(format!("{} → {}", cycle.join(" → "), neighbor));
                        }
                        Some(Color::White) | None => {
                            dfs(Arc::clone(neighbor), adjacency, colors, stack)?;
                        }
                        Some(Color::Black) => {} // Already processed
                    }
                }
            }

            stack.pop();
            colors.insert(node, Color::Black);
            Ok(())
        }

        for job_id in &self.job_ids {
            if colors.get(job_id) == Some(&Color::White) {
                if let Err(cycle) = dfs(Arc::clone(job_id), &self.adjacency, &mut colors, &mut stack)
                {
                    return Err(DaxError::CycleDetected { cycle });
                }
            }
        }

        Ok(())
    }

    /// Total order of job ids consistent with every edge (Kahn's algorithm).
    ///
    /// Ties break by document order, so the result is deterministic.
    pub fn topological_order(&self) -> Result<Vec<Arc<str>>, DaxError> {
        self.detect_cycles()?;

        let mut in_degree: HashMap<&str, usize> =
            self.job_ids.iter().map(|id| (id.as_ref(), 0)).collect();
        for targets in self.adjacency.values() {
            for target in targets {
                *in_degree.entry(target.as_ref()).or_insert(0) += 1;
            }
        }

        let mut queue: VecDeque<Arc<str>> = self
            .job_ids
            .iter()
            .filter(|id| in_degree.get(id.as_ref()).copied().unwrap_or(0) == 0)
            .cloned()
            .collect();

        let mut order: Vec<Arc<str>> = Vec::with_capacity(self.job_ids.len());
        while let Some(id) = queue.pop_front() {
            for succ in self.successors(&id) {
                if let Some(degree) = in_degree.get_mut(succ.as_ref()) {
                    *degree -= 1;
                    if *degree == 0 {
                        queue.push_back(Arc::clone(succ));
                    }
                }
            }
            order.push(id);
        }

        Ok(order)
    }
}
