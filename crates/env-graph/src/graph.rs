//! Named-node dependency graph with Kahn's topological sort.
//!
//! Edges point from a dependency to its dependent: if `app` needs
//! `database`, the edge is `database -> app` and `app` has an in-degree of
//! one. [`DependencyGraph::sort`] returns nodes dependency-first.
//!
//! Iteration order is fully deterministic: nodes keep their registration
//! order, and the successors of a node keep the order their edges were
//! added in.

use std::collections::{HashMap, VecDeque};

use crate::error::{GraphError, Result};

/// Directed graph of named nodes.
///
/// The graph only records the description; [`sort`](Self::sort) works on a
/// private copy of the in-degree table so the same graph can be sorted any
/// number of times.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DependencyGraph {
    /// Node names in registration order.
    nodes: Vec<String>,
    /// Name -> position in `nodes`.
    index: HashMap<String, usize>,
    /// Per node, the dependents recorded by `add_edge`, in edge order.
    successors: Vec<Vec<usize>>,
    /// Per node, the number of dependencies it is waiting on.
    in_degree: Vec<usize>,
}

impl DependencyGraph {
    /// Create an empty dependency graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a node.
    ///
    /// Registering a name twice is a no-op; the node keeps its first
    /// position in the iteration order.
    pub fn add_node(&mut self, name: impl Into<String>) {
        let name = name.into();
        if self.index.contains_key(&name) {
            return;
        }
        self.index.insert(name.clone(), self.nodes.len());
        self.nodes.push(name);
        self.successors.push(Vec::new());
        self.in_degree.push(0);
    }

    /// Record that `dependent` needs `dependency` to come first.
    ///
    /// Returns `false` and leaves the graph untouched when either node was
    /// never registered. Declaring the same edge twice counts it twice.
    pub fn add_edge(&mut self, dependency: &str, dependent: &str) -> bool {
        let (Some(&from), Some(&to)) = (self.index.get(dependency), self.index.get(dependent))
        else {
            tracing::debug!(dependency, dependent, "Ignoring edge to unregistered node");
            return false;
        };
        self.successors[from].push(to);
        self.in_degree[to] += 1;
        true
    }

    /// Whether a node with this name was registered.
    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Return the number of nodes.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Return the number of edges.
    pub fn edge_count(&self) -> usize {
        self.successors.iter().map(Vec::len).sum()
    }

    /// Node names in registration order.
    pub fn nodes(&self) -> impl Iterator<Item = &str> {
        self.nodes.iter().map(String::as_str)
    }

    /// Direct dependents of a node, in edge order.
    pub fn dependents_of(&self, name: &str) -> Vec<&str> {
        self.index
            .get(name)
            .map(|&i| {
                self.successors[i]
                    .iter()
                    .map(|&s| self.nodes[s].as_str())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Perform a topological sort using Kahn's algorithm.
    ///
    /// Nodes without dependencies are seeded in registration order; a FIFO
    /// queue then releases each dependent once its last dependency has been
    /// emitted.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::Cycle`] when some nodes still wait on a
    /// dependency after the queue drains. No partial ordering is returned.
    pub fn sort(&self) -> Result<Vec<String>> {
        let mut in_degree = self.in_degree.clone();

        let mut queue: VecDeque<usize> = in_degree
            .iter()
            .enumerate()
            .filter(|&(_, &deg)| deg == 0)
            .map(|(i, _)| i)
            .collect();

        let mut result = Vec::with_capacity(self.nodes.len());

        while let Some(current) = queue.pop_front() {
            result.push(self.nodes[current].clone());

            for &next in &self.successors[current] {
                in_degree[next] -= 1;
                if in_degree[next] == 0 {
                    queue.push_back(next);
                }
            }
        }

        let remaining: usize = in_degree.iter().sum();
        if remaining > 0 {
            let participants: Vec<String> = in_degree
                .iter()
                .enumerate()
                .filter(|&(_, &deg)| deg > 0)
                .map(|(i, _)| self.nodes[i].clone())
                .collect();
            tracing::warn!(?participants, "Dependency cycle detected");
            return Err(GraphError::Cycle { participants });
        }

        Ok(result)
    }
}
