//! Error types for env-graph

/// Result type for graph operations
pub type Result<T> = std::result::Result<T, GraphError>;

/// Errors that can occur while ordering a dependency graph
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GraphError {
    /// The graph contains at least one cycle.
    ///
    /// `participants` lists every node that could not be ordered, in
    /// registration order. It includes the nodes on the cycle and any node
    /// that transitively depends on them.
    #[error("dependency cycle detected among: {}", participants.join(", "))]
    Cycle { participants: Vec<String> },
}
