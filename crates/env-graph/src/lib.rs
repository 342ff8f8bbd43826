//! Dependency ordering for environment descriptors.
//!
//! Stacks (and any other named items with inter-dependencies) are registered
//! as nodes of a [`DependencyGraph`]; each declared dependency becomes an
//! edge. [`DependencyGraph::sort`] linearizes the graph with Kahn's algorithm
//! and reports cycles as [`GraphError::Cycle`].
//!
//! # Example
//!
//! ```
//! use env_graph::DependencyGraph;
//!
//! let mut graph = DependencyGraph::new();
//! graph.add_node("network");
//! graph.add_node("database");
//! graph.add_node("app");
//! assert!(graph.add_edge("network", "database"));
//! assert!(graph.add_edge("database", "app"));
//!
//! let order = graph.sort().unwrap();
//! assert_eq!(order, vec!["network", "database", "app"]);
//! ```

pub mod error;
pub mod graph;

pub use error::{GraphError, Result};
pub use graph::DependencyGraph;
