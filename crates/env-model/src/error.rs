//! Error types for env-model
//!
//! These are the fail-fast construction errors. Problems found in a fully
//! built model are reported through
//! [`ValidationErrors`](crate::validation::ValidationErrors) instead.

/// Result type for env-model operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that abort building an environment
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A component was declared without any repository location
    #[error("Component '{id}' declared in {descriptor} has no repository")]
    MissingRepository { id: String, descriptor: String },

    /// The repository resolver rejected a component reference
    #[error("Unable to resolve repository of component '{id}': {reason}")]
    Resolution { id: String, reason: String },

    /// A repository location could not be parsed as a URL
    #[error("Invalid repository URL '{location}' for component '{id}': {source}")]
    InvalidRepositoryUrl {
        id: String,
        location: String,
        source: url::ParseError,
    },

    /// No descriptor layer was supplied to the resolver
    #[error("No descriptor layer to resolve")]
    NoLayers,

    /// Stack ordering failed
    #[error(transparent)]
    Graph(#[from] env_graph::GraphError),
}
