//! Error types for env-cli

use std::path::PathBuf;

/// Result type for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;

/// Errors that can occur in CLI operations
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Error from env-model
    #[error(transparent)]
    Model(#[from] env_model::Error),

    /// A descriptor file could not be read
    #[error("Failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid YAML in {}: {source}", .path.display())]
    Yaml {
        path: PathBuf,
        source: serde_yaml::Error,
    },

    #[error("Invalid JSON in {}: {source}", .path.display())]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("Invalid TOML in {}: {source}", .path.display())]
    Toml {
        path: PathBuf,
        source: toml::de::Error,
    },

    /// Report serialization failed
    #[error("Failed to serialize output: {0}")]
    Output(#[from] serde_json::Error),

    /// The resolved environment has validation errors
    #[error("environment has {count} validation error(s)")]
    Invalid { count: usize },

    /// User-facing error with a message
    #[error("{message}")]
    User { message: String },
}

impl CliError {
    /// Create a new user error with the given message
    pub fn user(message: impl Into<String>) -> Self {
        Self::User {
            message: message.into(),
        }
    }

    /// Process exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Invalid { .. } => 2,
            _ => 1,
        }
    }
}
