//! Command implementations for env-cli

pub mod order;
pub mod show;
pub mod validate;

use std::path::PathBuf;

use env_model::{BaseUrlResolver, Environment, EnvironmentResolver};

use crate::error::{CliError, Result};
use crate::loader;

pub use order::run_order;
pub use show::run_show;
pub use validate::run_validate;

/// Load and merge descriptor layers, least specific first.
pub fn resolve_layers(layers: &[PathBuf], base_url: &str) -> Result<Environment> {
    let repositories = BaseUrlResolver::new(base_url)
        .map_err(|e| CliError::user(format!("invalid base URL {base_url}: {e}")))?;
    let layers = loader::load_layers(layers)?;
    tracing::info!(count = layers.len(), "Resolving descriptor layers");
    Ok(EnvironmentResolver::new(&repositories).resolve(&layers)?)
}
