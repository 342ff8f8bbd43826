//! Descriptor layer files
//!
//! Layer files hold already-templated descriptor records. The format is
//! picked from the file extension and the descriptor is named after the
//! file stem.

use std::path::Path;

use env_model::{DescriptorLayer, EnvironmentRecord};

use crate::error::{CliError, Result};

/// Supported descriptor file formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Yaml,
    Json,
    Toml,
}

impl Format {
    /// Format of `path`, from its extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        let extension = path.extension()?.to_str()?.to_ascii_lowercase();
        match extension.as_str() {
            "yaml" | "yml" => Some(Self::Yaml),
            "json" => Some(Self::Json),
            "toml" => Some(Self::Toml),
            _ => None,
        }
    }
}

/// Parse a record from `content` in the given format.
pub fn parse_record(path: &Path, format: Format, content: &str) -> Result<EnvironmentRecord> {
    let path = path.to_path_buf();
    match format {
        // An empty YAML document is an empty descriptor
        Format::Yaml if content.trim().is_empty() => Ok(EnvironmentRecord::default()),
        Format::Yaml => {
            serde_yaml::from_str(content).map_err(|source| CliError::Yaml { path, source })
        }
        Format::Json => {
            serde_json::from_str(content).map_err(|source| CliError::Json { path, source })
        }
        Format::Toml => toml::from_str(content).map_err(|source| CliError::Toml { path, source }),
    }
}

/// Read one layer file.
pub fn load_layer(path: &Path) -> Result<DescriptorLayer> {
    let format = Format::from_path(path).ok_or_else(|| {
        CliError::user(format!(
            "unsupported descriptor format: {} (expected .yaml, .yml, .json or .toml)",
            path.display()
        ))
    })?;
    let content = std::fs::read_to_string(path).map_err(|source| CliError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let record = parse_record(path, format, &content)?;

    let descriptor = path
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    tracing::debug!(path = %path.display(), %descriptor, ?format, "Loaded descriptor layer");

    Ok(DescriptorLayer::new(descriptor, record))
}

/// Read every layer file, in order.
pub fn load_layers(paths: &[impl AsRef<Path>]) -> Result<Vec<DescriptorLayer>> {
    paths.iter().map(|p| load_layer(p.as_ref())).collect()
}
