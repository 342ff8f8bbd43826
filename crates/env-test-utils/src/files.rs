//! [`DescriptorDir`] builder for tests reading layer files from disk.

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

/// A temporary directory holding descriptor layer files.
///
/// # Example
///
/// ```rust,no_run
/// use env_test_utils::DescriptorDir;
/// use env_test_utils::fixtures::{DISTRIBUTION_YAML, ROOT_YAML};
///
/// let dir = DescriptorDir::new();
/// let base = dir.write("distribution.yaml", DISTRIBUTION_YAML);
/// let root = dir.write("root.yaml", ROOT_YAML);
/// assert!(base.exists() && root.exists());
/// ```
pub struct DescriptorDir {
    temp_dir: TempDir,
}

impl Default for DescriptorDir {
    fn default() -> Self {
        Self::new()
    }
}

impl DescriptorDir {
    /// Create an empty temporary directory.
    pub fn new() -> Self {
        Self {
            temp_dir: TempDir::new().expect("DescriptorDir::new: failed to create temp dir"),
        }
    }

    /// Return the root path of the temporary directory.
    pub fn root(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Write `content` to `name` (relative to the root) and return its path.
    pub fn write(&self, name: &str, content: &str) -> PathBuf {
        let path = self.root().join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, content).unwrap();
        path
    }

    /// Write the two layers of the sample environment and return their
    /// paths, least specific first.
    pub fn write_shop_layers(&self) -> [PathBuf; 2] {
        [
            self.write("distribution.yaml", crate::fixtures::DISTRIBUTION_YAML),
            self.write("root.yaml", crate::fixtures::ROOT_YAML),
        ]
    }
}
