//! Shared test fixtures for the environment resolver workspace.
//!
//! Dev-dependency only, never published.
//!
//! # Modules
//!
//! - [`fixtures`]: descriptor records of a two-layer sample environment
//! - [`files`]: [`DescriptorDir`] builder writing layer files for CLI tests

pub mod files;
pub mod fixtures;

pub use files::DescriptorDir;
