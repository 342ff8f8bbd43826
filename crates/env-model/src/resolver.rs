//! Layered environment resolution
//!
//! A descriptor may inherit from another descriptor, which may inherit from
//! a third, and so on. The resolver takes the whole chain, least specific
//! layer first, builds each layer on its own and merges them in order so
//! that every later layer overrides the earlier ones.

use std::borrow::Cow;

use crate::component::{Component, ComponentKind};
use crate::environment::Environment;
use crate::error::{Error, Result};
use crate::record::EnvironmentRecord;
use crate::repository::{Repository, RepositoryResolver};

/// One already-parsed descriptor of the inheritance chain
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DescriptorLayer {
    /// Identifier of the descriptor, also the id of its component
    pub descriptor: String,
    /// Where the descriptor comes from, empty for local descriptors
    pub repository: Repository,
    pub record: EnvironmentRecord,
}

impl DescriptorLayer {
    pub fn new(descriptor: impl Into<String>, record: EnvironmentRecord) -> Self {
        Self {
            descriptor: descriptor.into(),
            repository: Repository::default(),
            record,
        }
    }

    pub fn with_repository(mut self, repository: Repository) -> Self {
        self.repository = repository;
        self
    }

    /// The record with an anonymous parent declaration pointing at the
    /// previous layer of the chain.
    fn linked_record(&self, previous: Option<&str>) -> Cow<'_, EnvironmentRecord> {
        match (&self.record.components.parent, previous) {
            (Some(parent), Some(previous)) if parent.id.is_none() => {
                let mut record = self.record.clone();
                if let Some(parent) = record.components.parent.as_mut() {
                    parent.id = Some(previous.to_string());
                }
                Cow::Owned(record)
            }
            _ => Cow::Borrowed(&self.record),
        }
    }
}

/// Builds and merges descriptor layers into one environment
pub struct EnvironmentResolver<'a> {
    repositories: &'a dyn RepositoryResolver,
}

impl<'a> EnvironmentResolver<'a> {
    pub fn new(repositories: &'a dyn RepositoryResolver) -> Self {
        Self { repositories }
    }

    /// Resolve `layers`, least specific first.
    ///
    /// Every layer but the last is a parent; the last one is the descriptor
    /// being resolved.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoLayers`] for an empty chain, or the first
    /// construction error of any layer.
    pub fn resolve(&self, layers: &[DescriptorLayer]) -> Result<Environment> {
        let mut merged: Option<Environment> = None;
        let mut previous: Option<&str> = None;

        for (index, layer) in layers.iter().enumerate() {
            let kind = if index + 1 == layers.len() {
                ComponentKind::Current
            } else {
                ComponentKind::Parent
            };
            tracing::debug!(descriptor = %layer.descriptor, %kind, "Building descriptor layer");

            let current = Component::new(layer.descriptor.clone(), kind, layer.repository.clone());
            let record = layer.linked_record(previous);
            let env = Environment::build(&layer.descriptor, current, &record, self.repositories)?;

            match merged.as_mut() {
                Some(base) => base.merge(&env),
                None => merged = Some(env),
            }
            previous = Some(layer.descriptor.as_str());
        }

        merged.ok_or(Error::NoLayers)
    }
}
