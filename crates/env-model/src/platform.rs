//! Component identity graph of an environment
//!
//! The platform records which component is the descriptor being resolved,
//! the chain of descriptors it inherits from, and every component any layer
//! referenced, merged by id.

use std::collections::BTreeMap;
use std::collections::btree_map::Entry;

use serde::Serialize;

use crate::collection::Merge;
use crate::component::{Component, ComponentKind};
use crate::error::{Error, Result};
use crate::record::ComponentsRecord;
use crate::repository::{Repository, RepositoryResolver};

/// Suffix of the default id given to a layer's parent declaration
pub const PARENT_ID_SUFFIX: &str = "-parent";

/// Resolved component graph
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Platform {
    /// Id of the descriptor being resolved; always a key of `components`
    current: String,
    /// Ids of inherited descriptors: the nearest parent first, the most
    /// distant ancestor last
    parents: Vec<String>,
    components: BTreeMap<String, Component>,
}

impl Default for Platform {
    fn default() -> Self {
        Self::new(Component::new(
            String::new(),
            ComponentKind::Current,
            Repository::default(),
        ))
    }
}

impl Platform {
    /// Create a platform whose current component is `current`.
    pub fn new(current: Component) -> Self {
        let id = current.id.clone();
        let mut components = BTreeMap::new();
        components.insert(id.clone(), current);
        Self {
            current: id,
            parents: Vec::new(),
            components,
        }
    }

    /// Build the platform of one descriptor layer.
    ///
    /// `current` is the component standing for the layer itself. Its
    /// repository, when known, is the base relative declarations resolve
    /// against.
    ///
    /// # Errors
    ///
    /// Fails on the first declared component without a repository, and on
    /// any error of `resolver`.
    pub fn build(
        descriptor: &str,
        current: Component,
        record: &ComponentsRecord,
        resolver: &dyn RepositoryResolver,
    ) -> Result<Self> {
        let base = (!current.repository.is_empty()).then(|| current.repository.clone());
        let mut platform = Self::new(current);

        if let Some(parent) = &record.parent {
            let id = parent
                .id
                .clone()
                .unwrap_or_else(|| format!("{descriptor}{PARENT_ID_SUFFIX}"));
            let component = build_component(
                descriptor,
                &id,
                ComponentKind::Parent,
                parent,
                resolver,
                base.as_ref(),
            )?;
            platform.parents.push(id);
            platform.register_component(component);
        }

        for (id, declaration) in &record.components {
            let component = build_component(
                descriptor,
                id,
                ComponentKind::Referenced,
                declaration,
                resolver,
                base.as_ref(),
            )?;
            platform.register_component(component);
        }

        Ok(platform)
    }

    /// The component of the descriptor being resolved
    pub fn current(&self) -> &Component {
        &self.components[&self.current]
    }

    /// Inherited descriptors, nearest parent first
    pub fn parents(&self) -> impl Iterator<Item = &Component> {
        self.parents.iter().filter_map(|id| self.components.get(id))
    }

    pub fn parent_ids(&self) -> &[String] {
        &self.parents
    }

    pub fn component(&self, id: &str) -> Option<&Component> {
        self.components.get(id)
    }

    pub fn components(&self) -> &BTreeMap<String, Component> {
        &self.components
    }

    /// Add a component, merging it into any existing one with the same id.
    pub fn register_component(&mut self, component: Component) {
        match self.components.entry(component.id.clone()) {
            Entry::Occupied(mut existing) => {
                tracing::debug!(id = %component.id, "Merging component declaration");
                existing.get_mut().merge(&component);
            }
            Entry::Vacant(slot) => {
                tracing::debug!(
                    id = %component.id,
                    kind = %component.kind,
                    "Registering component"
                );
                slot.insert(component);
            }
        }
    }

    /// Merge a more specific layer's platform into this one.
    ///
    /// The current component of `other` becomes current. If the previous
    /// current component is a parent, it is prepended to the parent chain.
    pub fn merge(&mut self, other: &Platform) {
        let previous = self.current.clone();
        if self.current().kind == ComponentKind::Parent && !self.parents.contains(&previous) {
            self.parents.insert(0, previous);
        }

        for component in other.components.values() {
            self.register_component(component.clone());
        }
        for id in &other.parents {
            if !self.parents.contains(id) {
                self.parents.push(id.clone());
            }
        }
        self.current = other.current.clone();
    }
}

fn build_component(
    descriptor: &str,
    id: &str,
    kind: ComponentKind,
    declaration: &crate::record::ComponentRecord,
    resolver: &dyn RepositoryResolver,
    base: Option<&Repository>,
) -> Result<Component> {
    if declaration.repository.trim().is_empty() {
        return Err(Error::MissingRepository {
            id: id.to_string(),
            descriptor: descriptor.to_string(),
        });
    }
    let repository = resolver.resolve(id, declaration, base)?;
    Ok(Component {
        id: id.to_string(),
        kind,
        repository,
        templates: declaration.templates.iter().cloned().collect(),
        playbooks: declaration.playbooks.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::ComponentRecord;
    use crate::repository::{BaseUrlResolver, DEFAULT_BASE_URL};

    fn resolver() -> BaseUrlResolver {
        BaseUrlResolver::new(DEFAULT_BASE_URL).unwrap()
    }

    fn declaration(repository: &str) -> ComponentRecord {
        ComponentRecord {
            repository: repository.to_string(),
            ..ComponentRecord::default()
        }
    }

    #[test]
    fn test_build_registers_parent_and_components() {
        let mut record = ComponentsRecord::default();
        record.parent = Some(declaration("acme/distribution"));
        record
            .components
            .insert("aws".to_string(), declaration("acme/aws-provider"));

        let current = Component::new("root", ComponentKind::Current, Repository::default());
        let platform = Platform::build("root", current, &record, &resolver()).unwrap();

        assert_eq!(platform.current().id, "root");
        assert_eq!(platform.parent_ids(), &["root-parent".to_string()]);
        assert_eq!(
            platform.component("aws").unwrap().repository.location,
            "https://github.com/acme/aws-provider"
        );
        assert_eq!(platform.components().len(), 3);
    }

    #[test]
    fn test_build_fails_fast_without_repository() {
        let mut record = ComponentsRecord::default();
        record.components.insert("broken".to_string(), declaration(""));
        record
            .components
            .insert("fine".to_string(), declaration("acme/fine"));

        let current = Component::new("root", ComponentKind::Current, Repository::default());
        let err = Platform::build("root", current, &record, &resolver()).unwrap_err();

        match err {
            Error::MissingRepository { id, descriptor } => {
                assert_eq!(id, "broken");
                assert_eq!(descriptor, "root");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_merge_prepends_parent_current() {
        let mut outer = Platform::new(Component::new(
            "dist",
            ComponentKind::Parent,
            Repository::new("https://github.com/acme/dist", "v1"),
        ));
        let inner = Platform::new(Component::new(
            "root",
            ComponentKind::Current,
            Repository::default(),
        ));

        outer.merge(&inner);

        assert_eq!(outer.current().id, "root");
        assert_eq!(outer.parent_ids(), &["dist".to_string()]);
        assert!(outer.component("dist").is_some());
    }

    #[test]
    fn test_register_order_does_not_matter() {
        let mut a = Component::new("c", ComponentKind::Referenced, Repository::new("x/c", "v1"));
        a.templates.insert("a".to_string());
        let mut b = Component::new("c", ComponentKind::Referenced, Repository::new("x/c", "v1"));
        b.templates.insert("b".to_string());

        let mut first = Platform::default();
        first.register_component(a.clone());
        first.register_component(b.clone());
        let mut second = Platform::default();
        second.register_component(b);
        second.register_component(a);

        assert_eq!(first, second);
    }
}
