//! Named entity collections and their layered merge
//!
//! Providers, node sets, stacks and tasks are all maps keyed by name. When
//! a more specific descriptor layer is merged onto a less specific one,
//! same-named entries are merged pairwise with the entity's own [`Merge`]
//! rule, new entries are added, and entries only known to the base are left
//! alone.

use std::collections::BTreeMap;
use std::collections::btree_map::Entry;

use serde::Serialize;

use crate::validation::{Children, Traversable, Validatable};

/// In-place merge where the argument is the more specific layer.
///
/// Implementations mutate `self` and use the pure `override_with` helpers
/// for parameters, environment variables and proxies.
pub trait Merge {
    fn merge(&mut self, overlay: &Self);
}

/// Entities keyed by name
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Named<T>(BTreeMap<String, T>);

impl<T> Default for Named<T> {
    fn default() -> Self {
        Self(BTreeMap::new())
    }
}

impl<T> Named<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&T> {
        self.0.get(name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut T> {
        self.0.get_mut(name)
    }

    pub fn insert(&mut self, name: impl Into<String>, entity: T) -> Option<T> {
        self.0.insert(name.into(), entity)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Entries sorted by name
    pub fn iter(&self) -> impl Iterator<Item = (&String, &T)> {
        self.0.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (&String, &mut T)> {
        self.0.iter_mut()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn values(&self) -> impl Iterator<Item = &T> {
        self.0.values()
    }
}

impl<T: Merge + Clone> Named<T> {
    /// Merge `overlay` into this collection, entry by entry.
    pub fn merge(&mut self, overlay: &Named<T>) {
        for (name, entity) in &overlay.0 {
            match self.0.entry(name.clone()) {
                Entry::Occupied(mut existing) => existing.get_mut().merge(entity),
                Entry::Vacant(slot) => {
                    slot.insert(entity.clone());
                }
            }
        }
    }
}

impl<T> FromIterator<(String, T)> for Named<T> {
    fn from_iter<I: IntoIterator<Item = (String, T)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<T: Traversable> Traversable for Named<T>
where
    Self: Validatable,
{
    fn as_validatable(&self) -> Option<&dyn Validatable> {
        Some(self)
    }

    fn children(&self) -> Children<'_> {
        self.0.children()
    }
}
