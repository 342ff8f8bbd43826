//! Components and references to them
//!
//! A component is an identified, versioned source of descriptor content and
//! playbooks. Entities point at their component through a [`ComponentRef`],
//! which validation checks against the resolved platform.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::collection::Merge;
use crate::environment::Environment;
use crate::location::DescriptorLocation;
use crate::repository::Repository;
use crate::validation::{Traversable, Validatable, ValidationErrors};

/// Role of a component in the platform
///
/// Ordered from weakest to strongest: merging two declarations of the same
/// id keeps the strongest role.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComponentKind {
    /// Referenced by some descriptor
    #[default]
    Referenced,
    /// A descriptor inherited from
    Parent,
    /// The descriptor currently being resolved
    Current,
}

impl fmt::Display for ComponentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Referenced => write!(f, "referenced"),
            Self::Parent => write!(f, "parent"),
            Self::Current => write!(f, "current"),
        }
    }
}

/// An identified source of descriptor content and playbooks
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Component {
    pub id: String,
    pub kind: ComponentKind,
    pub repository: Repository,
    /// Patterns of files to run through templating
    #[serde(skip_serializing_if = "BTreeSet::is_empty")]
    pub templates: BTreeSet<String>,
    /// Custom playbooks keyed by the hook or action they replace
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub playbooks: BTreeMap<String, String>,
}

impl Component {
    pub fn new(id: impl Into<String>, kind: ComponentKind, repository: Repository) -> Self {
        Self {
            id: id.into(),
            kind,
            repository,
            ..Self::default()
        }
    }

    /// A reference pointing at this component
    pub fn reference(&self) -> ComponentRef {
        ComponentRef::new(self.id.clone())
    }
}

impl Merge for Component {
    /// Merge another declaration of the same component.
    ///
    /// Templates are unioned and the strongest kind is kept. The repository
    /// and playbooks of `overlay` win where it declares them.
    fn merge(&mut self, overlay: &Self) {
        self.kind = self.kind.max(overlay.kind);
        if !overlay.repository.is_empty() {
            self.repository = overlay.repository.clone();
        }
        self.templates.extend(overlay.templates.iter().cloned());
        self.playbooks.extend(
            overlay
                .playbooks
                .iter()
                .map(|(k, v)| (k.clone(), v.clone())),
        );
    }
}

/// Reference to a component by id
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ComponentRef {
    pub id: String,
}

impl ComponentRef {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }

    pub fn is_empty(&self) -> bool {
        self.id.is_empty()
    }

    /// The referenced component, if the platform knows it
    pub fn resolve<'e>(&self, env: &'e Environment) -> Option<&'e Component> {
        env.platform().component(&self.id)
    }
}

impl Merge for ComponentRef {
    fn merge(&mut self, overlay: &Self) {
        if !overlay.is_empty() {
            self.id = overlay.id.clone();
        }
    }
}

impl Validatable for ComponentRef {
    fn validate(&self, env: &Environment, location: &DescriptorLocation) -> ValidationErrors {
        let mut errors = ValidationErrors::new();
        if self.is_empty() {
            errors.add_error(location, "empty component reference");
        } else if self.resolve(env).is_none() {
            errors.add_error(location, format!("reference to unknown component: {}", self.id));
        }
        errors
    }
}

impl Traversable for ComponentRef {
    fn as_validatable(&self) -> Option<&dyn Validatable> {
        Some(self)
    }
}
