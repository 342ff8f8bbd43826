//! The resolved environment
//!
//! An [`Environment`] is built from one descriptor layer, then merged with
//! the layers it inherits from, least specific first. The merged model is
//! validated as a whole by [`Environment::validate`].

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use crate::collection::Merge;
use crate::component::Component;
use crate::error::Result;
use crate::hook::EnvironmentHooks;
use crate::location::DescriptorLocation;
use crate::nodeset::NodeSets;
use crate::orchestrator::Orchestrator;
use crate::platform::Platform;
use crate::provider::{Provider, Providers};
use crate::record::EnvironmentRecord;
use crate::repository::RepositoryResolver;
use crate::stack::{Stack, Stacks};
use crate::task::{Task, Tasks};
use crate::validation::{self, Traversable, Validatable, ValidationErrors};

static QUALIFIED_NAME_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_]+$").expect("Invalid qualified name regex"));

/// Environment name joined with its qualifier
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QualifiedName(String);

impl QualifiedName {
    pub fn new(name: &str, qualifier: &str) -> Self {
        if qualifier.is_empty() {
            Self(name.to_string())
        } else {
            Self(format!("{name}_{qualifier}"))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Validatable for QualifiedName {
    fn validate(&self, _env: &Environment, location: &DescriptorLocation) -> ValidationErrors {
        let mut errors = ValidationErrors::new();
        if self.0.is_empty() {
            errors.add_error(location, "empty environment name");
        } else if !QUALIFIED_NAME_REGEX.is_match(&self.0) {
            errors.add_error(
                location,
                format!(
                    "environment name {} must only contain letters, digits and underscores",
                    self.0
                ),
            );
        }
        errors
    }
}

impl Traversable for QualifiedName {
    fn as_validatable(&self) -> Option<&dyn Validatable> {
        Some(self)
    }
}

/// Fully merged model of a deployable environment
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Environment {
    /// Identifier of the most specific layer merged so far
    ///
    /// Section-level issues are located here; issues inside an entity are
    /// located at the descriptor that declared the entity.
    pub descriptor: String,
    pub name: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub qualifier: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub description: String,
    platform: Platform,
    orchestrator: Orchestrator,
    providers: Providers,
    nodes: NodeSets,
    stacks: Stacks,
    tasks: Tasks,
    hooks: EnvironmentHooks,
}

impl Environment {
    /// Build the environment of a single descriptor layer.
    ///
    /// `current` is the component standing for the layer itself; components
    /// the layer declares are resolved through `resolver`.
    ///
    /// # Errors
    ///
    /// Fails fast on the first component that cannot be resolved.
    pub fn build(
        descriptor: &str,
        current: Component,
        record: &EnvironmentRecord,
        resolver: &dyn RepositoryResolver,
    ) -> Result<Self> {
        let platform = Platform::build(descriptor, current, &record.components, resolver)?;

        let mut env = Self {
            descriptor: descriptor.to_string(),
            name: record.name.clone(),
            qualifier: record.qualifier.clone(),
            description: record.description.clone(),
            platform,
            orchestrator: Orchestrator::from_record(&record.orchestrator),
            providers: record
                .providers
                .iter()
                .map(|(name, r)| (name.clone(), Provider::from_record(name, r)))
                .collect(),
            nodes: NodeSets::build(&record.nodes),
            stacks: record
                .stacks
                .iter()
                .map(|(name, r)| (name.clone(), Stack::from_record(name, r)))
                .collect(),
            tasks: record
                .tasks
                .iter()
                .map(|(name, r)| (name.clone(), Task::from_record(name, r)))
                .collect(),
            hooks: EnvironmentHooks::from_record(&record.hooks),
        };
        env.set_origin(descriptor);
        Ok(env)
    }

    /// Attribute every entity and hook task of this layer to `descriptor`.
    fn set_origin(&mut self, descriptor: &str) {
        for (_, provider) in self.providers.iter_mut() {
            provider.origin = descriptor.to_string();
        }
        for (_, node_set) in self.nodes.iter_mut() {
            node_set.origin = descriptor.to_string();
            node_set.hooks.create.set_origin(descriptor);
            node_set.hooks.destroy.set_origin(descriptor);
        }
        for (_, stack) in self.stacks.iter_mut() {
            stack.origin = descriptor.to_string();
            stack.hooks.deploy.set_origin(descriptor);
            stack.hooks.undeploy.set_origin(descriptor);
        }
        for (_, task) in self.tasks.iter_mut() {
            task.origin = descriptor.to_string();
            task.hooks.execute.set_origin(descriptor);
        }
        self.hooks.set_origin(descriptor);
    }

    pub fn platform(&self) -> &Platform {
        &self.platform
    }

    pub fn orchestrator(&self) -> &Orchestrator {
        &self.orchestrator
    }

    pub fn providers(&self) -> &Providers {
        &self.providers
    }

    pub fn nodes(&self) -> &NodeSets {
        &self.nodes
    }

    pub fn stacks(&self) -> &Stacks {
        &self.stacks
    }

    pub fn tasks(&self) -> &Tasks {
        &self.tasks
    }

    pub fn hooks(&self) -> &EnvironmentHooks {
        &self.hooks
    }

    /// Name and qualifier joined by an underscore
    pub fn qualified_name(&self) -> QualifiedName {
        QualifiedName::new(&self.name, &self.qualifier)
    }

    /// Merge a more specific layer into this environment.
    pub fn merge(&mut self, other: &Environment) {
        tracing::debug!(
            base = %self.descriptor,
            overlay = %other.descriptor,
            "Merging descriptor layer"
        );
        self.descriptor = other.descriptor.clone();
        if !other.name.is_empty() {
            self.name = other.name.clone();
        }
        if !other.qualifier.is_empty() {
            self.qualifier = other.qualifier.clone();
        }
        if !other.description.is_empty() {
            self.description = other.description.clone();
        }
        self.platform.merge(&other.platform);
        self.orchestrator.merge(&other.orchestrator);
        self.providers.merge(&other.providers);
        self.nodes.merge(&other.nodes);
        self.stacks.merge(&other.stacks);
        self.tasks.merge(&other.tasks);
        self.hooks.merge(&other.hooks);
    }

    /// Check the whole model, collecting every issue.
    ///
    /// Sections are checked in a fixed order: name, orchestrator, providers,
    /// nodes, stacks, tasks, hooks.
    pub fn validate(&self) -> ValidationErrors {
        let root = DescriptorLocation::new(self.descriptor.clone());
        let name = self.qualified_name();
        let sections: [(&str, &dyn Traversable); 7] = [
            ("name", &name as &dyn Traversable),
            ("orchestrator", &self.orchestrator as &dyn Traversable),
            ("providers", &self.providers as &dyn Traversable),
            ("nodes", &self.nodes as &dyn Traversable),
            ("stacks", &self.stacks as &dyn Traversable),
            ("tasks", &self.tasks as &dyn Traversable),
            ("hooks", &self.hooks as &dyn Traversable),
        ];

        let mut errors = ValidationErrors::new();
        for (field, value) in sections {
            errors.merge(validation::validate(self, &root.appending(field), &[value]));
        }
        errors
    }

    /// Stack names in deployment order
    ///
    /// # Errors
    ///
    /// Fails when stack dependencies form a cycle.
    pub fn stack_order(&self) -> Result<Vec<String>> {
        self.stacks.deployment_order()
    }
}
