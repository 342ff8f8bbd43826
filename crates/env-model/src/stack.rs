//! Deployable stacks and their deployment order

use std::collections::{BTreeMap, BTreeSet};

use env_graph::DependencyGraph;
use serde::Serialize;

use crate::collection::{Merge, Named};
use crate::component::ComponentRef;
use crate::environment::Environment;
use crate::error::Result;
use crate::hook::Hook;
use crate::location::DescriptorLocation;
use crate::params::Parameters;
use crate::record::{CopyRecord, StackHooksRecord, StackRecord};
use crate::validation::{Children, Traversable, Validatable, ValidationErrors};
use crate::vars::{EnvVars, Labels};

/// Stacks keyed by name
pub type Stacks = Named<Stack>;

/// A unit of deployment on the orchestrator
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Stack {
    pub name: String,
    pub component: ComponentRef,
    /// Names of the stacks deployed before this one
    pub depends_on: Vec<String>,
    pub parameters: Parameters,
    pub env_vars: EnvVars,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub copies: BTreeMap<String, FileCopy>,
    pub hooks: StackHooks,
    /// Descriptor that first declared it
    #[serde(skip_serializing_if = "String::is_empty")]
    pub origin: String,
}

impl Stack {
    pub fn from_record(name: &str, record: &StackRecord) -> Self {
        Self {
            name: name.to_string(),
            component: ComponentRef::new(record.component.clone()),
            depends_on: record.depends_on.clone(),
            parameters: record.params.clone(),
            env_vars: record.env.clone(),
            copies: record
                .copies
                .iter()
                .map(|(name, copy)| (name.clone(), FileCopy::from_record(copy)))
                .collect(),
            hooks: StackHooks::from_record(&record.hooks),
            origin: String::new(),
        }
    }
}

impl Merge for Stack {
    fn merge(&mut self, overlay: &Self) {
        if self.origin.is_empty() {
            self.origin = overlay.origin.clone();
        }
        self.component.merge(&overlay.component);
        for dependency in &overlay.depends_on {
            if !self.depends_on.contains(dependency) {
                self.depends_on.push(dependency.clone());
            }
        }
        self.parameters = self.parameters.override_with(&overlay.parameters);
        self.env_vars = self.env_vars.override_with(&overlay.env_vars);
        for (name, copy) in &overlay.copies {
            self.copies
                .entry(name.clone())
                .and_modify(|existing| existing.merge(copy))
                .or_insert_with(|| copy.clone());
        }
        self.hooks.merge(&overlay.hooks);
    }
}

impl Validatable for Stack {
    fn validate(&self, env: &Environment, location: &DescriptorLocation) -> ValidationErrors {
        let mut errors = ValidationErrors::new();
        let dependencies = location.appending("dependsOn");
        for (index, dependency) in self.depends_on.iter().enumerate() {
            let at = dependencies.appending_index(index);
            if *dependency == self.name {
                errors.add_error(&at, format!("stack {} depends on itself", self.name));
            } else if !env.stacks().contains(dependency) {
                errors.add_error(&at, format!("dependency on unknown stack: {dependency}"));
            }
        }
        errors
    }
}

impl Traversable for Stack {
    fn as_validatable(&self) -> Option<&dyn Validatable> {
        Some(self)
    }

    fn children(&self) -> Children<'_> {
        Children::Keyed(vec![
            ("component", &self.component as &dyn Traversable),
            ("copies", &self.copies as &dyn Traversable),
            ("hooks", &self.hooks as &dyn Traversable),
        ])
    }

    fn origin(&self) -> Option<&str> {
        (!self.origin.is_empty()).then_some(self.origin.as_str())
    }
}

impl Validatable for Stacks {
    fn validate(&self, _env: &Environment, location: &DescriptorLocation) -> ValidationErrors {
        let mut errors = ValidationErrors::new();
        if self.is_empty() {
            errors.add_warning(location, "no stack specified");
        }
        errors
    }
}

impl Named<Stack> {
    /// Stack names ordered so that every stack comes after its dependencies.
    ///
    /// Dependencies on unknown stacks are ignored here; validation reports
    /// them.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Graph`] when the dependencies form a cycle.
    pub fn deployment_order(&self) -> Result<Vec<String>> {
        let mut graph = DependencyGraph::new();
        for name in self.names() {
            graph.add_node(name);
        }
        for stack in self.values() {
            for dependency in &stack.depends_on {
                if !graph.add_edge(dependency, &stack.name) {
                    tracing::debug!(
                        stack = %stack.name,
                        dependency = %dependency,
                        "Skipping dependency on unknown stack"
                    );
                }
            }
        }
        Ok(graph.sort()?)
    }
}

/// Files copied onto the nodes matching a set of labels
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FileCopy {
    /// Labels selecting the target nodes
    pub labels: Labels,
    /// Destination on the target nodes
    pub path: String,
    /// Copy only when the destination does not exist yet
    pub once: bool,
    pub sources: BTreeSet<String>,
}

impl FileCopy {
    pub fn from_record(record: &CopyRecord) -> Self {
        Self {
            labels: record.labels.clone(),
            path: record.path.clone(),
            once: record.once,
            sources: record.sources.iter().cloned().collect(),
        }
    }
}

impl Merge for FileCopy {
    fn merge(&mut self, overlay: &Self) {
        self.labels = overlay.labels.inherit(&self.labels);
        if !overlay.path.is_empty() {
            self.path = overlay.path.clone();
        }
        self.once |= overlay.once;
        self.sources.extend(overlay.sources.iter().cloned());
    }
}

impl Validatable for FileCopy {
    fn validate(&self, _env: &Environment, location: &DescriptorLocation) -> ValidationErrors {
        let mut errors = ValidationErrors::new();
        if self.path.trim().is_empty() {
            errors.add_error(&location.appending("path"), "empty copy destination");
        }
        errors
    }
}

impl Traversable for FileCopy {
    fn as_validatable(&self) -> Option<&dyn Validatable> {
        Some(self)
    }
}

/// Hooks of a stack
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct StackHooks {
    pub deploy: Hook,
    pub undeploy: Hook,
}

impl StackHooks {
    pub fn from_record(record: &StackHooksRecord) -> Self {
        Self {
            deploy: Hook::from_record(&record.deploy),
            undeploy: Hook::from_record(&record.undeploy),
        }
    }
}

impl Merge for StackHooks {
    fn merge(&mut self, overlay: &Self) {
        self.deploy.merge(&overlay.deploy);
        self.undeploy.merge(&overlay.undeploy);
    }
}

impl Traversable for StackHooks {
    fn children(&self) -> Children<'_> {
        Children::Keyed(vec![
            ("deploy", &self.deploy as &dyn Traversable),
            ("undeploy", &self.undeploy as &dyn Traversable),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    fn stack(name: &str, depends_on: &[&str]) -> (String, Stack) {
        let stack = Stack {
            name: name.to_string(),
            depends_on: depends_on.iter().map(|d| d.to_string()).collect(),
            ..Stack::default()
        };
        (name.to_string(), stack)
    }

    #[test]
    fn test_deployment_order_puts_dependencies_first() {
        let stacks: Stacks = [
            stack("app", &["db", "cache"]),
            stack("cache", &[]),
            stack("db", &["network"]),
            stack("network", &[]),
        ]
        .into_iter()
        .collect();

        let order = stacks.deployment_order().unwrap();

        let position = |name: &str| order.iter().position(|n| n == name).unwrap();
        assert_eq!(order.len(), 4);
        assert!(position("network") < position("db"));
        assert!(position("db") < position("app"));
        assert!(position("cache") < position("app"));
    }

    #[test]
    fn test_deployment_order_skips_unknown_dependencies() {
        let stacks: Stacks = [stack("app", &["missing"])].into_iter().collect();
        assert_eq!(stacks.deployment_order().unwrap(), vec!["app"]);
    }

    #[test]
    fn test_deployment_order_reports_cycle() {
        let stacks: Stacks = [stack("a", &["b"]), stack("b", &["a"])].into_iter().collect();
        let err = stacks.deployment_order().unwrap_err();
        assert!(matches!(err, Error::Graph(_)));
    }

    #[test]
    fn test_merge_appends_new_dependencies_only() {
        let (_, mut base) = stack("app", &["db"]);
        let (_, overlay) = stack("app", &["db", "cache"]);
        base.merge(&overlay);
        assert_eq!(base.depends_on, vec!["db", "cache"]);
    }

    #[test]
    fn test_copy_merge_keeps_own_labels() {
        let mut base = FileCopy {
            labels: [("role", "web"), ("zone", "a")].into_iter().collect(),
            path: "/etc/app".to_string(),
            ..FileCopy::default()
        };
        let overlay = FileCopy {
            labels: [("role", "db")].into_iter().collect(),
            sources: ["conf/app.ini".to_string()].into_iter().collect(),
            ..FileCopy::default()
        };

        base.merge(&overlay);

        assert_eq!(base.labels.get("role"), Some("db"));
        assert_eq!(base.labels.get("zone"), Some("a"));
        assert_eq!(base.path, "/etc/app");
        assert_eq!(base.sources.len(), 1);
    }
}
