//! Node sets and generic node propagation
//!
//! A node set whose name is [`GENERIC_NODE_SET_NAME`] is not a real group of
//! machines: it carries defaults for every other node set. Building the
//! collection is therefore two steps. The generic record is split out first,
//! then each named set is rebuilt as "generic set, overridden by the named
//! set".

use std::collections::BTreeMap;

use serde::Serialize;

use crate::collection::{Merge, Named};
use crate::environment::Environment;
use crate::hook::Hook;
use crate::location::DescriptorLocation;
use crate::orchestrator::OrchestratorRef;
use crate::provider::ProviderRef;
use crate::record::{NodeHooksRecord, NodeSetRecord};
use crate::validation::{Children, Traversable, Validatable, ValidationErrors};
use crate::vars::Labels;

/// Name of the node set holding defaults for all the others
pub const GENERIC_NODE_SET_NAME: &str = "*";

/// Node sets keyed by name
pub type NodeSets = Named<NodeSet>;

/// A group of identical machines
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct NodeSet {
    pub name: String,
    pub instances: u32,
    pub provider: ProviderRef,
    pub orchestrator: OrchestratorRef,
    pub labels: Labels,
    pub hooks: NodeHooks,
    /// Descriptor that first declared it
    #[serde(skip_serializing_if = "String::is_empty")]
    pub origin: String,
}

impl NodeSet {
    pub fn from_record(name: &str, record: &NodeSetRecord) -> Self {
        Self {
            name: name.to_string(),
            instances: record.instances,
            provider: ProviderRef::from_record(&record.provider),
            orchestrator: OrchestratorRef::from_record(&record.orchestrator),
            labels: record.labels.clone(),
            hooks: NodeHooks::from_record(&record.hooks),
            origin: String::new(),
        }
    }

    /// Whether this is the set of defaults rather than a real node set
    pub fn is_generic(&self) -> bool {
        self.name == GENERIC_NODE_SET_NAME
    }
}

impl Merge for NodeSet {
    fn merge(&mut self, overlay: &Self) {
        if self.origin.is_empty() {
            self.origin = overlay.origin.clone();
        }
        if overlay.instances > 0 {
            self.instances = overlay.instances;
        }
        self.provider.merge(&overlay.provider);
        self.orchestrator.merge(&overlay.orchestrator);
        self.labels = overlay.labels.inherit(&self.labels);
        self.hooks.merge(&overlay.hooks);
    }
}

impl Validatable for NodeSet {
    fn validate(&self, _env: &Environment, location: &DescriptorLocation) -> ValidationErrors {
        let mut errors = ValidationErrors::new();
        if self.instances == 0 {
            errors.add_error(
                &location.appending("instances"),
                "instances must be a positive number",
            );
        }
        errors
    }
}

impl Traversable for NodeSet {
    fn as_validatable(&self) -> Option<&dyn Validatable> {
        Some(self)
    }

    fn children(&self) -> Children<'_> {
        Children::Keyed(vec![
            ("provider", &self.provider as &dyn Traversable),
            ("hooks", &self.hooks as &dyn Traversable),
        ])
    }

    fn origin(&self) -> Option<&str> {
        (!self.origin.is_empty()).then_some(self.origin.as_str())
    }
}

impl Validatable for NodeSets {
    fn validate(&self, _env: &Environment, location: &DescriptorLocation) -> ValidationErrors {
        let mut errors = ValidationErrors::new();
        if self.is_empty() {
            errors.add_error(location, "no node specified");
        }
        errors
    }
}

impl Named<NodeSet> {
    /// Build the node sets of one descriptor layer, applying the generic
    /// set to every named one.
    pub fn build(records: &BTreeMap<String, NodeSetRecord>) -> Self {
        let (mut nodes, generic) = Self::split_generic(records);
        if let Some(generic) = generic {
            nodes.apply_generic(&generic);
        }
        nodes
    }

    /// Separate the generic record from the named ones.
    pub fn split_generic(records: &BTreeMap<String, NodeSetRecord>) -> (Self, Option<NodeSet>) {
        let mut generic = None;
        let mut nodes = Self::new();
        for (name, record) in records {
            let node_set = NodeSet::from_record(name, record);
            if node_set.is_generic() {
                generic = Some(node_set);
            } else {
                nodes.insert(name.clone(), node_set);
            }
        }
        (nodes, generic)
    }

    /// Rebuild every named set as `generic` overridden by that set.
    pub fn apply_generic(&mut self, generic: &NodeSet) {
        for (name, node_set) in self.iter_mut() {
            tracing::debug!(node_set = %name, "Applying generic node set");
            let mut merged = generic.clone();
            merged.name = name.clone();
            merged.merge(node_set);
            *node_set = merged;
        }
    }
}

/// Hooks of a node set
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct NodeHooks {
    pub create: Hook,
    pub destroy: Hook,
}

impl NodeHooks {
    pub fn from_record(record: &NodeHooksRecord) -> Self {
        Self {
            create: Hook::from_record(&record.create),
            destroy: Hook::from_record(&record.destroy),
        }
    }
}

impl Merge for NodeHooks {
    fn merge(&mut self, overlay: &Self) {
        self.create.merge(&overlay.create);
        self.destroy.merge(&overlay.destroy);
    }
}

impl Traversable for NodeHooks {
    fn children(&self) -> Children<'_> {
        Children::Keyed(vec![
            ("create", &self.create as &dyn Traversable),
            ("destroy", &self.destroy as &dyn Traversable),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::Value;
    use crate::record::ProviderRefRecord;

    fn record(instances: u32, params: serde_json::Value) -> NodeSetRecord {
        NodeSetRecord {
            instances,
            provider: ProviderRefRecord {
                name: "aws".to_string(),
                params: params.into(),
                ..ProviderRefRecord::default()
            },
            ..NodeSetRecord::default()
        }
    }

    #[test]
    fn test_generic_set_is_not_a_node_set() {
        let mut records = BTreeMap::new();
        records.insert("*".to_string(), record(1, serde_json::json!({})));
        records.insert("workers".to_string(), record(0, serde_json::json!({})));

        let nodes = NodeSets::build(&records);

        assert_eq!(nodes.names().collect::<Vec<_>>(), vec!["workers"]);
        assert_eq!(nodes.get("workers").unwrap().instances, 1);
    }

    #[test]
    fn test_named_set_wins_over_generic() {
        let mut records = BTreeMap::new();
        records.insert("*".to_string(), record(1, serde_json::json!({"param1": "A"})));
        records.insert(
            "workers".to_string(),
            record(3, serde_json::json!({"param1": "C", "param2": "B"})),
        );

        let nodes = NodeSets::build(&records);
        let workers = nodes.get("workers").unwrap();

        assert_eq!(workers.instances, 3);
        assert_eq!(workers.provider.parameters.get("param1"), Some(&Value::from("C")));
        assert_eq!(workers.provider.parameters.get("param2"), Some(&Value::from("B")));
    }

    #[test]
    fn test_build_without_generic_keeps_records() {
        let mut records = BTreeMap::new();
        records.insert("managers".to_string(), record(2, serde_json::json!({"a": 1})));

        let nodes = NodeSets::build(&records);

        assert_eq!(nodes.len(), 1);
        assert_eq!(nodes.get("managers").unwrap().name, "managers");
    }
}
