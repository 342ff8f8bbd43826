//! Raw descriptor records
//!
//! These are the already-parsed, already-templated records one descriptor
//! layer contributes. They deserialize from any serde format (YAML, JSON,
//! TOML) and are turned into typed entities by the `from_record` builders.
//! Every field is optional in the source document.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::params::Parameters;
use crate::proxy::Proxy;
use crate::vars::{EnvVars, Labels};

/// One descriptor layer
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EnvironmentRecord {
    pub name: String,
    pub qualifier: String,
    pub description: String,
    pub components: ComponentsRecord,
    pub orchestrator: OrchestratorRecord,
    pub providers: BTreeMap<String, ProviderRecord>,
    pub nodes: BTreeMap<String, NodeSetRecord>,
    pub stacks: BTreeMap<String, StackRecord>,
    pub tasks: BTreeMap<String, TaskRecord>,
    pub hooks: EnvironmentHooksRecord,
}

/// Components declared by a layer
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ComponentsRecord {
    /// The descriptor this layer inherits from
    pub parent: Option<ComponentRecord>,
    /// Referenced components keyed by id
    pub components: BTreeMap<String, ComponentRecord>,
}

/// A component declaration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ComponentRecord {
    /// Explicit id, only meaningful for a parent declaration
    pub id: Option<String>,
    pub repository: String,
    #[serde(rename = "ref")]
    pub reference: String,
    pub auth: Parameters,
    pub templates: Vec<String>,
    pub playbooks: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct OrchestratorRecord {
    pub component: String,
    pub params: Parameters,
    pub env: EnvVars,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ProviderRecord {
    pub component: String,
    pub params: Parameters,
    pub env: EnvVars,
    pub proxy: Proxy,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ProviderRefRecord {
    pub name: String,
    pub params: Parameters,
    pub env: EnvVars,
    pub proxy: Proxy,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct OrchestratorRefRecord {
    pub params: Parameters,
    pub env: EnvVars,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct NodeSetRecord {
    pub instances: u32,
    pub provider: ProviderRefRecord,
    pub orchestrator: OrchestratorRefRecord,
    pub labels: Labels,
    pub hooks: NodeHooksRecord,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct StackRecord {
    pub component: String,
    pub depends_on: Vec<String>,
    pub params: Parameters,
    pub env: EnvVars,
    pub copies: BTreeMap<String, CopyRecord>,
    pub hooks: StackHooksRecord,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CopyRecord {
    pub labels: Labels,
    pub path: String,
    pub once: bool,
    pub sources: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TaskRecord {
    pub component: String,
    pub playbook: String,
    pub cron: String,
    pub params: Parameters,
    pub env: EnvVars,
    pub hooks: TaskHooksRecord,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TaskRefRecord {
    pub task: String,
    pub prefix: String,
    pub params: Parameters,
    pub env: EnvVars,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HookRecord {
    pub before: Vec<TaskRefRecord>,
    pub after: Vec<TaskRefRecord>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnvironmentHooksRecord {
    pub init: HookRecord,
    pub create: HookRecord,
    pub install: HookRecord,
    pub deploy: HookRecord,
    pub delete: HookRecord,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NodeHooksRecord {
    pub create: HookRecord,
    pub destroy: HookRecord,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StackHooksRecord {
    pub deploy: HookRecord,
    pub undeploy: HookRecord,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TaskHooksRecord {
    pub execute: HookRecord,
}
