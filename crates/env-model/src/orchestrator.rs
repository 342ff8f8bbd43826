//! Container orchestrator of the environment

use serde::Serialize;

use crate::collection::Merge;
use crate::component::ComponentRef;
use crate::params::Parameters;
use crate::record::{OrchestratorRecord, OrchestratorRefRecord};
use crate::validation::{Children, Traversable};
use crate::vars::EnvVars;

/// The orchestrator installed on every node set
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Orchestrator {
    pub component: ComponentRef,
    pub parameters: Parameters,
    pub env_vars: EnvVars,
}

impl Orchestrator {
    pub fn from_record(record: &OrchestratorRecord) -> Self {
        Self {
            component: ComponentRef::new(record.component.clone()),
            parameters: record.params.clone(),
            env_vars: record.env.clone(),
        }
    }
}

impl Merge for Orchestrator {
    fn merge(&mut self, overlay: &Self) {
        self.component.merge(&overlay.component);
        self.parameters = self.parameters.override_with(&overlay.parameters);
        self.env_vars = self.env_vars.override_with(&overlay.env_vars);
    }
}

impl Traversable for Orchestrator {
    fn children(&self) -> Children<'_> {
        Children::Keyed(vec![("component", &self.component as &dyn Traversable)])
    }
}

/// Per node set overrides of the orchestrator settings
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct OrchestratorRef {
    pub parameters: Parameters,
    pub env_vars: EnvVars,
}

impl OrchestratorRef {
    pub fn from_record(record: &OrchestratorRefRecord) -> Self {
        Self {
            parameters: record.params.clone(),
            env_vars: record.env.clone(),
        }
    }

    /// The orchestrator as seen by the referencing node set
    pub fn resolve(&self, orchestrator: &Orchestrator) -> Orchestrator {
        Orchestrator {
            component: orchestrator.component.clone(),
            parameters: orchestrator.parameters.override_with(&self.parameters),
            env_vars: orchestrator.env_vars.override_with(&self.env_vars),
        }
    }
}

impl Merge for OrchestratorRef {
    fn merge(&mut self, overlay: &Self) {
        self.parameters = self.parameters.override_with(&overlay.parameters);
        self.env_vars = self.env_vars.override_with(&overlay.env_vars);
    }
}
