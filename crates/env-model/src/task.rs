//! Tasks and task references

use serde::Serialize;

use crate::collection::{Merge, Named};
use crate::component::ComponentRef;
use crate::environment::Environment;
use crate::hook::Hook;
use crate::location::DescriptorLocation;
use crate::params::Parameters;
use crate::record::{TaskHooksRecord, TaskRecord, TaskRefRecord};
use crate::validation::{Children, Traversable, Validatable, ValidationErrors};
use crate::vars::EnvVars;

/// Tasks keyed by name
pub type Tasks = Named<Task>;

/// A playbook run on demand or from a hook
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Task {
    pub name: String,
    pub component: ComponentRef,
    pub playbook: String,
    /// Schedule for periodic execution, empty when run on demand only
    #[serde(skip_serializing_if = "String::is_empty")]
    pub cron: String,
    pub parameters: Parameters,
    pub env_vars: EnvVars,
    pub hooks: TaskHooks,
    /// Descriptor that first declared it
    #[serde(skip_serializing_if = "String::is_empty")]
    pub origin: String,
}

impl Task {
    pub fn from_record(name: &str, record: &TaskRecord) -> Self {
        Self {
            name: name.to_string(),
            component: ComponentRef::new(record.component.clone()),
            playbook: record.playbook.clone(),
            cron: record.cron.clone(),
            parameters: record.params.clone(),
            env_vars: record.env.clone(),
            hooks: TaskHooks::from_record(&record.hooks),
            origin: String::new(),
        }
    }
}

impl Merge for Task {
    fn merge(&mut self, overlay: &Self) {
        if self.origin.is_empty() {
            self.origin = overlay.origin.clone();
        }
        self.component.merge(&overlay.component);
        if !overlay.playbook.is_empty() {
            self.playbook = overlay.playbook.clone();
        }
        if !overlay.cron.is_empty() {
            self.cron = overlay.cron.clone();
        }
        self.parameters = self.parameters.override_with(&overlay.parameters);
        self.env_vars = self.env_vars.override_with(&overlay.env_vars);
        self.hooks.merge(&overlay.hooks);
    }
}

impl Validatable for Task {
    fn validate(&self, _env: &Environment, location: &DescriptorLocation) -> ValidationErrors {
        let mut errors = ValidationErrors::new();
        if self.playbook.trim().is_empty() {
            errors.add_error(&location.appending("playbook"), "empty playbook path");
        }
        errors
    }
}

impl Traversable for Task {
    fn as_validatable(&self) -> Option<&dyn Validatable> {
        Some(self)
    }

    fn children(&self) -> Children<'_> {
        Children::Keyed(vec![
            ("component", &self.component as &dyn Traversable),
            ("hooks", &self.hooks as &dyn Traversable),
        ])
    }

    fn origin(&self) -> Option<&str> {
        (!self.origin.is_empty()).then_some(self.origin.as_str())
    }
}

/// An empty task collection is valid.
impl Validatable for Tasks {
    fn validate(&self, _env: &Environment, _location: &DescriptorLocation) -> ValidationErrors {
        ValidationErrors::new()
    }
}

/// Hooks of a task
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TaskHooks {
    pub execute: Hook,
}

impl TaskHooks {
    pub fn from_record(record: &TaskHooksRecord) -> Self {
        Self {
            execute: Hook::from_record(&record.execute),
        }
    }
}

impl Merge for TaskHooks {
    fn merge(&mut self, overlay: &Self) {
        self.execute.merge(&overlay.execute);
    }
}

impl Traversable for TaskHooks {
    fn children(&self) -> Children<'_> {
        Children::Keyed(vec![("execute", &self.execute as &dyn Traversable)])
    }
}

/// A reference to a task from a hook, with its own overrides
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TaskRef {
    pub task: String,
    /// Prefix given to the execution's output names
    #[serde(skip_serializing_if = "String::is_empty")]
    pub prefix: String,
    pub parameters: Parameters,
    pub env_vars: EnvVars,
    /// Descriptor whose hook lists this reference
    #[serde(skip_serializing_if = "String::is_empty")]
    pub origin: String,
}

impl TaskRef {
    pub fn new(task: impl Into<String>) -> Self {
        Self {
            task: task.into(),
            ..Self::default()
        }
    }

    pub fn from_record(record: &TaskRefRecord) -> Self {
        Self {
            task: record.task.clone(),
            prefix: record.prefix.clone(),
            parameters: record.params.clone(),
            env_vars: record.env.clone(),
            origin: String::new(),
        }
    }

    /// The referenced task with this reference's overrides applied
    pub fn resolve(&self, env: &Environment) -> Option<Task> {
        let mut task = env.tasks().get(&self.task)?.clone();
        task.parameters = task.parameters.override_with(&self.parameters);
        task.env_vars = task.env_vars.override_with(&self.env_vars);
        Some(task)
    }
}

impl Validatable for TaskRef {
    fn validate(&self, env: &Environment, location: &DescriptorLocation) -> ValidationErrors {
        let mut errors = ValidationErrors::new();
        if self.task.is_empty() {
            errors.add_error(location, "empty task reference");
        } else if !env.tasks().contains(&self.task) {
            errors.add_error(location, format!("reference to unknown task: {}", self.task));
        }
        errors
    }
}

impl Traversable for TaskRef {
    fn as_validatable(&self) -> Option<&dyn Validatable> {
        Some(self)
    }

    fn origin(&self) -> Option<&str> {
        (!self.origin.is_empty()).then_some(self.origin.as_str())
    }
}
