//! Infrastructure providers and node set references to them

use serde::Serialize;

use crate::collection::{Merge, Named};
use crate::component::ComponentRef;
use crate::environment::Environment;
use crate::location::DescriptorLocation;
use crate::params::Parameters;
use crate::proxy::Proxy;
use crate::record::{ProviderRecord, ProviderRefRecord};
use crate::validation::{Children, Traversable, Validatable, ValidationErrors};
use crate::vars::EnvVars;

/// Providers keyed by name
pub type Providers = Named<Provider>;

/// Source of machines for node sets
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Provider {
    pub name: String,
    pub component: ComponentRef,
    pub parameters: Parameters,
    pub env_vars: EnvVars,
    #[serde(skip_serializing_if = "Proxy::is_empty")]
    pub proxy: Proxy,
    /// Descriptor that first declared it
    #[serde(skip_serializing_if = "String::is_empty")]
    pub origin: String,
}

impl Provider {
    pub fn from_record(name: &str, record: &ProviderRecord) -> Self {
        Self {
            name: name.to_string(),
            component: ComponentRef::new(record.component.clone()),
            parameters: record.params.clone(),
            env_vars: record.env.clone(),
            proxy: record.proxy.clone(),
            origin: String::new(),
        }
    }
}

impl Merge for Provider {
    fn merge(&mut self, overlay: &Self) {
        if self.origin.is_empty() {
            self.origin = overlay.origin.clone();
        }
        self.component.merge(&overlay.component);
        self.parameters = self.parameters.override_with(&overlay.parameters);
        self.env_vars = self.env_vars.override_with(&overlay.env_vars);
        self.proxy = self.proxy.override_with(&overlay.proxy);
    }
}

impl Traversable for Provider {
    fn children(&self) -> Children<'_> {
        Children::Keyed(vec![("component", &self.component as &dyn Traversable)])
    }

    fn origin(&self) -> Option<&str> {
        (!self.origin.is_empty()).then_some(self.origin.as_str())
    }
}

impl Validatable for Providers {
    fn validate(&self, _env: &Environment, location: &DescriptorLocation) -> ValidationErrors {
        let mut errors = ValidationErrors::new();
        if self.is_empty() {
            errors.add_error(location, "no provider specified");
        }
        errors
    }
}

/// A node set's pointer to its provider, with values overriding the
/// provider's own
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ProviderRef {
    pub name: String,
    pub parameters: Parameters,
    pub env_vars: EnvVars,
    #[serde(skip_serializing_if = "Proxy::is_empty")]
    pub proxy: Proxy,
}

impl ProviderRef {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn from_record(record: &ProviderRefRecord) -> Self {
        Self {
            name: record.name.clone(),
            parameters: record.params.clone(),
            env_vars: record.env.clone(),
            proxy: record.proxy.clone(),
        }
    }

    /// The effective provider for the referencing node set.
    ///
    /// The provider's parameters, variables and proxy are overridden by the
    /// ones carried by this reference. `None` if the provider is unknown.
    pub fn resolve(&self, env: &Environment) -> Option<Provider> {
        let provider = env.providers().get(&self.name)?;
        Some(Provider {
            name: provider.name.clone(),
            component: provider.component.clone(),
            parameters: provider.parameters.override_with(&self.parameters),
            env_vars: provider.env_vars.override_with(&self.env_vars),
            proxy: provider.proxy.override_with(&self.proxy),
            origin: provider.origin.clone(),
        })
    }
}

impl Merge for ProviderRef {
    fn merge(&mut self, overlay: &Self) {
        if !overlay.name.is_empty() {
            self.name = overlay.name.clone();
        }
        self.parameters = self.parameters.override_with(&overlay.parameters);
        self.env_vars = self.env_vars.override_with(&overlay.env_vars);
        self.proxy = self.proxy.override_with(&overlay.proxy);
    }
}

impl Validatable for ProviderRef {
    fn validate(&self, env: &Environment, location: &DescriptorLocation) -> ValidationErrors {
        let mut errors = ValidationErrors::new();
        if self.name.is_empty() {
            errors.add_error(location, "no provider referenced");
        } else if !env.providers().contains(&self.name) {
            errors.add_error(location, format!("reference to unknown provider: {}", self.name));
        }
        errors
    }
}

impl Traversable for ProviderRef {
    fn as_validatable(&self) -> Option<&dyn Validatable> {
        Some(self)
    }
}
