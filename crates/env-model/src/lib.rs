//! Layered environment descriptor model
//!
//! This crate turns a chain of descriptor records into one merged,
//! validated model of a deployable environment:
//!
//! - **Deep merge**: [`Parameters`] and [`Value`] merge recursively, with
//!   sequences concatenated when their element types agree
//! - **Typed overrides**: [`EnvVars`], [`Labels`] and [`Proxy`]
//! - **Platform**: components keyed by id, with the current descriptor and
//!   its parent chain tagged by [`ComponentKind`]
//! - **Entities**: providers, node sets, stacks, tasks and hooks, merged
//!   by name through [`Named`] and [`Merge`]
//! - **Validation**: a walk over [`Traversable`] values collecting
//!   [`ValidationErrors`] without failing fast
//! - **Ordering**: stack deployment order from `env-graph`
//!
//! # Architecture
//!
//! ```text
//!          env-cli
//!             |
//!         env-model
//!             |
//!         env-graph
//! ```
//!
//! # Example
//!
//! ```
//! use env_model::{BaseUrlResolver, DescriptorLayer, EnvironmentRecord, EnvironmentResolver};
//!
//! let base: EnvironmentRecord = serde_json::from_str(
//!     r#"{"name": "demo", "stacks": {"db": {}, "app": {"dependsOn": ["db"]}}}"#,
//! ).unwrap();
//! let root: EnvironmentRecord = serde_json::from_str(r#"{"qualifier": "dev"}"#).unwrap();
//!
//! let repositories = BaseUrlResolver::new(env_model::DEFAULT_BASE_URL).unwrap();
//! let env = EnvironmentResolver::new(&repositories)
//!     .resolve(&[DescriptorLayer::new("base", base), DescriptorLayer::new("root", root)])
//!     .unwrap();
//!
//! assert_eq!(env.qualified_name().as_str(), "demo_dev");
//! assert_eq!(env.stack_order().unwrap(), vec!["db", "app"]);
//! ```

pub mod collection;
pub mod component;
pub mod environment;
pub mod error;
pub mod hook;
pub mod location;
pub mod nodeset;
pub mod orchestrator;
pub mod params;
pub mod platform;
pub mod provider;
pub mod proxy;
pub mod record;
pub mod repository;
pub mod resolver;
pub mod stack;
pub mod task;
pub mod validation;
pub mod vars;

pub use collection::{Merge, Named};
pub use component::{Component, ComponentKind, ComponentRef};
pub use environment::{Environment, QualifiedName};
pub use error::{Error, Result};
pub use hook::{EnvironmentHooks, Hook};
pub use location::DescriptorLocation;
pub use nodeset::{GENERIC_NODE_SET_NAME, NodeHooks, NodeSet, NodeSets};
pub use orchestrator::{Orchestrator, OrchestratorRef};
pub use params::{Parameters, SequenceKind, Value, ValueKind};
pub use platform::Platform;
pub use provider::{Provider, ProviderRef, Providers};
pub use proxy::Proxy;
pub use record::EnvironmentRecord;
pub use repository::{
    BaseUrlResolver, DEFAULT_BASE_URL, DEFAULT_REFERENCE, Repository, RepositoryResolver,
};
pub use resolver::{DescriptorLayer, EnvironmentResolver};
pub use stack::{FileCopy, Stack, StackHooks, Stacks};
pub use task::{Task, TaskHooks, TaskRef, Tasks};
pub use validation::{
    Children, ErrorType, Traversable, Validatable, ValidationError, ValidationErrors, validate,
};
pub use vars::{EnvVars, Labels};
