//! Validation of the merged model
//!
//! Validation never fails fast: every entity that can check itself
//! implements [`Validatable`], and [`validate`] walks the model, asking each
//! of them for issues and collecting the results in discovery order.
//!
//! The walk is driven by [`Traversable`], which tells the engine whether a
//! value can validate itself and which children (keyed entries or indexed
//! elements) it holds. Keys and indices are appended to the location, so
//! an issue on the first `before` task of the `init` hook is reported at
//! `hooks.init.before[0]`.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::environment::Environment;
use crate::location::DescriptorLocation;

/// Severity of a validation issue
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorType {
    /// The model cannot be used
    Error,
    /// Advisory only
    Warning,
}

impl fmt::Display for ErrorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Error => write!(f, "Error"),
            Self::Warning => write!(f, "Warning"),
        }
    }
}

/// A single issue found in the model
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationError {
    #[serde(rename = "ErrorType")]
    pub error_type: ErrorType,

    #[serde(rename = "Location")]
    pub location: DescriptorLocation,

    #[serde(rename = "Message")]
    pub message: String,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {} @{}",
            self.error_type, self.message, self.location.path
        )?;
        if !self.location.descriptor.is_empty() {
            write!(f, " in {}", self.location.descriptor)?;
        }
        Ok(())
    }
}

/// Ordered list of issues; duplicates are kept
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ValidationErrors(Vec<ValidationError>);

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_error(&mut self, location: &DescriptorLocation, message: impl Into<String>) {
        self.push(ErrorType::Error, location, message);
    }

    pub fn add_warning(&mut self, location: &DescriptorLocation, message: impl Into<String>) {
        self.push(ErrorType::Warning, location, message);
    }

    fn push(
        &mut self,
        error_type: ErrorType,
        location: &DescriptorLocation,
        message: impl Into<String>,
    ) {
        self.0.push(ValidationError {
            error_type,
            location: location.clone(),
            message: message.into(),
        });
    }

    /// Append every issue of `other`, preserving order.
    pub fn merge(&mut self, other: ValidationErrors) {
        self.0.extend(other.0);
    }

    pub fn has_errors(&self) -> bool {
        self.0.iter().any(|e| e.error_type == ErrorType::Error)
    }

    pub fn has_warnings(&self) -> bool {
        self.0.iter().any(|e| e.error_type == ErrorType::Warning)
    }

    pub fn errors(&self) -> impl Iterator<Item = &ValidationError> {
        self.0.iter().filter(|e| e.error_type == ErrorType::Error)
    }

    pub fn warnings(&self) -> impl Iterator<Item = &ValidationError> {
        self.0.iter().filter(|e| e.error_type == ErrorType::Warning)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ValidationError> {
        self.0.iter()
    }

    pub fn into_vec(self) -> Vec<ValidationError> {
        self.0
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, error) in self.0.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{error}")?;
        }
        Ok(())
    }
}

impl IntoIterator for ValidationErrors {
    type Item = ValidationError;
    type IntoIter = std::vec::IntoIter<ValidationError>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a ValidationErrors {
    type Item = &'a ValidationError;
    type IntoIter = std::slice::Iter<'a, ValidationError>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Capability of checking oneself against the resolved environment
pub trait Validatable {
    /// Report the issues of this value, located at `location`.
    fn validate(&self, env: &Environment, location: &DescriptorLocation) -> ValidationErrors;
}

/// Children of a value, as seen by the validation walk
pub enum Children<'a> {
    None,
    Keyed(Vec<(&'a str, &'a dyn Traversable)>),
    Indexed(Vec<&'a dyn Traversable>),
}

/// Shape of a value for the validation walk
pub trait Traversable {
    /// The value itself, if it can validate itself
    fn as_validatable(&self) -> Option<&dyn Validatable> {
        None
    }

    /// Nested values to visit after this one
    fn children(&self) -> Children<'_> {
        Children::None
    }

    /// Descriptor this value was declared in, when it keeps track of it
    fn origin(&self) -> Option<&str> {
        None
    }
}

impl<T: Traversable> Traversable for BTreeMap<String, T> {
    fn children(&self) -> Children<'_> {
        Children::Keyed(
            self.iter()
                .map(|(k, v)| (k.as_str(), v as &dyn Traversable))
                .collect(),
        )
    }
}

impl<T: Traversable> Traversable for Vec<T> {
    fn children(&self) -> Children<'_> {
        Children::Indexed(self.iter().map(|v| v as &dyn Traversable).collect())
    }
}

impl<T: Traversable> Traversable for Option<T> {
    fn as_validatable(&self) -> Option<&dyn Validatable> {
        self.as_ref().and_then(Traversable::as_validatable)
    }

    fn children(&self) -> Children<'_> {
        match self {
            Some(inner) => inner.children(),
            None => Children::None,
        }
    }

    fn origin(&self) -> Option<&str> {
        self.as_ref().and_then(Traversable::origin)
    }
}

/// Validate every value at `location`.
///
/// For each value: run its own validation if it has one, then recurse into
/// its keyed children (location extended by the key) and indexed children
/// (location extended by the index). A value that knows its origin moves the
/// location to that descriptor, for itself and everything below it.
pub fn validate(
    env: &Environment,
    location: &DescriptorLocation,
    values: &[&dyn Traversable],
) -> ValidationErrors {
    let mut errors = ValidationErrors::new();
    for value in values {
        walk(env, location, *value, &mut errors);
    }
    errors
}

fn walk(
    env: &Environment,
    location: &DescriptorLocation,
    value: &dyn Traversable,
    errors: &mut ValidationErrors,
) {
    let rebased;
    let location = match value.origin() {
        Some(origin) if origin != location.descriptor => {
            rebased = location.with_descriptor(origin);
            &rebased
        }
        _ => location,
    };

    if let Some(validatable) = value.as_validatable() {
        errors.merge(validatable.validate(env, location));
    }
    match value.children() {
        Children::None => {}
        Children::Keyed(entries) => {
            for (key, child) in entries {
                walk(env, &location.appending(key), child, errors);
            }
        }
        Children::Indexed(items) => {
            for (index, child) in items.into_iter().enumerate() {
                walk(env, &location.appending_index(index), child, errors);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Always reports one error carrying its own label
    struct Faulty(&'static str);

    impl Validatable for Faulty {
        fn validate(&self, _env: &Environment, location: &DescriptorLocation) -> ValidationErrors {
            let mut errors = ValidationErrors::new();
            errors.add_error(location, self.0);
            errors
        }
    }

    impl Traversable for Faulty {
        fn as_validatable(&self) -> Option<&dyn Validatable> {
            Some(self)
        }
    }

    /// Not validatable; only used to prove it is skipped
    struct Inert;

    impl Traversable for Inert {}

    #[test]
    fn test_keyed_children_extend_location() {
        let env = Environment::default();
        let mut map = BTreeMap::new();
        map.insert("aws".to_string(), Faulty("bad"));

        let errors = validate(&env, &DescriptorLocation::new("d").appending("providers"), &[&map]);

        assert_eq!(errors.len(), 1);
        assert_eq!(errors.iter().next().unwrap().location.path, "providers.aws");
    }

    #[test]
    fn test_indexed_children_extend_location() {
        let env = Environment::default();
        let items = vec![Faulty("a"), Faulty("b")];

        let errors = validate(&env, &DescriptorLocation::new("d").appending("before"), &[&items]);
        let paths: Vec<_> = errors.iter().map(|e| e.location.path.as_str()).collect();

        assert_eq!(paths, vec!["before[0]", "before[1]"]);
    }

    #[test]
    fn test_non_validatable_values_are_skipped() {
        let env = Environment::default();
        let items = vec![Inert, Inert];
        let errors = validate(&env, &DescriptorLocation::new("d"), &[&items, &Inert]);
        assert!(errors.is_empty());
    }

    #[test]
    fn test_issues_are_not_deduplicated() {
        let env = Environment::default();
        let loc = DescriptorLocation::new("d");
        let errors = validate(&env, &loc, &[&Faulty("same"), &Faulty("same")]);
        assert_eq!(errors.len(), 2);
    }

    #[test]
    fn test_display_and_json() {
        let mut errors = ValidationErrors::new();
        let loc = DescriptorLocation::new("root.yaml").appending("stacks");
        errors.add_warning(&loc, "no stack specified");

        assert_eq!(
            errors.to_string(),
            "Warning: no stack specified @stacks in root.yaml"
        );
        let json = serde_json::to_value(&errors).unwrap();
        assert_eq!(
            json,
            serde_json::json!([{
                "ErrorType": "Warning",
                "Location": {"Descriptor": "root.yaml", "Path": "stacks"},
                "Message": "no stack specified"
            }])
        );
        assert!(errors.has_warnings());
        assert!(!errors.has_errors());
    }
}
