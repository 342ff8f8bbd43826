//! Free-form parameter trees and their deep merge
//!
//! Every entity carries provider/stack/task specific settings as
//! [`Parameters`]: a mapping from string keys to arbitrarily nested
//! [`Value`]s. Layers are combined with [`Parameters::override_with`], a pure
//! function that never mutates its inputs.
//!
//! # Merge rules
//!
//! For every key present in the overlay:
//!
//! 1. mapping over mapping merges recursively;
//! 2. sequence over a compatible sequence concatenates, base first;
//! 3. mismatched shapes (or incompatible sequences) take the overlay;
//! 4. a null overlay keeps the base value, any other scalar replaces it.
//!
//! # Example
//!
//! ```
//! use env_model::Parameters;
//! use serde_json::json;
//!
//! let base = Parameters::from(json!({"region": "eu-west-1", "tags": ["a"]}));
//! let overlay = Parameters::from(json!({"tags": ["b"], "size": "large"}));
//!
//! let merged = base.override_with(&overlay);
//! assert_eq!(merged, Parameters::from(json!({
//!     "region": "eu-west-1",
//!     "tags": ["a", "b"],
//!     "size": "large",
//! })));
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A nested parameter value
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    /// Explicitly unset
    #[default]
    Null,
    Bool(bool),
    Integer(i64),
    Float(f64),
    String(String),
    Sequence(Vec<Value>),
    Mapping(BTreeMap<String, Value>),
}

/// Shape of a [`Value`], used to decide sequence compatibility
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    Null,
    Bool,
    /// Integers and floats share one kind
    Number,
    String,
    Sequence,
    Mapping,
}

/// Element type of a sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SequenceKind {
    Empty,
    Uniform(ValueKind),
    Mixed,
}

impl SequenceKind {
    /// Whether two sequences can be concatenated.
    ///
    /// Empty and mixed sequences accept anything; uniform ones only accept
    /// the same element kind.
    pub fn is_compatible_with(self, other: SequenceKind) -> bool {
        match (self, other) {
            (Self::Uniform(a), Self::Uniform(b)) => a == b,
            _ => true,
        }
    }
}

impl Value {
    /// Shape of this value
    pub fn kind(&self) -> ValueKind {
        match self {
            Self::Null => ValueKind::Null,
            Self::Bool(_) => ValueKind::Bool,
            Self::Integer(_) | Self::Float(_) => ValueKind::Number,
            Self::String(_) => ValueKind::String,
            Self::Sequence(_) => ValueKind::Sequence,
            Self::Mapping(_) => ValueKind::Mapping,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_mapping(&self) -> Option<&BTreeMap<String, Value>> {
        match self {
            Self::Mapping(m) => Some(m),
            _ => None,
        }
    }

    pub fn as_sequence(&self) -> Option<&[Value]> {
        match self {
            Self::Sequence(s) => Some(s),
            _ => None,
        }
    }

    /// Overlay `overlay` onto this value, returning a new value.
    pub fn override_with(&self, overlay: &Value) -> Value {
        match (self, overlay) {
            (_, Self::Null) => self.clone(),
            (Self::Mapping(base), Self::Mapping(over)) => Self::Mapping(merge_mappings(base, over)),
            (Self::Sequence(base), Self::Sequence(over))
                if sequence_kind(base).is_compatible_with(sequence_kind(over)) =>
            {
                Self::Sequence(base.iter().chain(over).cloned().collect())
            }
            (_, over) => over.clone(),
        }
    }
}

/// Compute the element type of a sequence
pub fn sequence_kind(items: &[Value]) -> SequenceKind {
    let mut kinds = items.iter().map(Value::kind);
    let Some(first) = kinds.next() else {
        return SequenceKind::Empty;
    };
    if kinds.all(|k| k == first) {
        SequenceKind::Uniform(first)
    } else {
        SequenceKind::Mixed
    }
}

fn merge_mappings(
    base: &BTreeMap<String, Value>,
    overlay: &BTreeMap<String, Value>,
) -> BTreeMap<String, Value> {
    let mut merged = base.clone();
    for (key, over) in overlay {
        let value = match base.get(key) {
            Some(existing) => existing.override_with(over),
            None => over.clone(),
        };
        merged.insert(key.clone(), value);
    }
    merged
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Self::Integer(i)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Self::Float(f)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Self::Sequence(items)
    }
}

impl From<serde_json::Value> for Value {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Self::Null,
            serde_json::Value::Bool(b) => Self::Bool(b),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => Self::Integer(i),
                None => Self::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            serde_json::Value::String(s) => Self::String(s),
            serde_json::Value::Array(items) => {
                Self::Sequence(items.into_iter().map(Self::from).collect())
            }
            serde_json::Value::Object(map) => {
                Self::Mapping(map.into_iter().map(|(k, v)| (k, Self::from(v))).collect())
            }
        }
    }
}

/// Settings attached to a provider, stack, task or reference
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Parameters(BTreeMap<String, Value>);

impl Parameters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Deep-merge `overlay` onto these parameters, returning a new tree.
    ///
    /// Keys only present here are kept, keys only present in `overlay` are
    /// added, shared keys follow the rules in the module documentation.
    pub fn override_with(&self, overlay: &Parameters) -> Parameters {
        Self(merge_mappings(&self.0, &overlay.0))
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Look up a nested value by dotted path, e.g. `"network.cidr"`.
    pub fn get_path(&self, path: &str) -> Option<&Value> {
        let mut segments = path.split('.');
        let mut current = self.0.get(segments.next()?)?;
        for segment in segments {
            current = current.as_mapping()?.get(segment)?;
        }
        Some(current)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.0.insert(key.into(), value.into())
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }

    pub fn into_inner(self) -> BTreeMap<String, Value> {
        self.0
    }
}

impl From<BTreeMap<String, Value>> for Parameters {
    fn from(map: BTreeMap<String, Value>) -> Self {
        Self(map)
    }
}

/// Anything but a JSON object yields empty parameters.
impl From<serde_json::Value> for Parameters {
    fn from(value: serde_json::Value) -> Self {
        match Value::from(value) {
            Value::Mapping(map) => Self(map),
            _ => Self::default(),
        }
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Parameters {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}
