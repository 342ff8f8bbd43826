//! Flat string maps: environment variables and labels
//!
//! Both types are plain `key -> value` maps without nesting. Their override
//! helpers are pure and return a new map.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Environment variables exported to a provider, stack or task
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EnvVars(BTreeMap<String, String>);

impl EnvVars {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy these variables, then add or overwrite every key of `overlay`.
    pub fn override_with(&self, overlay: &EnvVars) -> EnvVars {
        let mut merged = self.0.clone();
        merged.extend(overlay.0.iter().map(|(k, v)| (k.clone(), v.clone())));
        Self(merged)
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.0.insert(key.into(), value.into())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &String)> {
        self.0.iter()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for EnvVars {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

/// Labels attached to node sets and volume copies
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Labels(BTreeMap<String, String>);

impl Labels {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fill in labels inherited from `parent`.
    ///
    /// Labels set here are never overwritten; keys missing here are copied
    /// from `parent`.
    pub fn inherit(&self, parent: &Labels) -> Labels {
        let mut merged = parent.0.clone();
        merged.extend(self.0.iter().map(|(k, v)| (k.clone(), v.clone())));
        Self(merged)
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
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

    pub fn iter(&self) -> impl Iterator<Item = (&String, &String)> {
        self.0.iter()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Labels {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_env_vars_overlay_wins() {
        let base: EnvVars = [("A", "1"), ("B", "2")].into_iter().collect();
        let overlay: EnvVars = [("B", "20"), ("C", "30")].into_iter().collect();

        let merged = base.override_with(&overlay);

        assert_eq!(merged.get("A"), Some("1"));
        assert_eq!(merged.get("B"), Some("20"));
        assert_eq!(merged.get("C"), Some("30"));
        assert_eq!(base.get("B"), Some("2"));
    }

    #[test]
    fn test_labels_own_values_win() {
        let own: Labels = [("role", "worker")].into_iter().collect();
        let parent: Labels = [("role", "generic"), ("zone", "a")].into_iter().collect();

        let merged = own.inherit(&parent);

        assert_eq!(merged.get("role"), Some("worker"));
        assert_eq!(merged.get("zone"), Some("a"));
        assert_eq!(own.len(), 1);
    }
}
