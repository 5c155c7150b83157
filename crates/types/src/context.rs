//! Recipe context: named scalars referenced by the rest of the recipe

use indexmap::{IndexMap, IndexSet};
use serde::{Serialize, Serializer};

use crate::Requirement;

/// Ordered context variables plus the processed optional dependency groups
///
/// Keys inserted with [`Context::insert_explicit`] are pinned: later
/// auto-detected values for the same key are ignored. Only the scalar
/// entries are serialized; optional groups are kept for downstream stages.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Context {
    entries: IndexMap<String, toml::Value>,
    explicit: IndexSet<String>,
    optional_dependencies: IndexMap<String, Vec<Requirement>>,
}

impl Context {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an auto-detected value. Returns `false` when the key was set
    /// explicitly and the value was dropped.
    pub fn insert_detected(&mut self, key: impl Into<String>, value: impl Into<toml::Value>) -> bool {
        let key = key.into();
        if self.explicit.contains(&key) {
            return false;
        }
        self.entries.insert(key, value.into());
        true
    }

    /// Insert a user-provided value, replacing any detected value in place
    pub fn insert_explicit(&mut self, key: impl Into<String>, value: impl Into<toml::Value>) {
        let key = key.into();
        self.explicit.insert(key.clone());
        self.entries.insert(key, value.into());
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&toml::Value> {
        self.entries.get(key)
    }

    /// String value for `key`, if present and a string
    #[must_use]
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.entries.get(key).and_then(toml::Value::as_str)
    }

    /// Value for `key` rendered as text, accepting any scalar
    #[must_use]
    pub fn get_text(&self, key: &str) -> Option<String> {
        match self.entries.get(key)? {
            toml::Value::String(s) => Some(s.clone()),
            toml::Value::Integer(i) => Some(i.to_string()),
            toml::Value::Float(f) => Some(f.to_string()),
            toml::Value::Boolean(b) => Some(b.to_string()),
            toml::Value::Datetime(d) => Some(d.to_string()),
            toml::Value::Array(_) | toml::Value::Table(_) => None,
        }
    }

    #[must_use]
    pub fn is_explicit(&self, key: &str) -> bool {
        self.explicit.contains(key)
    }

    /// Iterate over entries in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &toml::Value)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn set_optional_dependencies(&mut self, groups: IndexMap<String, Vec<Requirement>>) {
        self.optional_dependencies = groups;
    }

    #[must_use]
    pub fn optional_dependencies(&self) -> &IndexMap<String, Vec<Requirement>> {
        &self.optional_dependencies
    }

    /// Processed members of one optional dependency group
    #[must_use]
    pub fn optional_group(&self, name: &str) -> Option<&[Requirement]> {
        self.optional_dependencies.get(name).map(Vec::as_slice)
    }
}

impl Serialize for Context {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.entries.serialize(serializer)
    }
}
