//! Resolved units and their attribute map.

use std::collections::HashMap;

use crate::value::Value;

/// An ordered mapping from attribute name to value with unique keys.
///
/// Preserves insertion order for serialization while keeping name lookup
/// cheap. After resolution, no key in this map ends with `]`; bracket
/// notation has been folded into [`Value::Array`] / [`Value::List`] values
/// keyed by their base name.
#[derive(Debug, Clone, Default)]
pub struct AttributeMap {
    /// Entries in insertion order.
    entries: Vec<(String, Value)>,
    /// Map from attribute name to entry index for fast lookup.
    index: HashMap<String, usize>,
}

impl AttributeMap {
    /// Create an empty attribute map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of attributes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the map holds no attributes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether an attribute with this name exists.
    #[must_use]
    pub fn contains_key(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Look up an attribute by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.index.get(name).map(|&i| &self.entries[i].1)
    }

    /// Look up an attribute by name, mutably.
    pub fn get_mut(&mut self, name: &str) -> Option<&mut Value> {
        self.index.get(name).map(|&i| &mut self.entries[i].1)
    }

    /// Insert an attribute. Replaces an existing value in place (keeping its
    /// position) and returns it.
    pub fn insert(&mut self, name: String, value: Value) -> Option<Value> {
        if let Some(&i) = self.index.get(&name) {
            Some(std::mem::replace(&mut self.entries[i].1, value))
        } else {
            self.index.insert(name.clone(), self.entries.len());
            self.entries.push((name, value));
            None
        }
    }

    /// Remove an attribute by name, returning its value.
    pub fn remove(&mut self, name: &str) -> Option<Value> {
        let i = self.index.remove(name)?;
        let (_, value) = self.entries.remove(i);
        for slot in self.index.values_mut() {
            if *slot > i {
                *slot -= 1;
            }
        }
        Some(value)
    }

    /// Iterate over attributes in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl PartialEq for AttributeMap {
    fn eq(&self, other: &Self) -> bool {
        self.entries == other.entries
    }
}

impl FromIterator<(String, Value)> for AttributeMap {
    fn from_iter<T: IntoIterator<Item = (String, Value)>>(iter: T) -> Self {
        let mut map = Self::new();
        for (name, value) in iter {
            map.insert(name, value);
        }
        map
    }
}

/// A named, typed record: the canonical second-pass output.
#[derive(Debug, Clone, PartialEq)]
pub struct Unit {
    /// The unit class, e.g. `curve_model`. Not interpreted by this engine.
    pub class_name: String,
    /// The unit instance name, e.g. `curve.ibe_0070`.
    pub instance_name: String,
    /// Resolved attributes, insertion-ordered, unique keys.
    pub attributes: AttributeMap,
}

impl Unit {
    /// Create a unit with no attributes.
    #[must_use]
    pub fn new(class_name: impl Into<String>, instance_name: impl Into<String>) -> Self {
        Self {
            class_name: class_name.into(),
            instance_name: instance_name.into(),
            attributes: AttributeMap::new(),
        }
    }
}
