use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

use crate::tag::AttributeKey;

/// Whether a value counts as "not set". Empty strings and `"no"` are the
/// defaults the rule engine assumes when an attribute is omitted.
pub fn is_default_value(value: Option<&str>) -> bool {
    matches!(value, None | Some("") | Some("no"))
}

/// Attribute map of a condition, kept in insertion order.
///
/// Entries holding a default value (see [`is_default_value`]) are never
/// stored. Overwriting a key keeps its original position.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttributeBag {
    entries: Vec<(AttributeKey, String)>,
}

impl AttributeBag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: AttributeKey) -> Option<&str> {
        self.entries
            .iter()
            .find(|(existing, _)| *existing == key)
            .map(|(_, value)| value.as_str())
    }

    pub fn contains(&self, key: AttributeKey) -> bool {
        self.get(key).is_some()
    }

    /// Sets `key` to `value`, or removes it when the value is a default.
    pub fn set(&mut self, key: AttributeKey, value: Option<&str>) {
        let value = match value {
            Some(value) if !is_default_value(Some(value)) => value,
            _ => {
                self.remove(key);
                return;
            }
        };

        match self.entries.iter_mut().find(|(existing, _)| *existing == key) {
            Some(entry) => entry.1 = value.to_string(),
            None => self.entries.push((key, value.to_string())),
        }
    }

    pub fn remove(&mut self, key: AttributeKey) -> Option<String> {
        let index = self.entries.iter().position(|(existing, _)| *existing == key)?;
        Some(self.entries.remove(index).1)
    }

    /// Applies every entry of `other` in order, pruning defaults.
    pub fn merge(&mut self, other: &AttributeBag) {
        for (key, value) in other.iter() {
            self.set(key, Some(value));
        }
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = (AttributeKey, &str)> {
        self.entries.iter().map(|(key, value)| (*key, value.as_str()))
    }

    pub fn keys(&self) -> impl Iterator<Item = AttributeKey> + '_ {
        self.entries.iter().map(|(key, _)| *key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<'a> FromIterator<(AttributeKey, &'a str)> for AttributeBag {
    fn from_iter<I: IntoIterator<Item = (AttributeKey, &'a str)>>(iter: I) -> Self {
        let mut bag = AttributeBag::new();
        for (key, value) in iter {
            bag.set(key, Some(value));
        }
        bag
    }
}

impl Serialize for AttributeBag {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, value) in &self.entries {
            map.serialize_entry(key.as_str(), value)?;
        }
        map.end()
    }
}
