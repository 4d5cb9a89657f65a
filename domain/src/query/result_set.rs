//! Result set: string-keyed mapping of query output

use super::value::ResultValue;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Mapping from result key to value.
///
/// Keys are not namespaced by the task that produced them. When two sets are
/// merged, the incoming value for a key overwrites the existing one. Keys are
/// kept ordered so rendering is deterministic.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResultSet {
    entries: BTreeMap<String, ResultValue>,
}

impl ResultSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// A set holding exactly one entry
    pub fn single(key: impl Into<String>, value: impl Into<ResultValue>) -> Self {
        let mut set = Self::new();
        set.insert(key, value);
        set
    }

    /// Insert a value, returning the one it replaced
    pub fn insert(
        &mut self,
        key: impl Into<String>,
        value: impl Into<ResultValue>,
    ) -> Option<ResultValue> {
        self.entries.insert(key.into(), value.into())
    }

    /// Builder-style insert
    pub fn with(mut self, key: impl Into<String>, value: impl Into<ResultValue>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&ResultValue> {
        self.entries.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ResultValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Merge `other` into `self`, overwriting values for keys present in both.
    ///
    /// Returns the keys that were overwritten.
    pub fn merge(&mut self, other: ResultSet) -> Vec<String> {
        let mut overwritten = Vec::new();
        for (key, value) in other.entries {
            if self.entries.insert(key.clone(), value).is_some() {
                overwritten.push(key);
            }
        }
        overwritten
    }
}

impl FromIterator<(String, ResultValue)> for ResultSet {
    fn from_iter<I: IntoIterator<Item = (String, ResultValue)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for ResultSet {
    type Item = (String, ResultValue);
    type IntoIter = std::collections::btree_map::IntoIter<String, ResultValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}
