//! Author-supplied map from include path prefixes to uselib tags.

use std::collections::{BTreeMap, BTreeSet};

/// Maps a slash-delimited path prefix such as `"boost/filesystem"` to the
/// library tags an include under that prefix implies.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UselibMap {
    prefixes: BTreeMap<String, BTreeSet<String>>,
}

impl UselibMap {
    /// Creates an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds tags for a prefix, merging with any tags already present.
    pub fn insert<I, S>(&mut self, prefix: &str, tags: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.prefixes
            .entry(prefix.to_string())
            .or_default()
            .extend(tags.into_iter().map(Into::into));
    }

    /// Returns the tags registered for exactly this prefix.
    pub fn get(&self, prefix: &str) -> Option<&BTreeSet<String>> {
        self.prefixes.get(prefix)
    }

    /// Returns the number of prefixes.
    pub fn len(&self) -> usize {
        self.prefixes.len()
    }

    /// Returns `true` if no prefix is registered.
    pub fn is_empty(&self) -> bool {
        self.prefixes.is_empty()
    }
}

impl From<&BTreeMap<String, Vec<String>>> for UselibMap {
    fn from(table: &BTreeMap<String, Vec<String>>) -> Self {
        let mut map = Self::new();
        for (prefix, tags) in table {
            map.insert(prefix, tags.iter().cloned());
        }
        map
    }
}
