//! Raw key-value sources
//!
//! A [`PropertySource`] is whatever hands the resolver its raw entries: a
//! parsed properties file, an environment snapshot, a test fixture. The
//! resolver reads it once at construction and never again.

use std::collections::{BTreeMap, HashMap};
use std::hash::BuildHasher;

use indexmap::IndexMap;

/// A read-only source of raw (unresolved) entries
pub trait PropertySource {
    /// Every key the source defines
    fn property_names(&self) -> Vec<String>;

    /// The raw value of `key`, if defined
    fn raw_property(&self, key: &str) -> Option<String>;
}

impl<S: BuildHasher> PropertySource for HashMap<String, String, S> {
    fn property_names(&self) -> Vec<String> {
        // HashMap order is arbitrary; sort so construction is deterministic
        let mut names: Vec<String> = self.keys().cloned().collect();
        names.sort();
        names
    }

    fn raw_property(&self, key: &str) -> Option<String> {
        self.get(key).cloned()
    }
}

impl PropertySource for BTreeMap<String, String> {
    fn property_names(&self) -> Vec<String> {
        self.keys().cloned().collect()
    }

    fn raw_property(&self, key: &str) -> Option<String> {
        self.get(key).cloned()
    }
}

impl<S: BuildHasher> PropertySource for IndexMap<String, String, S> {
    fn property_names(&self) -> Vec<String> {
        self.keys().cloned().collect()
    }

    fn raw_property(&self, key: &str) -> Option<String> {
        self.get(key).cloned()
    }
}

impl<K: AsRef<str>, V: AsRef<str>> PropertySource for [(K, V)] {
    fn property_names(&self) -> Vec<String> {
        let mut names: Vec<String> = Vec::with_capacity(self.len());
        for (k, _) in self {
            if !names.iter().any(|n| n == k.as_ref()) {
                names.push(k.as_ref().to_string());
            }
        }
        names
    }

    /// Later pairs override earlier ones, like repeated keys in a file
    fn raw_property(&self, key: &str) -> Option<String> {
        self.iter()
            .rev()
            .find(|(k, _)| k.as_ref() == key)
            .map(|(_, v)| v.as_ref().to_string())
    }
}
