//! Default-valued scalar store backing both Q-tables and weight vectors

use std::collections::HashMap;
use std::hash::Hash;

/// Mapping from a key to a learned scalar, `0.0` for keys never written.
///
/// Reads never insert. Entries are only ever added or overwritten, never
/// removed, so the key set grows monotonically over an agent's lifetime.
#[derive(Debug, Clone)]
pub struct ValueStore<K> {
    values: HashMap<K, f64>,
}

impl<K: Eq + Hash> ValueStore<K> {
    pub fn new() -> Self {
        Self {
            values: HashMap::new(),
        }
    }

    /// Stored value, or `0.0` if the key was never written
    pub fn get(&self, key: &K) -> f64 {
        self.values.get(key).copied().unwrap_or(0.0)
    }

    pub fn set(&mut self, key: K, value: f64) {
        self.values.insert(key, value);
    }

    /// Add `delta` to the stored value, creating the entry at `0.0` first
    pub fn add(&mut self, key: K, delta: f64) {
        *self.values.entry(key).or_insert(0.0) += delta;
    }

    pub fn contains(&self, key: &K) -> bool {
        self.values.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&K, f64)> {
        self.values.iter().map(|(k, &v)| (k, v))
    }
}

impl<K: Eq + Hash + std::fmt::Display> ValueStore<K> {
    /// Entries rendered as `(key, value)`, sorted by rendered key
    pub fn sorted_entries(&self) -> Vec<(String, f64)> {
        let mut entries: Vec<_> = self.iter().map(|(k, v)| (k.to_string(), v)).collect();
        entries.sort_by(|a, b| a.0.cmp(&b.0));
        entries
    }
}

impl<K: Eq + Hash> Default for ValueStore<K> {
    fn default() -> Self {
        Self::new()
    }
}
