//! Unsorted table searched front to back. The control strategy.

use super::{IndexKey, KeyIndex, Strategy};
use crate::error::Result;

/// Position of the first item equal to `key`, or `None`.
pub fn linear_search<K: PartialEq>(key: &K, items: &[K]) -> Option<usize> {
    items.iter().position(|item| item == key)
}

/// Keys and values in insertion order, kept in parallel vectors.
#[derive(Debug, Clone)]
pub struct LinearIndex<K, V> {
    keys: Vec<K>,
    values: Vec<V>,
}

impl<K, V> LinearIndex<K, V> {
    pub fn new() -> Self {
        Self {
            keys: Vec::new(),
            values: Vec::new(),
        }
    }
}

impl<K, V> Default for LinearIndex<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: IndexKey, V> KeyIndex<K, V> for LinearIndex<K, V> {
    fn strategy(&self) -> Strategy {
        Strategy::Linear
    }

    fn insert(&mut self, key: K, value: V) -> Result<()> {
        self.keys.push(key);
        self.values.push(value);
        Ok(())
    }

    fn extend(&mut self, entries: Vec<(K, V)>) -> Result<()> {
        self.keys.reserve(entries.len());
        self.values.reserve(entries.len());
        for (key, value) in entries {
            self.keys.push(key);
            self.values.push(value);
        }
        Ok(())
    }

    fn lookup(&self, key: &K) -> Result<Option<&V>> {
        Ok(linear_search(key, &self.keys).map(|pos| &self.values[pos]))
    }

    fn lookup_all(&self, key: &K) -> Result<Vec<&V>> {
        Ok(self
            .keys
            .iter()
            .zip(&self.values)
            .filter(|(k, _)| *k == key)
            .map(|(_, v)| v)
            .collect())
    }

    fn len(&self) -> usize {
        self.keys.len()
    }
}
