//! Chained hash table with a fixed number of buckets.

use super::{IndexKey, KeyIndex, Strategy};
use crate::error::Result;
use ahash::RandomState;

/// Bucket count used by [`HashedIndex::new`].
pub const DEFAULT_BUCKETS: usize = 4096;

// Fixed seeds keep the bucket layout identical between runs.
const SEEDS: (u64, u64, u64, u64) = (
    0x243f_6a88_85a3_08d3,
    0x1319_8a2e_0370_7344,
    0xa409_3822_299f_31d0,
    0x082e_fa98_ec4e_6c89,
);

/// Each bucket is a chain of `(key, value)` pairs in insertion order.
#[derive(Debug, Clone)]
pub struct HashedIndex<K, V> {
    buckets: Vec<Vec<(K, V)>>,
    hasher: RandomState,
    len: usize,
}

impl<K, V> HashedIndex<K, V> {
    pub fn new() -> Self {
        Self::with_buckets(DEFAULT_BUCKETS)
    }

    /// Table with `n_buckets` chains (at least one).
    pub fn with_buckets(n_buckets: usize) -> Self {
        let n_buckets = n_buckets.max(1);
        Self {
            buckets: (0..n_buckets).map(|_| Vec::new()).collect(),
            hasher: RandomState::with_seeds(SEEDS.0, SEEDS.1, SEEDS.2, SEEDS.3),
            len: 0,
        }
    }

    pub fn n_buckets(&self) -> usize {
        self.buckets.len()
    }

    /// Length of the longest chain.
    pub fn max_chain(&self) -> usize {
        self.buckets.iter().map(Vec::len).max().unwrap_or(0)
    }
}

impl<K, V> Default for HashedIndex<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: IndexKey, V> HashedIndex<K, V> {
    #[inline]
    fn bucket_of(&self, key: &K) -> usize {
        (self.hasher.hash_one(key) % self.buckets.len() as u64) as usize
    }
}

impl<K: IndexKey, V> KeyIndex<K, V> for HashedIndex<K, V> {
    fn strategy(&self) -> Strategy {
        Strategy::Hashed
    }

    fn insert(&mut self, key: K, value: V) -> Result<()> {
        let bucket = self.bucket_of(&key);
        self.buckets[bucket].push((key, value));
        self.len += 1;
        Ok(())
    }

    fn lookup(&self, key: &K) -> Result<Option<&V>> {
        Ok(self.buckets[self.bucket_of(key)]
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v))
    }

    fn lookup_all(&self, key: &K) -> Result<Vec<&V>> {
        Ok(self.buckets[self.bucket_of(key)]
            .iter()
            .filter(|(k, _)| k == key)
            .map(|(_, v)| v)
            .collect())
    }

    fn len(&self) -> usize {
        self.len
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::FieldKey;

    #[test]
    fn single_bucket_degrades_to_one_chain() {
        let mut index = HashedIndex::with_buckets(1);
        for i in 0..50u64 {
            index.insert(i, i * 10).unwrap();
        }
        assert_eq!(index.max_chain(), 50);
        assert_eq!(index.lookup(&7).unwrap(), Some(&70));
        assert_eq!(index.lookup(&99).unwrap(), None);
    }

    #[test]
    fn zero_buckets_is_clamped() {
        let index: HashedIndex<String, u8> = HashedIndex::with_buckets(0);
        assert_eq!(index.n_buckets(), 1);
    }

    #[test]
    fn collects_many_values_per_key() {
        let mut index = HashedIndex::new();
        for (i, tissue) in ["Blood", "Brain", "Blood", "Lung", "Blood"].iter().enumerate() {
            index.insert(tissue.to_string(), format!("S{i}")).unwrap();
        }
        let blood: Vec<&String> = index.lookup_all(&"Blood".to_string()).unwrap();
        assert_eq!(blood, vec!["S0", "S2", "S4"]);
        assert_eq!(index.len(), 5);
    }

    #[test]
    fn mismatched_key_type_is_a_plain_miss() {
        let mut index = HashedIndex::new();
        for i in 0..10 {
            index.insert(FieldKey::Integer(i), i).unwrap();
        }
        assert_eq!(index.lookup(&FieldKey::Text("5".into())).unwrap(), None);
        assert_eq!(index.lookup(&FieldKey::Integer(5)).unwrap(), Some(&5));
    }
}
