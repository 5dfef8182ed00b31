//! Table kept in key order and searched by bisection.

use super::{IndexKey, KeyIndex, Strategy};
use crate::error::{GtexError, Result};
use std::cmp::Ordering;

/// Position of an entry whose key equals `key` in a key-sorted slice.
///
/// Bisects the open interval `(lo, hi)` until it collapses. When the key
/// repeats, the returned position is any member of the equal run.
fn bisect<K: IndexKey, V>(key: &K, sorted: &[(K, V)]) -> Result<Option<usize>> {
    let mut lo: isize = -1;
    let mut hi = sorted.len() as isize;
    while hi - lo > 1 {
        let mid = (hi + lo) / 2;
        match key.try_cmp(&sorted[mid as usize].0)? {
            Ordering::Equal => return Ok(Some(mid as usize)),
            Ordering::Less => hi = mid,
            Ordering::Greater => lo = mid,
        }
    }
    Ok(None)
}

/// Start of the run of entries equal to the entry at `pos`.
fn run_start<K: PartialEq, V>(sorted: &[(K, V)], mut pos: usize) -> usize {
    while pos > 0 && sorted[pos - 1].0 == sorted[pos].0 {
        pos -= 1;
    }
    pos
}

/// Value stored with `key` in a slice of `(key, value)` pairs sorted by key.
///
/// Returns the first of several equal entries, `Ok(None)` when the key is
/// absent, and [`GtexError::IncomparableKeys`] when `key` cannot be ordered
/// against a candidate entry.
pub fn binary_search<'a, K: IndexKey, V>(key: &K, sorted: &'a [(K, V)]) -> Result<Option<&'a V>> {
    Ok(bisect(key, sorted)?.map(|pos| &sorted[run_start(sorted, pos)].1))
}

/// Entries ordered by key; equal keys keep their insertion order.
#[derive(Debug, Clone)]
pub struct SortedIndex<K, V> {
    entries: Vec<(K, V)>,
}

impl<K, V> SortedIndex<K, V> {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// The entries in key order.
    pub fn entries(&self) -> &[(K, V)] {
        &self.entries
    }
}

impl<K, V> Default for SortedIndex<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: IndexKey, V> SortedIndex<K, V> {
    /// First position whose key orders after `key`.
    fn upper_bound(&self, key: &K) -> Result<usize> {
        let (mut lo, mut hi) = (0, self.entries.len());
        while lo < hi {
            let mid = lo + (hi - lo) / 2;
            if self.entries[mid].0.try_cmp(key)? == Ordering::Greater {
                hi = mid;
            } else {
                lo = mid + 1;
            }
        }
        Ok(lo)
    }
}

impl<K: IndexKey, V> KeyIndex<K, V> for SortedIndex<K, V> {
    fn strategy(&self) -> Strategy {
        Strategy::Binary
    }

    fn insert(&mut self, key: K, value: V) -> Result<()> {
        let pos = self.upper_bound(&key)?;
        self.entries.insert(pos, (key, value));
        Ok(())
    }

    /// Sorts the new pairs once and merges them behind equal existing keys.
    /// Stable, so equal keys stay in insertion order. A failed comparison
    /// returns the error and leaves the index as it was.
    fn extend(&mut self, mut entries: Vec<(K, V)>) -> Result<()> {
        let mut failure: Option<GtexError> = None;
        entries.sort_by(|a, b| {
            a.0.try_cmp(&b.0).unwrap_or_else(|err| {
                failure.get_or_insert(err);
                Ordering::Equal
            })
        });
        if let Some(err) = failure {
            return Err(err);
        }

        // Plan the merge on borrowed keys before moving any pair.
        let mut take_existing = Vec::with_capacity(self.entries.len() + entries.len());
        let (mut i, mut j) = (0, 0);
        while i < self.entries.len() && j < entries.len() {
            if entries[j].0.try_cmp(&self.entries[i].0)? == Ordering::Less {
                take_existing.push(false);
                j += 1;
            } else {
                take_existing.push(true);
                i += 1;
            }
        }

        let mut existing = std::mem::take(&mut self.entries).into_iter();
        let mut incoming = entries.into_iter();
        let mut merged = Vec::with_capacity(existing.len() + incoming.len());
        for from_existing in take_existing {
            merged.extend(if from_existing {
                existing.next()
            } else {
                incoming.next()
            });
        }
        merged.extend(existing);
        merged.extend(incoming);
        self.entries = merged;
        Ok(())
    }

    fn lookup(&self, key: &K) -> Result<Option<&V>> {
        binary_search(key, &self.entries)
    }

    fn lookup_all(&self, key: &K) -> Result<Vec<&V>> {
        let Some(pos) = bisect(key, &self.entries)? else {
            return Ok(Vec::new());
        };
        Ok(self.entries[run_start(&self.entries, pos)..]
            .iter()
            .take_while(|(k, _)| k == key)
            .map(|(_, v)| v)
            .collect())
    }

    fn len(&self) -> usize {
        self.entries.len()
    }
}
