//! Key-index backends used by the join engine.
//!
//! Three interchangeable structures map a key to one or more values:
//! - [`LinearIndex`]: unsorted table, sequential scan, O(n) lookup
//! - [`SortedIndex`]: table kept in key order, bisection, O(log n) lookup
//! - [`HashedIndex`]: chained buckets with a fixed bucket count, O(1) expected lookup
//!
//! All backends keep every inserted pair. When a key repeats, [`KeyIndex::lookup`]
//! returns the value inserted first and [`KeyIndex::lookup_all`] returns every
//! value in insertion order, so the three strategies give identical answers.

mod hashed;
mod linear;
mod sorted;

pub use hashed::{HashedIndex, DEFAULT_BUCKETS};
pub use linear::{linear_search, LinearIndex};
pub use sorted::{binary_search, SortedIndex};

use crate::error::{GtexError, Result};
use std::cmp::Ordering;
use std::fmt;
use std::hash::Hash;
use std::str::FromStr;

/// A key that can be stored in every backend.
///
/// Ordering is fallible: keys of incompatible kinds must report
/// [`GtexError::IncomparableKeys`] instead of picking an arbitrary order.
pub trait IndexKey: Eq + Hash + Clone + fmt::Debug {
    fn try_cmp(&self, other: &Self) -> Result<Ordering>;
}

macro_rules! total_order_key {
    ($($t:ty),*) => {
        $(
            impl IndexKey for $t {
                #[inline]
                fn try_cmp(&self, other: &Self) -> Result<Ordering> {
                    Ok(self.cmp(other))
                }
            }
        )*
    };
}

// Strings compare byte-wise, which is locale independent.
total_order_key!(String, i32, i64, u32, u64, usize);

/// A table cell interpreted as a key of mixed type.
///
/// Text only orders against text and integers only against integers; any
/// other pairing is incomparable.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FieldKey {
    Text(String),
    Integer(i64),
    Missing,
}

impl FieldKey {
    /// Classify a raw cell: empty is missing, an integer literal is an integer.
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            Self::Missing
        } else if let Ok(n) = trimmed.parse::<i64>() {
            Self::Integer(n)
        } else {
            Self::Text(trimmed.to_string())
        }
    }
}

impl IndexKey for FieldKey {
    fn try_cmp(&self, other: &Self) -> Result<Ordering> {
        match (self, other) {
            (Self::Text(a), Self::Text(b)) => Ok(a.cmp(b)),
            (Self::Integer(a), Self::Integer(b)) => Ok(a.cmp(b)),
            (Self::Missing, Self::Missing) => Ok(Ordering::Equal),
            _ => Err(GtexError::incomparable(self, other)),
        }
    }
}

/// Common contract of the three lookup backends.
pub trait KeyIndex<K, V> {
    /// Which backend this is.
    fn strategy(&self) -> Strategy;

    /// Store `value` under `key`. Repeated keys are kept; the first one wins on lookup.
    fn insert(&mut self, key: K, value: V) -> Result<()>;

    /// Store many pairs at once. Backends with a preprocessing step do it once here.
    fn extend(&mut self, entries: Vec<(K, V)>) -> Result<()> {
        for (key, value) in entries {
            self.insert(key, value)?;
        }
        Ok(())
    }

    /// Value inserted first under `key`, or `None` when the key is absent.
    fn lookup(&self, key: &K) -> Result<Option<&V>>;

    /// Every value stored under `key`, in insertion order.
    fn lookup_all(&self, key: &K) -> Result<Vec<&V>>;

    /// Number of stored pairs, duplicates included.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Lookup strategy selected when a pipeline is constructed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Strategy {
    /// Unsorted table with sequential scan
    Linear,
    /// Sorted table with binary search
    Binary,
    /// Chained hash table
    #[default]
    Hashed,
}

impl Strategy {
    /// Every strategy, in benchmark order.
    pub const ALL: [Strategy; 3] = [Strategy::Linear, Strategy::Binary, Strategy::Hashed];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Linear => "linear",
            Self::Binary => "binary",
            Self::Hashed => "hash",
        }
    }

    /// Human-readable name used in reports.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Linear => "Linear search",
            Self::Binary => "Binary search",
            Self::Hashed => "Hash table",
        }
    }

    /// Build an empty index of this kind.
    pub fn build_index<K, V>(self) -> Box<dyn KeyIndex<K, V>>
    where
        K: IndexKey + 'static,
        V: 'static,
    {
        match self {
            Self::Linear => Box::new(LinearIndex::new()),
            Self::Binary => Box::new(SortedIndex::new()),
            Self::Hashed => Box::new(HashedIndex::new()),
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Strategy {
    type Err = GtexError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "linear" => Ok(Self::Linear),
            "binary" => Ok(Self::Binary),
            "hash" | "hashed" => Ok(Self::Hashed),
            other => Err(GtexError::config(format!(
                "Invalid strategy: {other}. Use 'linear', 'binary', or 'hash'"
            ))),
        }
    }
}
