//! Ordered list with stable per-entry keys
//!
//! Positions shift when an entry is removed; keys do not. A key is handed out
//! once per process and never reused, so a removed entry's key can't reappear.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Atomic counter for entry keys
static ENTRY_KEY_COUNTER: AtomicU64 = AtomicU64::new(1);

/// Identity of a list entry, independent of its position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntryKey(u64);

impl EntryKey {
    /// Generate next key (thread-safe, lock-free)
    pub fn next() -> Self {
        EntryKey(ENTRY_KEY_COUNTER.fetch_add(1, Ordering::Relaxed))
    }

    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for EntryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone)]
struct Entry<T> {
    key: EntryKey,
    value: T,
}

/// Ordered collection of values, each tagged with a unique [`EntryKey`]
///
/// Serializes as a plain JSON array of values; keys are assigned afresh on
/// deserialization.
#[derive(Debug, Clone)]
pub struct KeyedList<T> {
    entries: Vec<Entry<T>>,
}

impl<T> KeyedList<T> {
    pub fn new() -> Self {
        KeyedList {
            entries: Vec::new(),
        }
    }

    /// Insert at the end, returning the new entry's key
    pub fn append(&mut self, value: T) -> EntryKey {
        let key = EntryKey::next();
        self.entries.push(Entry { key, value });
        key
    }

    /// Remove by current position; later entries move down by one
    pub fn remove(&mut self, index: usize) -> Option<T> {
        if index >= self.entries.len() {
            return None;
        }
        Some(self.entries.remove(index).value)
    }

    pub fn get(&self, index: usize) -> Option<&T> {
        self.entries.get(index).map(|e| &e.value)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        self.entries.get_mut(index).map(|e| &mut e.value)
    }

    pub fn key_at(&self, index: usize) -> Option<EntryKey> {
        self.entries.get(index).map(|e| e.key)
    }

    /// Current position of a key, if it is still present
    pub fn position(&self, key: EntryKey) -> Option<usize> {
        self.entries.iter().position(|e| e.key == key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.entries.iter().map(|e| &e.value)
    }

    pub fn keys(&self) -> impl Iterator<Item = EntryKey> + '_ {
        self.entries.iter().map(|e| e.key)
    }
}

impl<T> Default for KeyedList<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> FromIterator<T> for KeyedList<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut list = KeyedList::new();
        for value in iter {
            list.append(value);
        }
        list
    }
}

impl<T> From<Vec<T>> for KeyedList<T> {
    fn from(values: Vec<T>) -> Self {
        values.into_iter().collect()
    }
}

/// Equality compares values in order; keys are identity, not content
impl<T: PartialEq> PartialEq for KeyedList<T> {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().zip(other.iter()).all(|(a, b)| a == b)
    }
}

impl<T: Serialize> Serialize for KeyedList<T> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_seq(self.iter())
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for KeyedList<T> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let values = Vec::<T>::deserialize(deserializer)?;
        Ok(KeyedList::from(values))
    }
}
