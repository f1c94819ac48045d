//! An insertion-ordered string-keyed map supporting positional insertion.

use std::collections::HashMap;

/// A map from string keys to values which remembers the position of every
/// key.
///
/// Entries are stored in a vector alongside a hash index from key to
/// position, so lookups are O(1) and iteration follows position order.
/// Inserting at a position shifts later entries back by one.
///
/// An entry is never replaced. Inserting a key that is already present
/// panics, so callers check with [`OrderedMap::contains_key`] first.
#[derive(Debug, Clone)]
pub struct OrderedMap<V> {
    entries: Vec<(String, V)>,
    index: HashMap<String, usize>,
}

impl<V> Default for OrderedMap<V> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            index: HashMap::new(),
        }
    }
}

impl<V: PartialEq> PartialEq for OrderedMap<V> {
    fn eq(&self, other: &Self) -> bool {
        self.entries == other.entries
    }
}

impl<V> OrderedMap<V> {
    /// Creates an empty map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty map with room for `capacity` entries.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
            index: HashMap::with_capacity(capacity),
        }
    }

    /// The number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the map has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether the map contains `key`.
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }

    /// The position of `key`, if present.
    #[must_use]
    pub fn position(&self, key: &str) -> Option<usize> {
        self.index.get(key).copied()
    }

    /// The value stored under `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&V> {
        self.position(key).map(|i| &self.entries[i].1)
    }

    /// A mutable reference to the value stored under `key`.
    pub fn get_mut(&mut self, key: &str) -> Option<&mut V> {
        self.position(key).map(|i| &mut self.entries[i].1)
    }

    /// The entry at `position`.
    #[must_use]
    pub fn get_index(&self, position: usize) -> Option<(&str, &V)> {
        self.entries
            .get(position)
            .map(|(key, value)| (key.as_str(), value))
    }

    /// Appends an entry.
    ///
    /// # Panics
    ///
    /// Panics if `key` is already present.
    pub fn insert(&mut self, key: impl Into<String>, value: V) {
        self.insert_at(self.entries.len(), key, value);
    }

    /// Inserts an entry at `position`, shifting later entries back.
    ///
    /// # Panics
    ///
    /// Panics if `key` is already present, or if `position` is greater than
    /// the length of the map.
    pub fn insert_at(&mut self, position: usize, key: impl Into<String>, value: V) {
        let key = key.into();
        assert!(!self.contains_key(&key), "key '{key}' is already present");
        assert!(
            position <= self.entries.len(),
            "insertion position {position} out of bounds (len {})",
            self.entries.len()
        );

        self.entries.insert(position, (key.clone(), value));
        for (key, _) in &self.entries[position + 1..] {
            if let Some(i) = self.index.get_mut(key) {
                *i += 1;
            }
        }
        self.index.insert(key, position);
    }

    /// Iterates over the keys in order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(key, _)| key.as_str())
    }

    /// Iterates over the values in order.
    pub fn values(&self) -> impl Iterator<Item = &V> {
        self.entries.iter().map(|(_, value)| value)
    }

    /// Iterates over the entries in order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &V)> {
        self.entries.iter().map(|(key, value)| (key.as_str(), value))
    }

    /// The first key, if any.
    #[must_use]
    pub fn first_key(&self) -> Option<&str> {
        self.entries.first().map(|(key, _)| key.as_str())
    }

    /// The last key, if any.
    #[must_use]
    pub fn last_key(&self) -> Option<&str> {
        self.entries.last().map(|(key, _)| key.as_str())
    }
}

impl<K: Into<String>, V> FromIterator<(K, V)> for OrderedMap<V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (key, value) in iter {
            map.insert(key, value);
        }
        map
    }
}

impl<V> IntoIterator for OrderedMap<V> {
    type Item = (String, V);
    type IntoIter = std::vec::IntoIter<(String, V)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}
