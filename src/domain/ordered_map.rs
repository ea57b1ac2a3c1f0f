//! Key-ordered map backed by a sorted vector.
//!
//! Lookups binary-search the backing vector (O(log n)); inserts and deletes
//! shift the tail (O(n)). Branch and label counts are small, so the flat
//! layout is kept in exchange for cheap positional access: row `i` of a
//! listing is simply `entries[i]`.

use std::borrow::Borrow;
use std::fmt;

use crate::domain::error::{DomainError, DomainResult};

/// Sorted `(key, value)` pairs with unique keys.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderedMap<K, V> {
    entries: Vec<(K, V)>,
}

impl<K, V> Default for OrderedMap<K, V> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<K: Ord, V> OrderedMap<K, V> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// `Ok(i)` if the key sits at `i`, `Err(i)` with its insertion point otherwise.
    fn position<Q>(&self, key: &Q) -> Result<usize, usize>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.entries.binary_search_by(|(k, _)| k.borrow().cmp(key))
    }

    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.position(key).is_ok()
    }

    pub fn get<Q>(&self, key: &Q) -> DomainResult<&V>
    where
        K: Borrow<Q>,
        Q: Ord + fmt::Debug + ?Sized,
    {
        match self.position(key) {
            Ok(index) => Ok(&self.entries[index].1),
            Err(_) => Err(not_found(key)),
        }
    }

    pub fn get_mut<Q>(&mut self, key: &Q) -> DomainResult<&mut V>
    where
        K: Borrow<Q>,
        Q: Ord + fmt::Debug + ?Sized,
    {
        match self.position(key) {
            Ok(index) => Ok(&mut self.entries[index].1),
            Err(_) => Err(not_found(key)),
        }
    }

    /// Insert or replace, returning the replaced value.
    pub fn set(&mut self, key: K, value: V) -> Option<V> {
        match self.position(&key) {
            Ok(index) => Some(std::mem::replace(&mut self.entries[index].1, value)),
            Err(index) => {
                self.entries.insert(index, (key, value));
                None
            }
        }
    }

    pub fn delete<Q>(&mut self, key: &Q) -> DomainResult<V>
    where
        K: Borrow<Q>,
        Q: Ord + fmt::Debug + ?Sized,
    {
        match self.position(key) {
            Ok(index) => Ok(self.entries.remove(index).1),
            Err(_) => Err(not_found(key)),
        }
    }

    /// Key at a 0-based position in ascending order.
    pub fn key_at(&self, index: usize) -> DomainResult<&K> {
        self.entries
            .get(index)
            .map(|(k, _)| k)
            .ok_or_else(|| row_not_found(index))
    }

    /// Value at a 0-based position in ascending key order.
    pub fn value_at(&self, index: usize) -> DomainResult<&V> {
        self.entries
            .get(index)
            .map(|(_, v)| v)
            .ok_or_else(|| row_not_found(index))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> {
        self.entries.iter().map(|(k, v)| (k, v))
    }

    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.entries.iter().map(|(k, _)| k)
    }

    pub fn values(&self) -> impl Iterator<Item = &V> {
        self.entries.iter().map(|(_, v)| v)
    }
}

impl<K: Ord, V> FromIterator<(K, V)> for OrderedMap<K, V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (key, value) in iter {
            map.set(key, value);
        }
        map
    }
}

impl<K, V> IntoIterator for OrderedMap<K, V> {
    type Item = (K, V);
    type IntoIter = std::vec::IntoIter<(K, V)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

fn not_found<Q: fmt::Debug + ?Sized>(key: &Q) -> DomainError {
    DomainError::NotFound(format!("{key:?}"))
}

fn row_not_found(index: usize) -> DomainError {
    DomainError::NotFound(format!("row {}", index + 1))
}
