//  COLLECTIONS.rs
//    by Lut99
//
//  Created:
//    05 Mar 2025, 10:31:08
//  Last edited:
//    21 Aug 2025, 12:04:57
//  Auto updated?
//    Yes
//
//  Description:
//!   Defines insertion-ordered associative containers backed by open
//!   addressing with linear probing.
//

use std::borrow::Borrow;
use std::fmt::{Debug, Formatter, Result as FResult};
use std::hash::{DefaultHasher, Hash, Hasher};


/***** HELPER FUNCTIONS *****/
/// Hashes the given key with the default hasher.
#[inline]
fn hash_of<Q: ?Sized + Hash>(key: &Q) -> u64 {
    let mut hasher: DefaultHasher = DefaultHasher::new();
    key.hash(&mut hasher);
    hasher.finish()
}





/***** LIBRARY *****/
/// An insertion-ordered map with open-addressed lookups.
///
/// Entries live in a vector in insertion order; a separate bucket array maps hashes to entry
/// indices by linear probing. The bucket array is kept at at least twice the entry count and is
/// rebuilt wholesale on growth and after any removal, so there are no tombstones. Iteration is
/// always in insertion order; the bucket layout is never exposed.
#[derive(Clone)]
pub struct LinearMap<K, V> {
    /// The entries, in insertion order.
    entries : Vec<(K, V)>,
    /// The bucket array, mapping probe slots to indices in `entries`. `usize::MAX` marks an empty
    /// slot.
    buckets : Vec<usize>,
}

impl<K, V> Default for LinearMap<K, V> {
    #[inline]
    fn default() -> Self { Self::new() }
}

impl<K, V> LinearMap<K, V> {
    /// Constructor for an empty LinearMap.
    #[inline]
    pub fn new() -> Self {
        Self {
            entries : Vec::new(),
            buckets : Vec::new(),
        }
    }

    /// Returns the number of entries in the map.
    #[inline]
    pub fn len(&self) -> usize { self.entries.len() }

    /// Returns true if the map holds no entries.
    #[inline]
    pub fn is_empty(&self) -> bool { self.entries.is_empty() }

    /// Returns an iterator over the entries, in insertion order.
    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> { self.entries.iter().map(|(k, v)| (k, v)) }

    /// Returns an iterator over the keys, in insertion order.
    #[inline]
    pub fn keys(&self) -> impl Iterator<Item = &K> { self.entries.iter().map(|(k, _)| k) }

    /// Returns an iterator over the values, in insertion order.
    #[inline]
    pub fn values(&self) -> impl Iterator<Item = &V> { self.entries.iter().map(|(_, v)| v) }
}

impl<K: Eq + Hash, V> LinearMap<K, V> {
    /// Finds the bucket slot for the given key.
    ///
    /// # Returns
    /// The slot that either holds the key's entry index, or is the empty slot where the key would
    /// be inserted. [`None`] if there are no buckets at all.
    fn slot_of<Q: ?Sized + Eq + Hash>(&self, key: &Q) -> Option<usize>
    where
        K: Borrow<Q>,
    {
        if self.buckets.is_empty() { return None; }
        let mut slot: usize = (hash_of(key) % self.buckets.len() as u64) as usize;
        loop {
            let index: usize = self.buckets[slot];
            if index == usize::MAX || self.entries[index].0.borrow() == key {
                return Some(slot);
            }
            slot = (slot + 1) % self.buckets.len();
        }
    }

    /// Rebuilds the bucket array from scratch for the current entries.
    ///
    /// # Arguments
    /// - `capacity`: The number of buckets to rebuild with. Must be larger than the entry count.
    fn rehash(&mut self, capacity: usize) {
        self.buckets.clear();
        self.buckets.resize(capacity, usize::MAX);
        for (index, (key, _)) in self.entries.iter().enumerate() {
            let mut slot: usize = (hash_of(key) % capacity as u64) as usize;
            while self.buckets[slot] != usize::MAX {
                slot = (slot + 1) % capacity;
            }
            self.buckets[slot] = index;
        }
    }

    /// Returns a reference to the value stored under the given key, if any.
    pub fn get<Q: ?Sized + Eq + Hash>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
    {
        let slot: usize = self.slot_of(key)?;
        let index: usize = self.buckets[slot];
        if index != usize::MAX { Some(&self.entries[index].1) } else { None }
    }

    /// Returns true if the map holds an entry under the given key.
    #[inline]
    pub fn contains<Q: ?Sized + Eq + Hash>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
    {
        self.get(key).is_some()
    }

    /// Adds a new entry to the map.
    ///
    /// # Arguments
    /// - `key`: The key to store the value under.
    /// - `value`: The value to store.
    ///
    /// # Returns
    /// True if the entry was added, or false if the key was already present. The existing entry is
    /// left untouched in the latter case.
    pub fn add(&mut self, key: K, value: V) -> bool {
        if self.contains(&key) { return false; }

        // Keep the bucket array at at least twice the entry count
        if self.buckets.len() < 2 * (self.entries.len() + 1) {
            let capacity: usize = (2 * (self.entries.len() + 1)).next_power_of_two();
            self.rehash(capacity);
        }

        // There is a free slot for it now
        let slot: usize = self.slot_of(&key).unwrap();
        self.buckets[slot] = self.entries.len();
        self.entries.push((key, value));
        true
    }

    /// Removes the entry under the given key, preserving the insertion order of the rest.
    ///
    /// # Returns
    /// True if an entry was removed, or false if the key was not present.
    pub fn remove<Q: ?Sized + Eq + Hash>(&mut self, key: &Q) -> bool
    where
        K: Borrow<Q>,
    {
        let index: usize = match self.slot_of(key) {
            Some(slot) => self.buckets[slot],
            None => return false,
        };
        if index == usize::MAX { return false; }

        // Removal shifts the indices of all later entries, so rebuild the buckets wholesale
        self.entries.remove(index);
        let capacity: usize = self.buckets.len();
        self.rehash(capacity);
        true
    }
}

impl<K: Debug, V: Debug> Debug for LinearMap<K, V> {
    fn fmt(&self, f: &mut Formatter<'_>) -> FResult {
        f.debug_map().entries(self.entries.iter().map(|(k, v)| (k, v))).finish()
    }
}

impl<K: Eq + Hash, V> FromIterator<(K, V)> for LinearMap<K, V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map: Self = Self::new();
        for (key, value) in iter {
            map.add(key, value);
        }
        map
    }
}



/// An insertion-ordered set with open-addressed lookups.
///
/// A thin wrapper around a [`LinearMap`] with unit values.
#[derive(Clone)]
pub struct LinearSet<K>(LinearMap<K, ()>);

impl<K> Default for LinearSet<K> {
    #[inline]
    fn default() -> Self { Self::new() }
}

impl<K> LinearSet<K> {
    /// Constructor for an empty LinearSet.
    #[inline]
    pub fn new() -> Self { Self(LinearMap::new()) }

    /// Returns the number of elements in the set.
    #[inline]
    pub fn len(&self) -> usize { self.0.len() }

    /// Returns true if the set holds no elements.
    #[inline]
    pub fn is_empty(&self) -> bool { self.0.is_empty() }

    /// Returns an iterator over the elements, in insertion order.
    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = &K> { self.0.keys() }
}

impl<K: Eq + Hash> LinearSet<K> {
    /// Returns true if the set holds the given element.
    #[inline]
    pub fn contains<Q: ?Sized + Eq + Hash>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
    {
        self.0.contains(key)
    }

    /// Adds a new element to the set.
    ///
    /// # Returns
    /// True if the element was added, or false if it was already present.
    #[inline]
    pub fn add(&mut self, key: K) -> bool { self.0.add(key, ()) }

    /// Removes the given element from the set.
    ///
    /// # Returns
    /// True if an element was removed, or false if it was not present.
    #[inline]
    pub fn remove<Q: ?Sized + Eq + Hash>(&mut self, key: &Q) -> bool
    where
        K: Borrow<Q>,
    {
        self.0.remove(key)
    }
}

impl<K: Debug> Debug for LinearSet<K> {
    fn fmt(&self, f: &mut Formatter<'_>) -> FResult {
        f.debug_set().entries(self.0.keys()).finish()
    }
}

impl<K: Eq + Hash> FromIterator<K> for LinearSet<K> {
    fn from_iter<I: IntoIterator<Item = K>>(iter: I) -> Self {
        Self(iter.into_iter().map(|k| (k, ())).collect())
    }
}





/***** TESTS *****/
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_map_add_get() {
        let mut map: LinearMap<String, usize> = LinearMap::new();
        assert!(map.add("one".into(), 1));
        assert!(map.add("two".into(), 2));
        assert_eq!(map.get("one"), Some(&1));
        assert_eq!(map.get("two"), Some(&2));
        assert_eq!(map.get("three"), None);
        assert_eq!(map.len(), 2);
    }

    #[test]
    fn test_map_duplicate_add_keeps_existing() {
        let mut map: LinearMap<String, usize> = LinearMap::new();
        assert!(map.add("one".into(), 1));
        assert!(!map.add("one".into(), 99));
        assert_eq!(map.get("one"), Some(&1));
        assert_eq!(map.len(), 1);
    }

    #[test]
    fn test_map_insertion_order() {
        let mut map: LinearMap<usize, usize> = LinearMap::new();
        for i in (0..100).rev() {
            map.add(i, i * i);
        }
        let keys: Vec<usize> = map.keys().copied().collect();
        assert_eq!(keys, (0..100).rev().collect::<Vec<usize>>());
    }

    #[test]
    fn test_map_growth_keeps_entries() {
        // Push it through several rehashes
        let mut map: LinearMap<usize, usize> = LinearMap::new();
        for i in 0..1000 {
            assert!(map.add(i, i + 1));
        }
        for i in 0..1000 {
            assert_eq!(map.get(&i), Some(&(i + 1)));
        }
        assert!(map.buckets.len() >= 2 * map.len());
    }

    #[test]
    fn test_map_remove() {
        let mut map: LinearMap<usize, usize> = LinearMap::new();
        for i in 0..10 {
            map.add(i, i);
        }
        assert!(map.remove(&4));
        assert!(!map.remove(&4));
        assert_eq!(map.len(), 9);
        assert_eq!(map.get(&4), None);
        assert_eq!(map.get(&9), Some(&9));

        // Order of the rest is preserved, and the key can come back
        let keys: Vec<usize> = map.keys().copied().collect();
        assert_eq!(keys, vec![0, 1, 2, 3, 5, 6, 7, 8, 9]);
        assert!(map.add(4, 44));
        assert_eq!(map.get(&4), Some(&44));
    }

    #[test]
    fn test_set_basics() {
        let mut set: LinearSet<String> = LinearSet::new();
        assert!(set.add("a".into()));
        assert!(!set.add("a".into()));
        assert!(set.contains("a"));
        assert!(set.remove("a"));
        assert!(!set.contains("a"));
        assert!(set.is_empty());
    }
}
