// Copyright 2026 veneer Project Authors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use std::hash::{Hash, Hasher};

use twox_hash::XxHash64;

use crate::cache::Cache;

/// Direct-mapped approximate cache.
///
/// A fixed slot table indexed by `hash(key) % capacity`. Insertion
/// unconditionally overwrites the slot, so a hash collision evicts an entry
/// with a *different* key; a lookup that lands on a colliding slot is a
/// silent miss. No recency is tracked and no allocation happens per
/// operation.
///
/// The approximation only costs performance (a displaced entry gets written
/// again if it is seen again), never correctness of the finalized output.
pub struct DirectCache<K, V> {
    slots: Box<[Option<(K, V)>]>,
}

impl<K, V> DirectCache<K, V>
where
    K: Hash + Eq,
{
    /// Create a cache with `capacity` slots.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero.
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "cache capacity must be non-zero");
        let mut slots = Vec::with_capacity(capacity);
        slots.resize_with(capacity, || None);
        Self {
            slots: slots.into_boxed_slice(),
        }
    }

    fn slot_of(&self, key: &K) -> usize {
        let mut hasher = XxHash64::with_seed(0);
        key.hash(&mut hasher);
        (hasher.finish() % self.slots.len() as u64) as usize
    }
}

impl<K, V> Cache<K, V> for DirectCache<K, V>
where
    K: Hash + Eq,
{
    fn try_get(&mut self, key: &K) -> Option<&mut V> {
        let slot = self.slot_of(key);
        match self.slots[slot].as_mut() {
            Some((k, v)) if *k == *key => Some(v),
            _ => None,
        }
    }

    fn insert(&mut self, key: K, value: V) -> Option<(K, V)> {
        let slot = self.slot_of(&key);
        self.slots[slot].replace((key, value))
    }

    fn iter<'a>(&'a self) -> impl Iterator<Item = (&'a K, &'a V)>
    where
        K: 'a,
        V: 'a,
    {
        self.slots
            .iter()
            .filter_map(|slot| slot.as_ref().map(|(k, v)| (k, v)))
    }

    fn drain(&mut self) -> Vec<(K, V)> {
        self.slots.iter_mut().filter_map(Option::take).collect()
    }

    fn len(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_some()).count()
    }

    fn capacity(&self) -> usize {
        self.slots.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hit_and_miss() {
        let mut cache: DirectCache<u64, u64> = DirectCache::new(64);

        assert!(cache.insert(1, 10).is_none());
        assert_eq!(cache.try_get(&1), Some(&mut 10));
        assert_eq!(cache.try_get(&2), None);
    }

    #[test]
    fn test_collision_overwrites_other_key() {
        // Capacity 1 forces every key into the same slot.
        let mut cache: DirectCache<u64, u64> = DirectCache::new(1);

        assert!(cache.insert(1, 10).is_none());
        assert_eq!(cache.insert(2, 20), Some((1, 10)));

        // The displaced key is now a miss, the resident key a hit.
        assert_eq!(cache.try_get(&1), None);
        assert_eq!(cache.try_get(&2), Some(&mut 20));
    }

    #[test]
    fn test_drain_empties() {
        let mut cache: DirectCache<u64, u64> = DirectCache::new(8);

        for i in 0..4 {
            cache.insert(i, i * 10);
        }

        let mut entries = cache.drain();
        entries.sort_unstable();
        assert_eq!(entries, vec![(0, 0), (1, 10), (2, 20), (3, 30)]);
        assert!(cache.is_empty());
        assert_eq!(cache.iter().count(), 0);
    }

    #[test]
    #[should_panic(expected = "capacity must be non-zero")]
    fn test_zero_capacity_panics() {
        let _ = DirectCache::<u64, u64>::new(0);
    }
}
