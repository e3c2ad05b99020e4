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

use std::collections::VecDeque;

use crate::cache::Cache;

/// Least-recently-seen linked cache.
///
/// A single recency-ordered list with no hash index: lookups scan linearly
/// from the most-recently-used end and a hit is moved there; insertion past
/// capacity drops the oldest entry. Lookup is O(n), but for small bounded
/// capacities scanning a few entries can beat hashing every key, which is
/// the only regime this policy targets.
pub struct LinkedCache<K, V> {
    capacity: usize,
    /// Most-recently-used entry at the back.
    deque: VecDeque<(K, V)>,
}

impl<K, V> LinkedCache<K, V>
where
    K: Eq,
{
    /// Create a cache holding at most `capacity` entries.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero.
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "cache capacity must be non-zero");
        Self {
            capacity,
            deque: VecDeque::with_capacity(capacity + 1),
        }
    }
}

impl<K, V> Cache<K, V> for LinkedCache<K, V>
where
    K: Eq,
{
    fn try_get(&mut self, key: &K) -> Option<&mut V> {
        let pos = self.deque.iter().rposition(|(k, _)| k == key)?;
        if pos + 1 != self.deque.len() {
            if let Some(entry) = self.deque.remove(pos) {
                self.deque.push_back(entry);
            }
        }
        self.deque.back_mut().map(|(_, v)| v)
    }

    fn insert(&mut self, key: K, value: V) -> Option<(K, V)> {
        self.deque.push_back((key, value));
        if self.deque.len() > self.capacity {
            return self.deque.pop_front();
        }
        None
    }

    fn iter<'a>(&'a self) -> impl Iterator<Item = (&'a K, &'a V)>
    where
        K: 'a,
        V: 'a,
    {
        self.deque.iter().rev().map(|(k, v)| (k, v))
    }

    fn drain(&mut self) -> Vec<(K, V)> {
        let mut entries = Vec::with_capacity(self.deque.len());
        while let Some(entry) = self.deque.pop_back() {
            entries.push(entry);
        }
        entries
    }

    fn len(&self) -> usize {
        self.deque.len()
    }

    fn capacity(&self) -> usize {
        self.capacity
    }
}

#[cfg(test)]
mod tests {
    use itertools::Itertools;

    use super::*;

    fn dump(cache: &LinkedCache<u64, u64>) -> Vec<u64> {
        cache.iter().map(|(k, _)| *k).collect_vec()
    }

    #[test]
    fn test_scan_hit_promotes() {
        let mut cache = LinkedCache::new(3);

        cache.insert(1, 1);
        cache.insert(2, 2);
        cache.insert(3, 3);
        assert_eq!(dump(&cache), vec![3, 2, 1]);

        assert_eq!(cache.try_get(&1), Some(&mut 1));
        assert_eq!(dump(&cache), vec![1, 3, 2]);

        // A hit on the most recent entry is a no-op move.
        assert_eq!(cache.try_get(&1), Some(&mut 1));
        assert_eq!(dump(&cache), vec![1, 3, 2]);
    }

    #[test]
    fn test_eviction_drops_oldest() {
        let mut cache = LinkedCache::new(2);

        assert!(cache.insert(1, 1).is_none());
        assert!(cache.insert(2, 2).is_none());
        assert_eq!(cache.insert(3, 3), Some((1, 1)));

        assert_eq!(cache.try_get(&1), None);
        assert_eq!(dump(&cache), vec![3, 2]);
    }

    #[test]
    fn test_drain_in_recency_order() {
        let mut cache = LinkedCache::new(3);

        cache.insert(1, 1);
        cache.insert(2, 2);
        cache.insert(3, 3);
        cache.try_get(&2);

        assert_eq!(cache.drain(), vec![(2, 2), (3, 3), (1, 1)]);
        assert!(cache.is_empty());
    }

    #[test]
    #[should_panic(expected = "capacity must be non-zero")]
    fn test_zero_capacity_panics() {
        let _ = LinkedCache::<u64, u64>::new(0);
    }
}
