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

/// Contract shared by all write-side cache policies.
///
/// A cache is a capacity-bounded key-value mapping. Capacity is enforced by
/// eviction, never by rejection: [`Cache::insert`] always succeeds and
/// reports the entry it displaced, if any, so the caller can finalize it.
///
/// Caches are single-threaded by design. Each serialization call owns its
/// own instance; there is no internal synchronization.
pub trait Cache<K, V> {
    /// Look up `key`, returning a mutable reference to its value on a hit.
    ///
    /// Recency-tracking policies promote the entry to most-recently-used.
    fn try_get(&mut self, key: &K) -> Option<&mut V>;

    /// Insert an entry, returning the entry evicted to make room for it.
    ///
    /// For the direct-mapped policy the returned entry may have a different
    /// key than the inserted one: a hash collision displaces whatever
    /// occupied the slot.
    fn insert(&mut self, key: K, value: V) -> Option<(K, V)>;

    /// Enumerate all live entries.
    ///
    /// The order is stable per instance: recency order (most recent first)
    /// for the recency-tracking policies, slot order for the direct-mapped
    /// policy.
    fn iter<'a>(&'a self) -> impl Iterator<Item = (&'a K, &'a V)>
    where
        K: 'a,
        V: 'a;

    /// Remove and return all live entries, in the same order as
    /// [`Cache::iter`]. The cache is empty afterwards.
    fn drain(&mut self) -> Vec<(K, V)>;

    /// The number of live entries.
    fn len(&self) -> usize;

    /// Whether the cache holds no entries.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The configured capacity, in entries (slots for the direct-mapped
    /// policy).
    fn capacity(&self) -> usize;
}
