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

use std::hash::Hash;

use hashbrown::HashMap;
use veneer_common::strict_assert;

/// Arena slot index standing in for a null pointer.
const NIL: usize = usize::MAX;

use crate::cache::Cache;

struct Node<K, V> {
    key: K,
    value: V,
    prev: usize,
    next: usize,
}

/// True least-recently-used cache.
///
/// A hash index maps each key to a node in a recency list. The list is a
/// doubly linked list threaded through an arena of nodes addressed by index,
/// with a free-list of reclaimed slots, so steady-state operation allocates
/// nothing: an evicted node's slot is reused by the next insertion. The
/// free-list is an allocation optimization only; it never affects observable
/// behavior.
///
/// `try_get` and `insert` are O(1). Eviction removes the entry whose last
/// touch is oldest.
pub struct LruCache<K, V> {
    capacity: usize,
    index: HashMap<K, usize>,
    arena: Vec<Option<Node<K, V>>>,
    free: Vec<usize>,
    /// Most recently used node.
    head: usize,
    /// Least recently used node.
    tail: usize,
}

impl<K, V> LruCache<K, V>
where
    K: Hash + Eq + Clone,
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
            index: HashMap::with_capacity(capacity + 1),
            arena: Vec::with_capacity(capacity + 1),
            free: Vec::new(),
            head: NIL,
            tail: NIL,
        }
    }

    fn alloc(&mut self, node: Node<K, V>) -> usize {
        match self.free.pop() {
            Some(idx) => {
                strict_assert!(self.arena[idx].is_none());
                self.arena[idx] = Some(node);
                idx
            }
            None => {
                self.arena.push(Some(node));
                self.arena.len() - 1
            }
        }
    }

    fn release(&mut self, idx: usize) -> Node<K, V> {
        let node = self.arena[idx].take().unwrap();
        self.free.push(idx);
        node
    }

    fn link_front(&mut self, idx: usize) {
        let old_head = self.head;
        {
            let node = self.arena[idx].as_mut().unwrap();
            node.prev = NIL;
            node.next = old_head;
        }
        if old_head != NIL {
            self.arena[old_head].as_mut().unwrap().prev = idx;
        }
        self.head = idx;
        if self.tail == NIL {
            self.tail = idx;
        }
    }

    fn unlink(&mut self, idx: usize) {
        let (prev, next) = {
            let node = self.arena[idx].as_ref().unwrap();
            (node.prev, node.next)
        };
        match prev {
            NIL => self.head = next,
            p => self.arena[p].as_mut().unwrap().next = next,
        }
        match next {
            NIL => self.tail = prev,
            n => self.arena[n].as_mut().unwrap().prev = prev,
        }
    }

    #[cfg(test)]
    fn arena_len(&self) -> usize {
        self.arena.len()
    }
}

impl<K, V> Cache<K, V> for LruCache<K, V>
where
    K: Hash + Eq + Clone,
{
    fn try_get(&mut self, key: &K) -> Option<&mut V> {
        let idx = *self.index.get(key)?;
        if idx != self.head {
            self.unlink(idx);
            self.link_front(idx);
        }
        Some(&mut self.arena[idx].as_mut().unwrap().value)
    }

    /// Insert an entry as most-recently-used.
    ///
    /// `key` must not already be resident; the writer always probes with
    /// [`Cache::try_get`] first.
    fn insert(&mut self, key: K, value: V) -> Option<(K, V)> {
        strict_assert!(!self.index.contains_key(&key));

        let idx = self.alloc(Node {
            key: key.clone(),
            value,
            prev: NIL,
            next: NIL,
        });
        self.link_front(idx);
        self.index.insert(key, idx);

        if self.index.len() > self.capacity {
            let tail = self.tail;
            self.unlink(tail);
            let node = self.release(tail);
            let removed = self.index.remove(&node.key);
            strict_assert!(removed.is_some());
            return Some((node.key, node.value));
        }

        None
    }

    fn iter<'a>(&'a self) -> impl Iterator<Item = (&'a K, &'a V)>
    where
        K: 'a,
        V: 'a,
    {
        std::iter::successors((self.head != NIL).then_some(self.head), |&idx| {
            let next = self.arena[idx].as_ref().unwrap().next;
            (next != NIL).then_some(next)
        })
        .map(|idx| {
            let node = self.arena[idx].as_ref().unwrap();
            (&node.key, &node.value)
        })
    }

    fn drain(&mut self) -> Vec<(K, V)> {
        let mut entries = Vec::with_capacity(self.index.len());
        let mut idx = self.head;
        while idx != NIL {
            let node = self.arena[idx].take().unwrap();
            self.free.push(idx);
            idx = node.next;
            entries.push((node.key, node.value));
        }
        self.head = NIL;
        self.tail = NIL;
        self.index.clear();
        entries
    }

    fn len(&self) -> usize {
        self.index.len()
    }

    fn capacity(&self) -> usize {
        self.capacity
    }
}
