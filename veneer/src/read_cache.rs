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

use parking_lot::Mutex;

use crate::{error::Result, shared_string::SharedString};

/// Read-side shared-string cache.
///
/// A direct-mapped slot table keyed by absolute buffer position, shared by
/// every thread querying one decoded buffer. A single coarse lock guards
/// the whole table: per-slot locking was rejected because the
/// initialization and contention overhead outweighs any win on the common
/// small table, and every critical section is bounded (one slot probe plus
/// at most one UTF-8 decode).
///
/// A collision simply replaces the slot; correctness never depends on the
/// table size, only the hit rate does.
pub struct SharedStringReadCache {
    slots: Mutex<Box<[Option<(usize, SharedString)>]>>,
}

impl SharedStringReadCache {
    /// Create a cache with `size` slots.
    ///
    /// # Panics
    ///
    /// Panics if `size` is zero.
    pub fn new(size: usize) -> Self {
        assert!(size > 0, "read cache size must be non-zero");
        let mut slots = Vec::with_capacity(size);
        slots.resize_with(size, || None);
        Self {
            slots: Mutex::new(slots.into_boxed_slice()),
        }
    }

    /// Number of slots.
    pub fn size(&self) -> usize {
        self.slots.lock().len()
    }

    /// Return the string cached for `position`, or decode it with `read`
    /// and cache it.
    ///
    /// `position` is the absolute string position, always 4-aligned by
    /// format invariant, so `position >> 2` is a legitimate cheap hash.
    pub fn get_or_read<F>(&self, position: usize, read: F) -> Result<SharedString>
    where
        F: FnOnce() -> Result<SharedString>,
    {
        let mut slots = self.slots.lock();
        let slot = (position >> 2) % slots.len();

        if let Some((cached_position, value)) = &slots[slot] {
            if *cached_position == position {
                return Ok(value.clone());
            }
        }

        tracing::trace!(position, slot, "shared string read cache miss");
        let value = read()?;
        slots[slot] = Some((position, value.clone()));
        Ok(value)
    }
}
