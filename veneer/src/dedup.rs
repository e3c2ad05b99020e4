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

use veneer_cache::{Cache, DirectCache, LinkedCache, LruCache};

use crate::{shared_string::SharedString, writer::BufferWriter};

/// Positions of uoffset slots waiting for a string's final position, in
/// insertion order.
pub type PendingOffsets = Vec<usize>;

/// Shared-string writer backed by the direct-mapped cache policy.
pub type DirectSharedStringWriter = SharedStringWriter<DirectCache<SharedString, PendingOffsets>>;

/// Shared-string writer backed by the true LRU cache policy.
pub type LruSharedStringWriter = SharedStringWriter<LruCache<SharedString, PendingOffsets>>;

/// Shared-string writer backed by the linear-scan linked cache policy.
pub type LinkedSharedStringWriter = SharedStringWriter<LinkedCache<SharedString, PendingOffsets>>;

/// Write-side string deduplication.
///
/// Each shared string is held in a cache, policy chosen at construction,
/// until it is evicted or the serialization ends. While a string is
/// resident, every reference to it only records the position of its
/// (reserved, zeroed) uoffset slot. When the string leaves the cache its
/// payload is written exactly once and all recorded slots are patched with
/// the resolved offset.
///
/// Every offset ever passed to [`SharedStringWriter::write_string`] is
/// patched exactly once, either on eviction or during the final
/// [`SharedStringWriter::flush`]. Under the direct-mapped policy a hash
/// collision can flush a string early and cause its payload to be written
/// again on a later reference; that redundancy is the policy's documented
/// tradeoff and never affects what a reader decodes.
///
/// A writer serves a single serialization call on a single thread. It may
/// be reused afterwards: `flush` leaves the cache empty.
pub struct SharedStringWriter<C> {
    cache: C,
}

impl DirectSharedStringWriter {
    /// Create a writer with a direct-mapped cache of `capacity` slots.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero.
    pub fn direct(capacity: usize) -> Self {
        Self::new(DirectCache::new(capacity))
    }
}

impl LruSharedStringWriter {
    /// Create a writer with a true LRU cache of `capacity` entries.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero.
    pub fn lru(capacity: usize) -> Self {
        Self::new(LruCache::new(capacity))
    }
}

impl LinkedSharedStringWriter {
    /// Create a writer with a linear-scan cache of `capacity` entries.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero.
    pub fn linked(capacity: usize) -> Self {
        Self::new(LinkedCache::new(capacity))
    }
}

impl<C> SharedStringWriter<C>
where
    C: Cache<SharedString, PendingOffsets>,
{
    /// Create a writer over an already-constructed cache.
    pub fn new(cache: C) -> Self {
        Self { cache }
    }

    /// Record that the uoffset slot at `offset` references `value`.
    ///
    /// `offset` must address a slot previously obtained from
    /// [`BufferWriter::reserve_uoffset`]. The slot is patched when `value`
    /// is flushed.
    pub fn write_string(&mut self, buf: &mut BufferWriter, value: &SharedString, offset: usize) {
        if let Some(pending) = self.cache.try_get(value) {
            pending.push(offset);
            return;
        }

        if let Some((evicted, pending)) = self.cache.insert(value.clone(), vec![offset]) {
            flush_entry(buf, &evicted, &pending);
        }
    }

    /// Write out every string still resident and patch all of its pending
    /// slots. Must be called after the last field is written; afterwards
    /// the cache is empty and the writer may be reused.
    pub fn flush(&mut self, buf: &mut BufferWriter) {
        let entries = self.cache.drain();
        tracing::trace!(strings = entries.len(), "flushing resident shared strings");
        for (value, pending) in entries {
            flush_entry(buf, &value, &pending);
        }
    }

    /// Number of strings currently resident (pending flush).
    pub fn pending(&self) -> usize {
        self.cache.len()
    }
}

fn flush_entry(buf: &mut BufferWriter, value: &SharedString, pending: &[usize]) {
    let position = buf.put_string(value);
    for &offset in pending {
        buf.patch_uoffset(offset, position);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reader::InputBuffer;

    /// Serialize `values` as a run of uoffset slots (eviction flushes may
    /// interleave payloads between them), returning the finished buffer and
    /// the position of each slot.
    fn serialize<C>(mut writer: SharedStringWriter<C>, values: &[&str]) -> (Vec<u8>, Vec<usize>)
    where
        C: Cache<SharedString, PendingOffsets>,
    {
        let mut buf = BufferWriter::new();
        let mut slots = Vec::with_capacity(values.len());
        for value in values {
            let slot = buf.reserve_uoffset();
            writer.write_string(&mut buf, &SharedString::from(*value), slot);
            slots.push(slot);
        }
        writer.flush(&mut buf);
        assert_eq!(writer.pending(), 0);
        (buf.into_vec(), slots)
    }

    fn decode_all(bytes: &[u8], slots: &[usize]) -> Vec<String> {
        let buf = InputBuffer::new(bytes);
        slots
            .iter()
            .map(|&slot| buf.read_string(slot).unwrap().to_string())
            .collect()
    }

    fn count_payloads(bytes: &[u8], needle: &str) -> usize {
        // A payload occurrence is the length prefix followed by the bytes.
        let mut pattern = (needle.len() as u32).to_le_bytes().to_vec();
        pattern.extend_from_slice(needle.as_bytes());
        bytes.windows(pattern.len()).filter(|w| *w == pattern).count()
    }

    #[test]
    fn test_lru_writes_each_string_once() {
        let values = ["alpha", "beta", "alpha", "gamma", "beta", "alpha"];
        let (bytes, slots) = serialize(SharedStringWriter::lru(16), &values);

        assert_eq!(decode_all(&bytes, &slots), values);
        for needle in ["alpha", "beta", "gamma"] {
            assert_eq!(count_payloads(&bytes, needle), 1);
        }
    }

    #[test]
    fn test_linked_writes_each_string_once() {
        let values = ["alpha", "beta", "alpha", "gamma", "beta", "alpha"];
        let (bytes, slots) = serialize(SharedStringWriter::linked(16), &values);

        assert_eq!(decode_all(&bytes, &slots), values);
        for needle in ["alpha", "beta", "gamma"] {
            assert_eq!(count_payloads(&bytes, needle), 1);
        }
    }

    #[test]
    fn test_eviction_flushes_pending_offsets() {
        // Capacity 1: every new string evicts and flushes the previous one.
        let values = ["alpha", "alpha", "beta", "beta", "alpha"];
        let (bytes, slots) = serialize(SharedStringWriter::lru(1), &values);

        assert_eq!(decode_all(&bytes, &slots), values);
        // "alpha" was evicted once and re-entered, so it is written twice.
        assert_eq!(count_payloads(&bytes, "alpha"), 2);
        assert_eq!(count_payloads(&bytes, "beta"), 1);
    }

    #[test]
    fn test_direct_collision_stays_correct() {
        // Capacity 1 forces every distinct string into the same slot, so
        // each alternation flushes the displaced string. The output gains
        // redundant payloads but decodes exactly the same.
        let values = ["alpha", "beta", "alpha", "beta"];
        let (bytes, slots) = serialize(SharedStringWriter::direct(1), &values);

        assert_eq!(decode_all(&bytes, &slots), values);
        assert_eq!(count_payloads(&bytes, "alpha"), 2);
        assert_eq!(count_payloads(&bytes, "beta"), 2);
    }

    #[test]
    fn test_flush_empty_writer_is_noop() {
        let mut writer = LruSharedStringWriter::lru(4);
        let mut buf = BufferWriter::new();

        writer.flush(&mut buf);
        assert!(buf.is_empty());
    }

    #[test]
    fn test_writer_reuse_after_flush() {
        let mut writer = SharedStringWriter::lru(4);

        let first = {
            let mut buf = BufferWriter::new();
            let slot = buf.reserve_uoffset();
            writer.write_string(&mut buf, &SharedString::from("alpha"), slot);
            writer.flush(&mut buf);
            buf.into_vec()
        };
        let second = {
            let mut buf = BufferWriter::new();
            let slot = buf.reserve_uoffset();
            writer.write_string(&mut buf, &SharedString::from("alpha"), slot);
            writer.flush(&mut buf);
            buf.into_vec()
        };

        assert_eq!(first, second);
        assert_eq!(decode_all(&first, &[0]), vec!["alpha"]);
    }
}
