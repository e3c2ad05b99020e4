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

use bytes::Buf;
use serde::{Deserialize, Serialize};
use veneer_common::bits;

use crate::{
    error::{Error, Result},
    read_cache::SharedStringReadCache,
    shared_string::SharedString,
    wire,
};

/// Options for decoding a buffer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecodeOptions {
    /// Capacity of the direct-mapped shared-string read cache.
    ///
    /// The default of 1 effectively disables caching; workloads that read
    /// the same few shared strings repeatedly benefit even from a small
    /// table.
    pub shared_string_cache_size: usize,
}

impl Default for DecodeOptions {
    fn default() -> Self {
        Self {
            shared_string_cache_size: 1,
        }
    }
}

macro_rules! impl_read {
    ($( { $type:ty, $name:ident, $get:ident, $size:expr }, )*) => {
        $(
            #[doc = concat!("Read a little-endian `", stringify!($type), "` at `offset`.")]
            pub fn $name(&self, offset: usize) -> Result<$type> {
                let mut buf = self.slice(offset, $size)?;
                Ok(buf.$get())
            }
        )*
    };
}

/// A decoded buffer.
///
/// All reads are bounds-checked, little-endian, and alignment-agnostic:
/// alignment of well-formed buffers is checked only by debug assertions,
/// never gating release behavior. The buffer is immutable for its whole
/// lifetime, so reads may run concurrently from multiple threads; the only
/// shared mutable state is the internal shared-string cache, which carries
/// its own lock.
pub struct InputBuffer<B> {
    data: B,
    shared_strings: SharedStringReadCache,
}

impl<B> InputBuffer<B>
where
    B: AsRef<[u8]>,
{
    /// Wrap `data` with default [`DecodeOptions`].
    pub fn new(data: B) -> Self {
        Self::with_options(data, DecodeOptions::default())
    }

    /// Wrap `data` with explicit [`DecodeOptions`].
    ///
    /// # Panics
    ///
    /// Panics if `options.shared_string_cache_size` is zero.
    pub fn with_options(data: B, options: DecodeOptions) -> Self {
        Self {
            data,
            shared_strings: SharedStringReadCache::new(options.shared_string_cache_size),
        }
    }

    /// Total buffer size in bytes.
    pub fn len(&self) -> usize {
        self.data.as_ref().len()
    }

    /// Whether the buffer is empty.
    pub fn is_empty(&self) -> bool {
        self.data.as_ref().is_empty()
    }

    fn slice(&self, offset: usize, len: usize) -> Result<&[u8]> {
        let data = self.data.as_ref();
        match offset.checked_add(len) {
            Some(end) if end <= data.len() => Ok(&data[offset..end]),
            _ => Err(Error::OutOfBounds {
                offset,
                len,
                size: data.len(),
            }),
        }
    }

    impl_read! {
        { u8, read_u8, get_u8, 1 },
        { i8, read_i8, get_i8, 1 },
        { u16, read_u16, get_u16_le, 2 },
        { i16, read_i16, get_i16_le, 2 },
        { u32, read_u32, get_u32_le, 4 },
        { i32, read_i32, get_i32_le, 4 },
        { u64, read_u64, get_u64_le, 8 },
        { i64, read_i64, get_i64_le, 8 },
        { f32, read_f32, get_f32_le, 4 },
        { f64, read_f64, get_f64_le, 8 },
    }

    /// Read a boolean at `offset`. Any nonzero byte is `true`.
    pub fn read_bool(&self, offset: usize) -> Result<bool> {
        Ok(self.read_u8(offset)? != 0)
    }

    /// Read and validate the `uoffset` stored at `offset`, returning it as
    /// a relative offset.
    pub fn read_uoffset(&self, offset: usize) -> Result<usize> {
        let value = self.read_u32(offset)?;
        if !(wire::MIN_UOFFSET..=wire::MAX_UOFFSET).contains(&value) {
            return Err(Error::InvalidUOffset { value });
        }
        Ok(value as usize)
    }

    /// Follow the `uoffset` stored at `offset`, returning the absolute
    /// target position.
    pub fn deref_uoffset(&self, offset: usize) -> Result<usize> {
        let relative = self.read_uoffset(offset)?;
        offset.checked_add(relative).ok_or(Error::OutOfBounds {
            offset,
            len: relative,
            size: self.len(),
        })
    }

    /// Resolve a table field to its absolute position.
    ///
    /// The table at `table_offset` points back to its vtable; the vtable
    /// entry for `field_index` holds the field's offset relative to the
    /// table. Returns `Ok(None)` when the field is absent, which is a
    /// normal outcome: either the vtable is too short to mention the index
    /// (a writer of an older layout), or the stored entry is 0.
    pub fn table_field_location(
        &self,
        table_offset: usize,
        field_index: usize,
    ) -> Result<Option<usize>> {
        let soffset = self.read_i32(table_offset)?;
        let vtable_offset = match (table_offset as i64).checked_sub(soffset as i64) {
            Some(position) if position >= 0 => position as usize,
            _ => {
                return Err(Error::OutOfBounds {
                    offset: table_offset,
                    len: wire::SIZE_SOFFSET,
                    size: self.len(),
                })
            }
        };

        let vtable_len = self.read_u16(vtable_offset)?;
        if (vtable_len as usize) < wire::VTABLE_HEADER_SIZE {
            return Err(Error::InvalidVTable { len: vtable_len });
        }

        let field_count = (vtable_len as usize - wire::VTABLE_HEADER_SIZE) / wire::SIZE_VOFFSET;
        if field_index >= field_count {
            return Ok(None);
        }

        let entry_offset = vtable_offset + wire::VTABLE_HEADER_SIZE + wire::SIZE_VOFFSET * field_index;
        let relative = self.read_u16(entry_offset)?;
        if relative == 0 {
            return Ok(None);
        }

        Ok(Some(table_offset + relative as usize))
    }

    /// Read the string referenced by the `uoffset` at `offset`, borrowing
    /// the payload from the buffer.
    pub fn read_string(&self, offset: usize) -> Result<&str> {
        let position = self.deref_uoffset(offset)?;
        self.read_string_at(position)
    }

    /// Read the shared string referenced by the `uoffset` at `offset`.
    ///
    /// Repeated reads of the same target position are amortized by the
    /// buffer's shared-string cache; this method may be called from
    /// multiple threads concurrently.
    pub fn read_shared_string(&self, offset: usize) -> Result<SharedString> {
        let position = self.deref_uoffset(offset)?;
        bits::debug_assert_aligned(wire::SIZE_UOFFSET, position);
        self.shared_strings
            .get_or_read(position, || Ok(SharedString::from(self.read_string_at(position)?)))
    }

    /// Follow the `uoffset` at `offset` to a vector, returning its element
    /// count and the position of its first element.
    pub fn read_vector(&self, offset: usize) -> Result<(usize, usize)> {
        let position = self.deref_uoffset(offset)?;
        let len = self.read_u32(position)? as usize;
        Ok((len, position + wire::SIZE_LENGTH))
    }

    /// Borrow the byte vector referenced by the `uoffset` at `offset`.
    pub fn read_byte_vector(&self, offset: usize) -> Result<&[u8]> {
        let (len, data) = self.read_vector(offset)?;
        self.slice(data, len)
    }

    fn read_string_at(&self, position: usize) -> Result<&str> {
        let len = self.read_u32(position)? as usize;
        let payload = self.slice(position + wire::SIZE_LENGTH, len)?;
        Ok(std::str::from_utf8(payload)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::writer::BufferWriter;

    fn buffer_with_u32(value: u32) -> InputBuffer<Vec<u8>> {
        InputBuffer::new(value.to_le_bytes().to_vec())
    }

    #[test]
    fn test_uoffset_validation() {
        for value in [0, 1, 2, 3] {
            assert!(matches!(
                buffer_with_u32(value).read_uoffset(0),
                Err(Error::InvalidUOffset { value: v }) if v == value,
            ));
        }
        assert!(matches!(
            buffer_with_u32(i32::MAX as u32 + 1).read_uoffset(0),
            Err(Error::InvalidUOffset { .. }),
        ));

        assert_eq!(buffer_with_u32(4).read_uoffset(0).unwrap(), 4);
        assert_eq!(
            buffer_with_u32(i32::MAX as u32).read_uoffset(0).unwrap(),
            i32::MAX as usize,
        );
    }

    #[test]
    fn test_scalar_reads() {
        let mut w = BufferWriter::new();
        w.put_u16(0xbeef);
        w.put_i32(-7);
        w.put_f64(1.5);
        w.put_u8(2);
        let buf = InputBuffer::new(w.into_vec());

        assert_eq!(buf.read_u16(0).unwrap(), 0xbeef);
        assert_eq!(buf.read_i32(2).unwrap(), -7);
        assert_eq!(buf.read_f64(6).unwrap(), 1.5);
        assert!(buf.read_bool(14).unwrap());

        assert!(matches!(buf.read_u32(13), Err(Error::OutOfBounds { .. })));
        assert!(matches!(
            buf.read_u8(usize::MAX),
            Err(Error::OutOfBounds { .. }),
        ));
    }

    /// Lay out a table with a vtable advertising `field_offsets`, returning
    /// `(buffer, table_offset)`. Field slots themselves are left zeroed.
    fn build_table(field_offsets: &[u16]) -> (Vec<u8>, usize) {
        let mut w = BufferWriter::new();

        // table: soffset + one placeholder slot per field
        let table_offset = w.len();
        w.put_i32(0);
        for _ in field_offsets {
            w.put_u32(0);
        }

        // vtable after the table
        w.align_to(2);
        let vtable_offset = w.len();
        let vtable_len = (wire::VTABLE_HEADER_SIZE + wire::SIZE_VOFFSET * field_offsets.len()) as u16;
        w.put_u16(vtable_len);
        w.put_u16((wire::SIZE_SOFFSET + wire::SIZE_UOFFSET * field_offsets.len()) as u16);
        for &field_offset in field_offsets {
            w.put_u16(field_offset);
        }

        let mut buf = w.into_vec();
        let soffset = (table_offset as i32) - (vtable_offset as i32);
        buf[table_offset..table_offset + 4].copy_from_slice(&soffset.to_le_bytes());

        (buf, table_offset)
    }

    #[test]
    fn test_table_field_resolution() {
        let (bytes, table_offset) = build_table(&[4, 0, 8]);
        let buf = InputBuffer::new(bytes);

        assert_eq!(
            buf.table_field_location(table_offset, 0).unwrap(),
            Some(table_offset + 4),
        );
        // A stored entry of 0 means absent.
        assert_eq!(buf.table_field_location(table_offset, 1).unwrap(), None);
        assert_eq!(
            buf.table_field_location(table_offset, 2).unwrap(),
            Some(table_offset + 8),
        );
    }

    #[test]
    fn test_field_index_past_vtable_is_absent() {
        // field_count = 3; querying index 5 is absent, not an error.
        let (bytes, table_offset) = build_table(&[4, 8, 12]);
        let buf = InputBuffer::new(bytes);

        assert_eq!(buf.table_field_location(table_offset, 5).unwrap(), None);
    }

    #[test]
    fn test_short_vtable_is_malformed() {
        let mut w = BufferWriter::new();
        // vtable claiming 2 bytes, shorter than its own header
        w.put_u16(2);
        w.put_u16(0);
        let table_offset = w.len();
        w.put_i32(table_offset as i32);
        let buf = InputBuffer::new(w.into_vec());

        assert!(matches!(
            buf.table_field_location(table_offset, 0),
            Err(Error::InvalidVTable { len: 2 }),
        ));
    }

    #[test]
    fn test_read_string_zero_copy() {
        let mut w = BufferWriter::new();
        let slot = w.reserve_uoffset();
        let position = w.put_string("veneer");
        w.patch_uoffset(slot, position);
        let buf = InputBuffer::new(w.into_vec());

        assert_eq!(buf.read_string(slot).unwrap(), "veneer");
    }

    #[test]
    fn test_read_string_rejects_invalid_utf8() {
        let mut w = BufferWriter::new();
        let slot = w.reserve_uoffset();
        w.align_to(4);
        let position = w.len();
        w.put_u32(2);
        w.put_bytes(&[0xff, 0xfe]);
        w.patch_uoffset(slot, position);
        let buf = InputBuffer::new(w.into_vec());

        assert!(matches!(buf.read_string(slot), Err(Error::Utf8(_))));
    }

    #[test]
    fn test_read_vector() {
        let mut w = BufferWriter::new();
        let slot = w.reserve_uoffset();
        w.align_to(4);
        let position = w.len();
        w.put_u32(3);
        w.put_bytes(&[7, 8, 9]);
        w.patch_uoffset(slot, position);
        let buf = InputBuffer::new(w.into_vec());

        let (len, data) = buf.read_vector(slot).unwrap();
        assert_eq!(len, 3);
        assert_eq!(data, position + 4);
        assert_eq!(buf.read_byte_vector(slot).unwrap(), &[7, 8, 9]);
    }
}
