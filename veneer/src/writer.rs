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

use bytes::BufMut;
use veneer_common::{bits, strict_assert};

use crate::wire;

/// Append-only output buffer with deferred offset patching.
///
/// Scalars are appended little-endian at the current write position.
/// References are handled in two steps: [`BufferWriter::reserve_uoffset`]
/// appends a zeroed slot, and [`BufferWriter::patch_uoffset`] later stores
/// the relative offset once the target's final position is known. This is
/// the mechanism the shared-string writer relies on: a string's position is
/// unknown until it is flushed, so every reference site is reserved first
/// and patched on flush.
///
/// Patching is the only way already-produced bytes are ever touched.
#[derive(Debug, Default)]
pub struct BufferWriter {
    buf: Vec<u8>,
}

macro_rules! impl_put {
    ($( { $type:ty, $name:ident, $put:ident }, )*) => {
        $(
            #[doc = concat!("Append a little-endian `", stringify!($type), "`.")]
            pub fn $name(&mut self, v: $type) {
                self.buf.$put(v);
            }
        )*
    };
}

impl BufferWriter {
    /// Create an empty writer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty writer with a pre-allocated backing buffer.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buf: Vec::with_capacity(capacity),
        }
    }

    /// Current write position (the number of bytes produced so far).
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// Whether nothing has been written yet.
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// View the produced bytes.
    pub fn as_slice(&self) -> &[u8] {
        &self.buf
    }

    /// Consume the writer, returning the produced bytes.
    pub fn into_vec(self) -> Vec<u8> {
        self.buf
    }

    /// Pad with zero bytes until the write position is a multiple of
    /// `align` (which must be a power of 2).
    pub fn align_to(&mut self, align: usize) {
        let target = bits::align_up(align, self.buf.len());
        self.buf.resize(target, 0);
    }

    impl_put! {
        { u8, put_u8, put_u8 },
        { i8, put_i8, put_i8 },
        { u16, put_u16, put_u16_le },
        { i16, put_i16, put_i16_le },
        { u32, put_u32, put_u32_le },
        { i32, put_i32, put_i32_le },
        { u64, put_u64, put_u64_le },
        { i64, put_i64, put_i64_le },
        { f32, put_f32, put_f32_le },
        { f64, put_f64, put_f64_le },
    }

    /// Append raw bytes.
    pub fn put_bytes(&mut self, bytes: &[u8]) {
        self.buf.put_slice(bytes);
    }

    /// Append a zeroed, 4-aligned uoffset slot to be patched later,
    /// returning its position.
    pub fn reserve_uoffset(&mut self) -> usize {
        self.align_to(wire::SIZE_UOFFSET);
        let position = self.buf.len();
        self.buf.put_u32_le(0);
        position
    }

    /// Append a string payload (length prefix, UTF-8 bytes, trailing NUL),
    /// returning its 4-aligned position.
    pub fn put_string(&mut self, value: &str) -> usize {
        self.align_to(wire::SIZE_LENGTH);
        let position = self.buf.len();
        self.buf.put_u32_le(value.len() as u32);
        self.buf.put_slice(value.as_bytes());
        self.buf.put_u8(0);
        position
    }

    /// Store the relative offset from `position` to `target` in the slot at
    /// `position`.
    ///
    /// `target` must lie after `position`, within the legal uoffset range.
    pub fn patch_uoffset(&mut self, position: usize, target: usize) {
        strict_assert!(target >= position + wire::SIZE_UOFFSET);
        strict_assert!(target - position <= wire::MAX_UOFFSET as usize);
        let relative = (target - position) as u32;
        (&mut self.buf[position..position + wire::SIZE_UOFFSET]).put_u32_le(relative);
    }
}
