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

//! On-wire layout constants.
//!
//! All scalars are little-endian and fixed width. Variable-length data is
//! reached through relative offsets:
//!
//! - A `uoffset` is an unsigned 32-bit forward offset; adding it to its own
//!   position yields the target position. Strings, vectors and nested
//!   tables are addressed this way.
//! - A table starts with a signed 32-bit offset *back* to its vtable:
//!   `vtable_position = table_position - soffset`.
//! - A vtable is `[vtable_len: u16][table_len: u16][field_offset: u16]*`,
//!   where each field offset is relative to the table position and `0`
//!   marks an absent field.
//! - A string is `[length: u32][utf8 bytes][NUL]`; the trailing NUL is
//!   written for compatibility and never required by the reader.
//! - A vector is `[length: u32][elements...]`.
//!
//! Sharing a string does not change its wire representation: deduplication
//! only makes several uoffsets resolve to the same payload.

/// Width of a `uoffset` (unsigned relative offset).
pub const SIZE_UOFFSET: usize = 4;

/// Width of an `soffset` (signed table-to-vtable offset).
pub const SIZE_SOFFSET: usize = 4;

/// Width of a `voffset` (vtable field entry).
pub const SIZE_VOFFSET: usize = 2;

/// Width of the length prefix of strings and vectors.
pub const SIZE_LENGTH: usize = 4;

/// A vtable holds at least its two header fields.
pub const VTABLE_HEADER_SIZE: usize = 2 * SIZE_VOFFSET;

/// Smallest legal `uoffset` value. A reference must at least skip the slot
/// holding it, so anything below the slot width is malformed.
pub const MIN_UOFFSET: u32 = SIZE_UOFFSET as u32;

/// Largest legal `uoffset` value.
pub const MAX_UOFFSET: u32 = i32::MAX as u32;
