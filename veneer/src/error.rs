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

/// Decode error.
///
/// Every variant is fatal to the current read operation: malformed input is
/// a hard stop for that decode attempt, with no local recovery or retry.
/// Absent table fields are *not* errors; they surface as `Ok(None)` from
/// field resolution.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// A decoded `uoffset` was outside `[4, i32::MAX]`.
    #[error("uoffset out of range: {value}")]
    InvalidUOffset {
        /// The decoded value.
        value: u32,
    },
    /// A vtable was shorter than its two-field header.
    #[error("vtable too short to be valid: {len} bytes")]
    InvalidVTable {
        /// The decoded vtable length.
        len: u16,
    },
    /// A read reached past the end of the buffer.
    #[error("read out of bounds: offset {offset}, len {len}, buffer size {size}")]
    OutOfBounds {
        /// Start of the attempted read.
        offset: usize,
        /// Length of the attempted read.
        len: usize,
        /// Total buffer size.
        size: usize,
    },
    /// A string payload was not valid UTF-8.
    #[error("invalid utf-8 in string payload: {0}")]
    Utf8(#[from] std::str::Utf8Error),
}

/// Decode result.
pub type Result<T> = std::result::Result<T, Error>;
