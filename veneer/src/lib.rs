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

//! veneer is the runtime core of a zero-copy, table-based binary
//! serialization format: an offset-addressed wire layout plus the machinery
//! to read and write it efficiently.
//!
//! The centerpiece is shared-string deduplication. On the write side,
//! [`dedup::SharedStringWriter`] defers each string behind a bounded cache
//! (direct-mapped, true LRU, or linear-scan — pick the policy per
//! serialization), writes every distinct string once, and back-patches all
//! offsets that referenced it. On the read side, [`reader::InputBuffer`]
//! resolves offsets and vtables with bit-exact validation and amortizes
//! repeated shared-string reads through a small lock-protected cache, safe
//! to query from multiple threads.
//!
//! Sharing is invisible on the wire: a shared string serializes to exactly
//! the same bytes as a plain one.
//!
//! ```
//! use veneer::prelude::*;
//!
//! // Serialize: two references to one string, written once.
//! let mut buf = BufferWriter::new();
//! let mut strings = SharedStringWriter::lru(16);
//! let value = SharedString::from("veneer");
//! let a = buf.reserve_uoffset();
//! strings.write_string(&mut buf, &value, a);
//! let b = buf.reserve_uoffset();
//! strings.write_string(&mut buf, &value, b);
//! strings.flush(&mut buf);
//!
//! // Deserialize: both offsets resolve to the same payload.
//! let reader = InputBuffer::new(buf.into_vec());
//! assert_eq!(reader.read_shared_string(a).unwrap(), "veneer");
//! assert_eq!(reader.read_shared_string(b).unwrap(), "veneer");
//! ```

pub mod dedup;
pub mod error;
pub mod read_cache;
pub mod reader;
pub mod shared_string;
pub mod wire;
pub mod writer;

/// Re-exports of the commonly used types.
pub mod prelude {
    pub use veneer_cache::prelude::*;

    pub use crate::{
        dedup::{
            DirectSharedStringWriter, LinkedSharedStringWriter, LruSharedStringWriter,
            PendingOffsets, SharedStringWriter,
        },
        error::{Error, Result},
        read_cache::SharedStringReadCache,
        reader::{DecodeOptions, InputBuffer},
        shared_string::SharedString,
        writer::BufferWriter,
    };
}
