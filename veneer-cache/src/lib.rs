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

//! Bounded key-value caches with explicit eviction feedback.
//!
//! These caches back the write-side string deduplication in `veneer`. Every
//! policy implements the same [`Cache`] contract: `insert` never rejects an
//! entry, it makes room by handing the evicted entry back to the caller, who
//! is responsible for finalizing it.
//!
//! Three policies with different cost/hit-rate tradeoffs are provided:
//!
//! - [`DirectCache`]: a fixed slot table indexed by hash. O(1), allocation
//!   free, but a hash collision silently replaces a live entry.
//! - [`LruCache`]: a hash index over an arena-backed recency list. O(1) with
//!   exact least-recently-used eviction.
//! - [`LinkedCache`]: a single recency-ordered list with no hash index.
//!   O(n) lookup, intended for small capacities where scanning a handful of
//!   entries beats hashing every key.

pub mod cache;
pub mod direct;
pub mod linked;
pub mod lru;

pub use cache::Cache;
pub use direct::DirectCache;
pub use linked::LinkedCache;
pub use lru::LruCache;

/// Re-exports of the cache contract and all policies.
pub mod prelude {
    pub use crate::{Cache, DirectCache, LinkedCache, LruCache};
}
