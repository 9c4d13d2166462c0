//! In-memory cache for suggestion responses.
//!
//! - Entries expire after a fixed TTL, checked when read
//! - Capacity is bounded; the oldest-inserted entry is evicted first (FIFO)
//! - Keys are SHA-256 digests of the lowercased query and canonical options

pub mod hash;
pub mod memory;

pub use hash::compute_cache_key;
pub use memory::{CacheEntry, CacheStats, MemoryCache};
