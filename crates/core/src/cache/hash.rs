//! Cache key generation.

use sha2::{Digest, Sha256};

use crate::SearchOptions;

/// Compute the cache key for a query and its options.
///
/// The query is trimmed and lowercased so that queries differing only in
/// case share a slot; options are serialized canonically.
pub fn compute_cache_key(query: &str, options: &SearchOptions) -> String {
    let mut hasher = Sha256::new();
    hasher.update(query.trim().to_lowercase().as_bytes());
    hasher.update(b"\n");
    hasher.update(options.canonical_json().as_bytes());
    hex::encode(hasher.finalize())
}
