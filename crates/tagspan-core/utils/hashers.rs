//! Hash map constructors used across the crate
//!
//! Lookup tables (prefix → matchers, tag name → definition, style name →
//! expansion) are keyed by short strings or single characters, so they use
//! `ahash` rather than the default SipHash.

use ahash::RandomState;
use std::collections::HashMap;

/// `HashMap` using the crate's hasher
pub type FastHashMap<K, V> = HashMap<K, V, RandomState>;

/// Create a new `HashMap` with the crate's hasher
///
/// # Example
///
/// ```rust
/// use tagspan_core::utils::hashers::create_hash_map;
///
/// let mut map = create_hash_map::<String, i32>();
/// map.insert("key".to_string(), 42);
/// ```
#[must_use]
pub fn create_hash_map<K, V>() -> FastHashMap<K, V> {
    HashMap::with_hasher(RandomState::new())
}
