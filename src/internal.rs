//! Support for the `#[memoize]` attribute. Not part of the public API.

use std::hash::Hash;

pub use once_cell::sync::Lazy;

pub use crate::cache::Cache;
pub use crate::memoize::{memoized, try_memoized};
#[cfg(feature = "testing")]
pub use crate::testing::last_was_hit;

/// The per-function cache of a memoized free function.
pub type StaticCache<K, V> = Lazy<Cache<K, V>>;

/// Ensure that an argument type can be part of a cache key.
pub fn assert_key<T: Eq + Hash + Clone + Send + Sync + 'static>() {}

/// Ensure that a return type can be stored in a cache.
pub fn assert_value<T: Clone + Send + Sync + 'static>() {}

/// The successful part of a fallible return type.
pub trait Fallible {
    /// What is memoized.
    type Value;
}

impl<T, E> Fallible for Result<T, E> {
    type Value = T;
}
