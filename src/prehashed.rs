use std::fmt::{self, Debug, Formatter};
use std::hash::{Hash, Hasher};
use std::ops::Deref;

use siphasher::sip128::{Hasher128, SipHasher13};

/// A memoization key with a precomputed hash.
///
/// Looking up a key in a memoized function's cache hashes it and, on a match,
/// compares it with the stored key. For large arguments, like long strings or
/// syntax trees, both can cost more than the call itself. Wrapping such an
/// argument in `Prehashed` computes a 128-bit SipHash once, after which hashing
/// writes a single integer and equality compares the two hashes.
///
/// ```
/// use memofn::{memoize, Function, Prehashed};
///
/// let words = memoize(|text: Prehashed<String>| text.split_whitespace().count());
/// let text = Prehashed::new("the quick brown fox".to_string());
/// assert_eq!(words.apply((text.clone(),)), 4);
/// assert_eq!(words.apply((text,)), 4);
/// ```
///
/// # Equality
/// Two values are considered equal if their hashes are. With 128 bits, a
/// collision between distinct values is astronomically unlikely, but not
/// impossible. Do not use this where a collision would be a safety issue.
#[derive(Copy, Clone)]
pub struct Prehashed<T: ?Sized> {
    hash: u128,
    item: T,
}

impl<T: Hash> Prehashed<T> {
    /// Hash an item and wrap it.
    #[inline]
    pub fn new(item: T) -> Self {
        Self { hash: hash128(&item), item }
    }

    /// Return the wrapped item.
    #[inline]
    pub fn into_inner(self) -> T {
        self.item
    }
}

impl<T: ?Sized> Prehashed<T> {
    /// The precomputed hash.
    #[inline]
    pub fn hash128(&self) -> u128 {
        self.hash
    }
}

impl<T: ?Sized> Deref for Prehashed<T> {
    type Target = T;

    #[inline]
    fn deref(&self) -> &T {
        &self.item
    }
}

impl<T: Hash> From<T> for Prehashed<T> {
    #[inline]
    fn from(item: T) -> Self {
        Self::new(item)
    }
}

impl<T: ?Sized> Hash for Prehashed<T> {
    #[inline]
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u128(self.hash);
    }
}

impl<T: ?Sized> Eq for Prehashed<T> {}

impl<T: ?Sized> PartialEq for Prehashed<T> {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.hash == other.hash
    }
}

impl<T: Debug + ?Sized> Debug for Prehashed<T> {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        self.item.fmt(f)
    }
}

impl<T: Default + Hash> Default for Prehashed<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

/// The 128-bit SipHash of a value.
fn hash128<T: Hash + ?Sized>(value: &T) -> u128 {
    let mut state = SipHasher13::new();
    value.hash(&mut state);
    state.finish128().as_u128()
}
