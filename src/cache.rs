use std::hash::Hash;
use std::sync::Arc;

use once_cell::sync::OnceCell;
use parking_lot::RwLock;
use rustc_hash::FxHashMap;

/// A slot holding the result for a single key.
///
/// Shared between the map and all callers currently waiting for it, so that
/// the map lock is never held while a value is computed.
type Slot<V> = Arc<OnceCell<V>>;

/// Maps argument tuples to memoized results.
///
/// A value is computed at most once per key, even if many threads ask for the
/// same key at the same time: the first caller computes while the others block
/// on that key's slot. Calls for distinct keys do not wait for each other.
///
/// If a computation fails, either by returning an error or by panicking,
/// nothing is stored: the key is removed again unless another caller is
/// already waiting for it, in which case that caller computes instead.
///
/// The cache never forgets a value. It grows with every distinct key for as
/// long as it lives, so calling a memoized function with an unbounded set of
/// arguments in a long-running process leaks memory.
pub struct Cache<K, V> {
    map: RwLock<FxHashMap<K, Slot<V>>>,
}

/// Whether a lookup was served from the cache.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Hit {
    /// The value was already there or was computed by another caller.
    Yes,
    /// The value was computed by this call.
    No,
}

impl<K, V> Cache<K, V> {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self { map: RwLock::new(FxHashMap::default()) }
    }

    /// Create an empty cache with room for `capacity` keys.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            map: RwLock::new(FxHashMap::with_capacity_and_hasher(
                capacity,
                Default::default(),
            )),
        }
    }

    /// The number of memoized values.
    pub fn len(&self) -> usize {
        self.map.read().values().filter(|slot| slot.get().is_some()).count()
    }

    /// Whether no value has been memoized yet.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<K, V> Cache<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    /// Look up a memoized value without computing it.
    pub fn get(&self, key: &K) -> Option<V> {
        self.map.read().get(key).and_then(|slot| slot.get().cloned())
    }

    /// Return the memoized value for `key` or compute and memoize it.
    ///
    /// Only a successful result is memoized. An error is handed back to the
    /// caller and the key stays vacant.
    pub fn get_or_try_insert_with<E, F>(&self, key: K, func: F) -> Result<(V, Hit), E>
    where
        F: FnOnce(K) -> Result<V, E>,
    {
        // Fast path: a shared lock suffices for a hit.
        if let Some(value) = self.get(&key) {
            return Ok((value, Hit::Yes));
        }

        let mut vacancy = Vacancy { map: &self.map, key: key.clone(), slot: None };
        let slot = vacancy.slot.insert(self.slot(&key));
        let mut hit = Hit::Yes;
        let value = slot.get_or_try_init(|| {
            hit = Hit::No;
            func(key)
        })?;

        Ok((value.clone(), hit))
    }

    /// Return the memoized value for `key` or compute and memoize it.
    pub fn get_or_insert_with<F>(&self, key: K, func: F) -> (V, Hit)
    where
        F: FnOnce(K) -> V,
    {
        match self.get_or_try_insert_with(key, |key| Ok::<_, std::convert::Infallible>(func(key)))
        {
            Ok(pair) => pair,
            Err(never) => match never {},
        }
    }

    /// Fetch the slot for a key, creating it if necessary.
    fn slot(&self, key: &K) -> Slot<V> {
        if let Some(slot) = self.map.read().get(key) {
            return Arc::clone(slot);
        }

        // Another thread may have created the slot between the two locks, in
        // which case `entry` hands us theirs.
        Arc::clone(self.map.write().entry(key.clone()).or_default())
    }
}

/// Removes a key whose slot is still empty once the caller holding it is done,
/// be it through an error or a panic.
struct Vacancy<'a, K, V>
where
    K: Eq + Hash,
{
    map: &'a RwLock<FxHashMap<K, Slot<V>>>,
    key: K,
    slot: Option<Slot<V>>,
}

impl<K, V> Drop for Vacancy<'_, K, V>
where
    K: Eq + Hash,
{
    fn drop(&mut self) {
        let Some(slot) = self.slot.take() else { return };
        if slot.get().is_some() {
            return;
        }

        // Handles to a slot are only cloned under the lock and, while the slot
        // is empty, only released under the write lock. A count of two thus
        // means that nobody but the map and us is still waiting for it.
        let mut map = self.map.write();
        if Arc::strong_count(&slot) == 2
            && map.get(&self.key).is_some_and(|entry| Arc::ptr_eq(entry, &slot))
        {
            map.remove(&self.key);
        }
        drop(slot);
        drop(map);
    }
}

impl<K, V> Default for Cache<K, V> {
    fn default() -> Self {
        Self::new()
    }
}
