use std::cell::Cell;

use crate::cache::Hit;

thread_local! {
    /// The outcome of this thread's most recent memoized call.
    static LAST: Cell<Option<Hit>> = const { Cell::new(None) };
}

/// Whether this thread's last memoized call was served from a cache.
pub fn last_was_hit() -> bool {
    LAST.get() == Some(Hit::Yes)
}

/// Record the outcome of a memoized call.
pub(crate) fn register(hit: Hit) {
    LAST.set(Some(hit));
}
